//! Assignment join records linking employees to positions and departments.
//!
//! # Invariants
//! - Identity is the composite `(EmployeeNo, PositionCode)` or
//!   `(EmployeeNo, DepartmentCode)` pair; one row per pair.
//! - `from`/`to` are calendar dates; `to = None` marks an open-ended
//!   assignment.
//! - Rows must reference existing parent records; the storage engine
//!   rejects dangling references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::employee::EmployeeNo;

/// Time-bounded link between an Employee and a Position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePosition {
    #[serde(rename = "EmployeeNo")]
    pub employee_no: EmployeeNo,
    #[serde(rename = "PositionCode")]
    pub position_code: String,
    #[serde(rename = "From")]
    pub from: NaiveDate,
    #[serde(rename = "To")]
    pub to: Option<NaiveDate>,
}

impl EmployeePosition {
    pub fn new(
        employee_no: EmployeeNo,
        position_code: impl Into<String>,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee_no,
            position_code: position_code.into(),
            from,
            to,
        }
    }
}

/// Time-bounded link between an Employee and a Department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDepartment {
    #[serde(rename = "EmployeeNo")]
    pub employee_no: EmployeeNo,
    #[serde(rename = "DepartmentCode")]
    pub department_code: String,
    #[serde(rename = "From")]
    pub from: NaiveDate,
    #[serde(rename = "To")]
    pub to: Option<NaiveDate>,
}

impl EmployeeDepartment {
    pub fn new(
        employee_no: EmployeeNo,
        department_code: impl Into<String>,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> Self {
        Self {
            employee_no,
            department_code: department_code.into(),
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EmployeePosition;
    use chrono::NaiveDate;

    #[test]
    fn serialized_field_names_match_persisted_schema() {
        let assignment = EmployeePosition::new(
            1001,
            "DEV",
            NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
            None,
        );

        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["EmployeeNo"], 1001);
        assert_eq!(json["PositionCode"], "DEV");
        assert_eq!(json["From"], "2020-01-06");
        assert!(json["To"].is_null());

        let back: EmployeePosition = serde_json::from_value(json).unwrap();
        assert_eq!(back, assignment);
    }
}
