//! Employee domain record.
//!
//! # Invariants
//! - `employee_no` is the primary identity; `None` means "let the storage
//!   boundary apply the declared default" and only appears before the first
//!   insert.
//! - `birth_date` is a calendar date with no time component.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::schema::date_only;

/// Numeric employee identity, matching the `EmployeeNo` column.
pub type EmployeeNo = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Serialized as `EmployeeNo` to match the persisted schema naming.
    #[serde(rename = "EmployeeNo")]
    pub employee_no: Option<EmployeeNo>,
    #[serde(rename = "BirthDate")]
    pub birth_date: NaiveDate,
}

impl Employee {
    /// Creates an employee whose number will be assigned at the storage
    /// boundary (fixed declared default, see `schema::DEFAULT_EMPLOYEE_NO`).
    pub fn new(birth_date: NaiveDate) -> Self {
        Self {
            employee_no: None,
            birth_date,
        }
    }

    /// Creates an employee with a caller-chosen number.
    pub fn with_no(employee_no: EmployeeNo, birth_date: NaiveDate) -> Self {
        Self {
            employee_no: Some(employee_no),
            birth_date,
        }
    }

    /// Creates an employee from a birth timestamp, discarding any
    /// time-of-day component per the date-only column declaration.
    pub fn born_at(employee_no: Option<EmployeeNo>, birth: NaiveDateTime) -> Self {
        Self {
            employee_no,
            birth_date: date_only(birth),
        }
    }
}
