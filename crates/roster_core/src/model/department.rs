//! Department domain record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "DepartmentCode")]
    pub department_code: String,
}

impl Department {
    pub fn new(department_code: impl Into<String>) -> Self {
        Self {
            department_code: department_code.into(),
        }
    }
}
