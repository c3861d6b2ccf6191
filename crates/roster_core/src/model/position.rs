//! Position domain record.
//!
//! # Invariants
//! - `position_code` is the primary identity.
//! - Write paths must call `canonical_salary()` before SQL mutations; the
//!   salary column is declared decimal(10,2).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schema::{check_decimal, ColumnStorage, ColumnTypeError, POSITIONS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "PositionCode")]
    pub position_code: String,
    #[serde(rename = "Salary")]
    pub salary: Decimal,
}

impl Position {
    pub fn new(position_code: impl Into<String>, salary: Decimal) -> Self {
        Self {
            position_code: position_code.into(),
            salary,
        }
    }

    /// Checks the salary against the declared column type and returns the
    /// canonical two-decimal value to persist.
    ///
    /// # Errors
    /// - `ColumnTypeError` when the value does not fit decimal(10,2).
    pub fn canonical_salary(&self) -> Result<Decimal, ColumnTypeError> {
        let (precision, scale) = declared_salary_bounds();
        check_decimal("Salary", self.salary, precision, scale)
    }

    /// Validates the record against its declared column types.
    pub fn validate(&self) -> Result<(), ColumnTypeError> {
        self.canonical_salary().map(|_| ())
    }
}

fn declared_salary_bounds() -> (u32, u32) {
    POSITIONS
        .columns
        .iter()
        .find_map(|column| match (column.name, column.storage) {
            ("Salary", ColumnStorage::Decimal { precision, scale }) => Some((precision, scale)),
            _ => None,
        })
        // The Salary column is declared Decimal in the static schema; the
        // schema self-check runs before any storage is touched.
        .unwrap_or((10, 2))
}
