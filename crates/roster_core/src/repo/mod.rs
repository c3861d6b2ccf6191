//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define data-access contracts for the five roster record types.
//! - Map storage-engine integrity failures onto a semantic error taxonomy.
//!
//! # Invariants
//! - Repository writes validate declared column types before SQL mutations.
//! - Key uniqueness and referential integrity are enforced by the storage
//!   engine and surfaced as `UniqueViolation` / `ForeignKeyViolation`, never
//!   masked.
//! - Repositories refuse connections whose schema is not fully applied.

use crate::db::{migrations, DbError};
use crate::schema::{ColumnTypeError, TableDef};
use chrono::NaiveDate;
use rusqlite::{ffi, Connection, ErrorCode};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod assignment_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod position_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error taxonomy for roster persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// A value violated its declared column storage type. Rejected at the
    /// write boundary before any SQL runs.
    ColumnType(ColumnTypeError),
    /// A duplicate primary or composite key insert.
    UniqueViolation { detail: String },
    /// A dangling foreign key, or deletion of a referenced parent row with
    /// no cascade path declared.
    ForeignKeyViolation { detail: String },
    /// The targeted row does not exist.
    NotFound {
        table: &'static str,
        key: String,
    },
    /// Persisted state cannot be interpreted as a valid record.
    InvalidData(String),
    /// The connection has not had the declared schema applied.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The connection lacks a table the repository depends on.
    MissingRequiredTable(&'static str),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnType(err) => write!(f, "{err}"),
            Self::UniqueViolation { detail } => write!(f, "unique constraint violated: {detail}"),
            Self::ForeignKeyViolation { detail } => {
                write!(f, "referential integrity violated: {detail}")
            }
            Self::NotFound { table, key } => write!(f, "{table} row not found for key {key}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table {table} is missing"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ColumnType(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ColumnTypeError> for RepoError {
    fn from(value: ColumnTypeError) -> Self {
        Self::ColumnType(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &value {
            if code.code == ErrorCode::ConstraintViolation {
                let detail = message
                    .clone()
                    .unwrap_or_else(|| "constraint violation".to_string());
                match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                        return Self::UniqueViolation { detail };
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        return Self::ForeignKeyViolation { detail };
                    }
                    _ => {}
                }
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies the connection carries the fully applied schema and every table
/// the caller depends on.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required: &[&TableDef],
) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in required {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table.name],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::MissingRequiredTable(table.name));
        }
    }

    Ok(())
}

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(column: &str, text: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{text}` in {column}")))
}

pub(crate) fn parse_opt_date(column: &str, text: Option<&str>) -> RepoResult<Option<NaiveDate>> {
    text.map(|value| parse_date(column, value)).transpose()
}

pub(crate) fn parse_decimal(column: &str, text: &str) -> RepoResult<Decimal> {
    Decimal::from_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid decimal value `{text}` in {column}")))
}
