//! Relational schema and data-access core for the employee roster database.
//! This crate is the single source of truth for the declared schema and its
//! integrity rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use config::{ConfigError, StorageConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{EmployeeDepartment, EmployeePosition};
pub use model::department::Department;
pub use model::employee::{Employee, EmployeeNo};
pub use model::position::Position;
pub use repo::assignment_repo::{
    EmployeeDepartmentRepository, EmployeePositionRepository,
    SqliteEmployeeDepartmentRepository, SqliteEmployeePositionRepository,
};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::position_repo::{PositionRepository, SqlitePositionRepository};
pub use repo::{RepoError, RepoResult};
pub use schema::{date_only, ColumnTypeError, DeletePolicy, DEFAULT_EMPLOYEE_NO};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
