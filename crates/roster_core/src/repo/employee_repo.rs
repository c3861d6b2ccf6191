//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `Employees` table.
//! - Apply the declared fixed default when a caller creates an employee
//!   without a number.
//!
//! # Invariants
//! - Deleting an employee removes its assignment rows through the declared
//!   cascade, inside one transaction.
//! - The fixed default is a constant, not a sequence; a second unspecified
//!   insert collides and surfaces as `UniqueViolation`.

use crate::model::employee::{Employee, EmployeeNo};
use crate::repo::{
    ensure_connection_ready, format_date, parse_date, RepoError, RepoResult,
};
use crate::schema::{DEFAULT_EMPLOYEE_NO, EMPLOYEES, EMPLOYEE_DEPARTMENTS, EMPLOYEE_POSITIONS};
use rusqlite::{params, Connection, Row, TransactionBehavior};

/// Repository interface for employee CRUD operations.
pub trait EmployeeRepository {
    /// Inserts an employee and returns the persisted number. When the model
    /// carries no number, the declared default `10000` is applied at the
    /// storage boundary.
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeNo>;
    fn update_employee(&self, employee: &Employee) -> RepoResult<()>;
    fn get_employee(&self, employee_no: EmployeeNo) -> RepoResult<Option<Employee>>;
    fn list_employees(&self) -> RepoResult<Vec<Employee>>;
    /// Deletes an employee and, through the declared cascade, every
    /// assignment row referencing it.
    fn delete_employee(&mut self, employee_no: EmployeeNo) -> RepoResult<()>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[&EMPLOYEES, &EMPLOYEE_POSITIONS, &EMPLOYEE_DEPARTMENTS],
        )?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, employee: &Employee) -> RepoResult<EmployeeNo> {
        let employee_no = employee.employee_no.unwrap_or(DEFAULT_EMPLOYEE_NO);

        self.conn.execute(
            "INSERT INTO \"Employees\" (\"EmployeeNo\", \"BirthDate\") VALUES (?1, ?2);",
            params![employee_no, format_date(employee.birth_date)],
        )?;

        Ok(employee_no)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<()> {
        let employee_no = employee.employee_no.ok_or_else(|| {
            RepoError::InvalidData("employee number is required for update".to_string())
        })?;

        let changed = self.conn.execute(
            "UPDATE \"Employees\" SET \"BirthDate\" = ?2 WHERE \"EmployeeNo\" = ?1;",
            params![employee_no, format_date(employee.birth_date)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: EMPLOYEES.name,
                key: employee_no.to_string(),
            });
        }

        Ok(())
    }

    fn get_employee(&self, employee_no: EmployeeNo) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"BirthDate\" FROM \"Employees\" WHERE \"EmployeeNo\" = ?1;",
        )?;

        let mut rows = stmt.query([employee_no])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"BirthDate\" FROM \"Employees\" ORDER BY \"EmployeeNo\";",
        )?;

        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn delete_employee(&mut self, employee_no: EmployeeNo) -> RepoResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "DELETE FROM \"Employees\" WHERE \"EmployeeNo\" = ?1;",
            [employee_no],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: EMPLOYEES.name,
                key: employee_no.to_string(),
            });
        }

        tx.commit()?;
        Ok(())
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let employee_no: EmployeeNo = row.get("EmployeeNo")?;
    let birth_text: String = row.get("BirthDate")?;
    let birth_date = parse_date("Employees.BirthDate", &birth_text)?;

    Ok(Employee {
        employee_no: Some(employee_no),
        birth_date,
    })
}
