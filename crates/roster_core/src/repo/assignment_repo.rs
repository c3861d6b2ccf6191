//! Assignment repositories for the two join tables.
//!
//! # Responsibility
//! - Provide CRUD over `EmployeePositions` and `EmployeeDepartments`, keyed
//!   by their composite identities.
//!
//! # Invariants
//! - Inserts referencing a missing parent row fail with
//!   `ForeignKeyViolation`; duplicate composite keys fail with
//!   `UniqueViolation`. Both are detected by the storage engine.
//! - Assignment rows disappear automatically when their employee is
//!   deleted (declared cascade); never when a position or department is.

use crate::model::assignment::{EmployeeDepartment, EmployeePosition};
use crate::model::employee::EmployeeNo;
use crate::repo::{
    ensure_connection_ready, format_date, parse_date, parse_opt_date, RepoError, RepoResult,
};
use crate::schema::{
    DEPARTMENTS, EMPLOYEES, EMPLOYEE_DEPARTMENTS, EMPLOYEE_POSITIONS, POSITIONS,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

/// Repository interface for employee-position assignments.
pub trait EmployeePositionRepository {
    fn assign_position(&self, assignment: &EmployeePosition) -> RepoResult<()>;
    fn get_position_assignment(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
    ) -> RepoResult<Option<EmployeePosition>>;
    fn list_positions_for_employee(
        &self,
        employee_no: EmployeeNo,
    ) -> RepoResult<Vec<EmployeePosition>>;
    /// Replaces the assignment period for an existing composite key.
    fn update_position_period(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> RepoResult<()>;
    fn remove_position_assignment(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
    ) -> RepoResult<()>;
}

/// Repository interface for employee-department assignments.
pub trait EmployeeDepartmentRepository {
    fn assign_department(&self, assignment: &EmployeeDepartment) -> RepoResult<()>;
    fn get_department_assignment(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
    ) -> RepoResult<Option<EmployeeDepartment>>;
    fn list_departments_for_employee(
        &self,
        employee_no: EmployeeNo,
    ) -> RepoResult<Vec<EmployeeDepartment>>;
    fn update_department_period(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> RepoResult<()>;
    fn remove_department_assignment(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
    ) -> RepoResult<()>;
}

/// SQLite-backed employee-position assignment repository.
pub struct SqliteEmployeePositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeePositionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&EMPLOYEE_POSITIONS, &EMPLOYEES, &POSITIONS])?;
        Ok(Self { conn })
    }
}

impl EmployeePositionRepository for SqliteEmployeePositionRepository<'_> {
    fn assign_position(&self, assignment: &EmployeePosition) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO \"EmployeePositions\"
                (\"EmployeeNo\", \"PositionCode\", \"From\", \"To\")
             VALUES (?1, ?2, ?3, ?4);",
            params![
                assignment.employee_no,
                assignment.position_code,
                format_date(assignment.from),
                assignment.to.map(format_date),
            ],
        )?;

        Ok(())
    }

    fn get_position_assignment(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
    ) -> RepoResult<Option<EmployeePosition>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"PositionCode\", \"From\", \"To\"
             FROM \"EmployeePositions\"
             WHERE \"EmployeeNo\" = ?1 AND \"PositionCode\" = ?2;",
        )?;

        let mut rows = stmt.query(params![employee_no, position_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_position_row(row)?));
        }

        Ok(None)
    }

    fn list_positions_for_employee(
        &self,
        employee_no: EmployeeNo,
    ) -> RepoResult<Vec<EmployeePosition>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"PositionCode\", \"From\", \"To\"
             FROM \"EmployeePositions\"
             WHERE \"EmployeeNo\" = ?1
             ORDER BY \"From\", \"PositionCode\";",
        )?;

        let mut rows = stmt.query([employee_no])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_employee_position_row(row)?);
        }

        Ok(assignments)
    }

    fn update_position_period(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE \"EmployeePositions\"
             SET \"From\" = ?3, \"To\" = ?4
             WHERE \"EmployeeNo\" = ?1 AND \"PositionCode\" = ?2;",
            params![
                employee_no,
                position_code,
                format_date(from),
                to.map(format_date)
            ],
        )?;

        if changed == 0 {
            return Err(not_found(EMPLOYEE_POSITIONS.name, employee_no, position_code));
        }

        Ok(())
    }

    fn remove_position_assignment(
        &self,
        employee_no: EmployeeNo,
        position_code: &str,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM \"EmployeePositions\"
             WHERE \"EmployeeNo\" = ?1 AND \"PositionCode\" = ?2;",
            params![employee_no, position_code],
        )?;

        if changed == 0 {
            return Err(not_found(EMPLOYEE_POSITIONS.name, employee_no, position_code));
        }

        Ok(())
    }
}

/// SQLite-backed employee-department assignment repository.
pub struct SqliteEmployeeDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&EMPLOYEE_DEPARTMENTS, &EMPLOYEES, &DEPARTMENTS])?;
        Ok(Self { conn })
    }
}

impl EmployeeDepartmentRepository for SqliteEmployeeDepartmentRepository<'_> {
    fn assign_department(&self, assignment: &EmployeeDepartment) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO \"EmployeeDepartments\"
                (\"EmployeeNo\", \"DepartmentCode\", \"From\", \"To\")
             VALUES (?1, ?2, ?3, ?4);",
            params![
                assignment.employee_no,
                assignment.department_code,
                format_date(assignment.from),
                assignment.to.map(format_date),
            ],
        )?;

        Ok(())
    }

    fn get_department_assignment(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
    ) -> RepoResult<Option<EmployeeDepartment>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"DepartmentCode\", \"From\", \"To\"
             FROM \"EmployeeDepartments\"
             WHERE \"EmployeeNo\" = ?1 AND \"DepartmentCode\" = ?2;",
        )?;

        let mut rows = stmt.query(params![employee_no, department_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_department_row(row)?));
        }

        Ok(None)
    }

    fn list_departments_for_employee(
        &self,
        employee_no: EmployeeNo,
    ) -> RepoResult<Vec<EmployeeDepartment>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"EmployeeNo\", \"DepartmentCode\", \"From\", \"To\"
             FROM \"EmployeeDepartments\"
             WHERE \"EmployeeNo\" = ?1
             ORDER BY \"From\", \"DepartmentCode\";",
        )?;

        let mut rows = stmt.query([employee_no])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_employee_department_row(row)?);
        }

        Ok(assignments)
    }

    fn update_department_period(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE \"EmployeeDepartments\"
             SET \"From\" = ?3, \"To\" = ?4
             WHERE \"EmployeeNo\" = ?1 AND \"DepartmentCode\" = ?2;",
            params![
                employee_no,
                department_code,
                format_date(from),
                to.map(format_date)
            ],
        )?;

        if changed == 0 {
            return Err(not_found(
                EMPLOYEE_DEPARTMENTS.name,
                employee_no,
                department_code,
            ));
        }

        Ok(())
    }

    fn remove_department_assignment(
        &self,
        employee_no: EmployeeNo,
        department_code: &str,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM \"EmployeeDepartments\"
             WHERE \"EmployeeNo\" = ?1 AND \"DepartmentCode\" = ?2;",
            params![employee_no, department_code],
        )?;

        if changed == 0 {
            return Err(not_found(
                EMPLOYEE_DEPARTMENTS.name,
                employee_no,
                department_code,
            ));
        }

        Ok(())
    }
}

fn not_found(table: &'static str, employee_no: EmployeeNo, code: &str) -> RepoError {
    RepoError::NotFound {
        table,
        key: format!("({employee_no}, {code})"),
    }
}

fn parse_employee_position_row(row: &Row<'_>) -> RepoResult<EmployeePosition> {
    let from_text: String = row.get("From")?;
    let to_text: Option<String> = row.get("To")?;

    Ok(EmployeePosition {
        employee_no: row.get("EmployeeNo")?,
        position_code: row.get("PositionCode")?,
        from: parse_date("EmployeePositions.From", &from_text)?,
        to: parse_opt_date("EmployeePositions.To", to_text.as_deref())?,
    })
}

fn parse_employee_department_row(row: &Row<'_>) -> RepoResult<EmployeeDepartment> {
    let from_text: String = row.get("From")?;
    let to_text: Option<String> = row.get("To")?;

    Ok(EmployeeDepartment {
        employee_no: row.get("EmployeeNo")?,
        department_code: row.get("DepartmentCode")?,
        from: parse_date("EmployeeDepartments.From", &from_text)?,
        to: parse_opt_date("EmployeeDepartments.To", to_text.as_deref())?,
    })
}
