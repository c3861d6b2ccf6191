//! Department repository contract and SQLite implementation.
//!
//! # Invariants
//! - No cascade is declared below Departments: deleting a referenced
//!   department surfaces as `ForeignKeyViolation`.

use crate::model::department::Department;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use crate::schema::DEPARTMENTS;
use rusqlite::{Connection, Row};

/// Repository interface for department CRUD operations.
pub trait DepartmentRepository {
    fn create_department(&self, department: &Department) -> RepoResult<()>;
    fn get_department(&self, department_code: &str) -> RepoResult<Option<Department>>;
    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    /// Deletes a department. Fails with `ForeignKeyViolation` while
    /// assignment rows still reference it.
    fn delete_department(&self, department_code: &str) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&DEPARTMENTS])?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, department: &Department) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO \"Departments\" (\"DepartmentCode\") VALUES (?1);",
            [&department.department_code],
        )?;

        Ok(())
    }

    fn get_department(&self, department_code: &str) -> RepoResult<Option<Department>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"DepartmentCode\" FROM \"Departments\" WHERE \"DepartmentCode\" = ?1;",
        )?;

        let mut rows = stmt.query([department_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }

        Ok(None)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"DepartmentCode\" FROM \"Departments\" ORDER BY \"DepartmentCode\";",
        )?;

        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }

        Ok(departments)
    }

    fn delete_department(&self, department_code: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM \"Departments\" WHERE \"DepartmentCode\" = ?1;",
            [department_code],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: DEPARTMENTS.name,
                key: department_code.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    Ok(Department {
        department_code: row.get("DepartmentCode")?,
    })
}
