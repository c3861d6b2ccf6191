//! Position repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths persist the canonical two-decimal salary text produced by
//!   `Position::canonical_salary()`; nothing else reaches the column.
//! - No cascade is declared below Positions: deleting a referenced position
//!   surfaces as `ForeignKeyViolation`.

use crate::model::position::Position;
use crate::repo::{ensure_connection_ready, parse_decimal, RepoError, RepoResult};
use crate::schema::POSITIONS;
use rusqlite::{params, Connection, Row};

/// Repository interface for position CRUD operations.
pub trait PositionRepository {
    fn create_position(&self, position: &Position) -> RepoResult<()>;
    fn update_position(&self, position: &Position) -> RepoResult<()>;
    fn get_position(&self, position_code: &str) -> RepoResult<Option<Position>>;
    fn list_positions(&self) -> RepoResult<Vec<Position>>;
    /// Deletes a position. Fails with `ForeignKeyViolation` while assignment
    /// rows still reference it.
    fn delete_position(&self, position_code: &str) -> RepoResult<()>;
}

/// SQLite-backed position repository.
pub struct SqlitePositionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePositionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&POSITIONS])?;
        Ok(Self { conn })
    }
}

impl PositionRepository for SqlitePositionRepository<'_> {
    fn create_position(&self, position: &Position) -> RepoResult<()> {
        let salary = position.canonical_salary()?;

        self.conn.execute(
            "INSERT INTO \"Positions\" (\"PositionCode\", \"Salary\") VALUES (?1, ?2);",
            params![position.position_code, salary.to_string()],
        )?;

        Ok(())
    }

    fn update_position(&self, position: &Position) -> RepoResult<()> {
        let salary = position.canonical_salary()?;

        let changed = self.conn.execute(
            "UPDATE \"Positions\" SET \"Salary\" = ?2 WHERE \"PositionCode\" = ?1;",
            params![position.position_code, salary.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: POSITIONS.name,
                key: position.position_code.clone(),
            });
        }

        Ok(())
    }

    fn get_position(&self, position_code: &str) -> RepoResult<Option<Position>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"PositionCode\", \"Salary\" FROM \"Positions\" WHERE \"PositionCode\" = ?1;",
        )?;

        let mut rows = stmt.query([position_code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_position_row(row)?));
        }

        Ok(None)
    }

    fn list_positions(&self) -> RepoResult<Vec<Position>> {
        let mut stmt = self.conn.prepare(
            "SELECT \"PositionCode\", \"Salary\" FROM \"Positions\" ORDER BY \"PositionCode\";",
        )?;

        let mut rows = stmt.query([])?;
        let mut positions = Vec::new();
        while let Some(row) = rows.next()? {
            positions.push(parse_position_row(row)?);
        }

        Ok(positions)
    }

    fn delete_position(&self, position_code: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM \"Positions\" WHERE \"PositionCode\" = ?1;",
            [position_code],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: POSITIONS.name,
                key: position_code.to_string(),
            });
        }

        Ok(())
    }
}

fn parse_position_row(row: &Row<'_>) -> RepoResult<Position> {
    let position_code: String = row.get("PositionCode")?;
    let salary_text: String = row.get("Salary")?;
    let salary = parse_decimal("Positions.Salary", &salary_text)?;

    Ok(Position {
        position_code,
        salary,
    })
}
