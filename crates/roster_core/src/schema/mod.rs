//! Relational schema description for the roster database.
//!
//! # Responsibility
//! - Declare entity shapes, keys, column storage semantics and relationships
//!   as static data consumed by the storage layer at initialization.
//! - Render the declarations into SQLite DDL.
//! - Enforce declared column storage bounds at the write boundary.
//!
//! # Invariants
//! - `TABLES` and `RELATIONSHIPS` must pass `validate()` before any DDL is
//!   applied.
//! - Deleting an Employee cascades into its assignment rows; deleting a
//!   referenced Position or Department is rejected by the storage engine.
//! - Date columns carry calendar dates only; fixed-point columns never pass
//!   through floating point.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter, Write};

/// Fixed server-side default applied when a caller creates an Employee
/// without a number. This is a constant, not a sequence: a second
/// unspecified insert collides on the primary key. Kept as declared by the
/// source schema.
pub const DEFAULT_EMPLOYEE_NO: i64 = 10000;

/// Storage representation of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStorage {
    Integer,
    Text,
    /// Calendar date without a time component, persisted as ISO-8601 text.
    DateOnly,
    /// Fixed-point number persisted as canonical text with exactly `scale`
    /// fractional digits. SQLite has no decimal storage class, and NUMERIC
    /// affinity would coerce the value through floating point.
    Decimal { precision: u32, scale: u32 },
}

/// One declared column of a table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub storage: ColumnStorage,
    pub nullable: bool,
    /// SQL fragment for a server-side default, if declared.
    pub default_sql: Option<&'static str>,
}

/// One declared table with its primary (possibly composite) key.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub key: &'static [&'static str],
}

/// Behavior when a parent row with dependents is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Dependent rows are deleted with the parent.
    Cascade,
    /// Deletion is rejected while dependents exist.
    Restrict,
}

/// One declared one-to-many relationship, keyed by table names.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipDef {
    pub parent: &'static str,
    pub child: &'static str,
    /// Child columns referencing the parent key, in parent-key order.
    pub foreign_key: &'static [&'static str],
    pub on_delete: DeletePolicy,
}

pub const EMPLOYEES: TableDef = TableDef {
    name: "Employees",
    columns: &[
        ColumnDef {
            name: "EmployeeNo",
            storage: ColumnStorage::Integer,
            nullable: false,
            default_sql: Some("10000"),
        },
        ColumnDef {
            name: "BirthDate",
            storage: ColumnStorage::DateOnly,
            nullable: false,
            default_sql: None,
        },
    ],
    key: &["EmployeeNo"],
};

pub const POSITIONS: TableDef = TableDef {
    name: "Positions",
    columns: &[
        ColumnDef {
            name: "PositionCode",
            storage: ColumnStorage::Text,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "Salary",
            storage: ColumnStorage::Decimal {
                precision: 10,
                scale: 2,
            },
            nullable: false,
            default_sql: None,
        },
    ],
    key: &["PositionCode"],
};

pub const DEPARTMENTS: TableDef = TableDef {
    name: "Departments",
    columns: &[ColumnDef {
        name: "DepartmentCode",
        storage: ColumnStorage::Text,
        nullable: false,
        default_sql: None,
    }],
    key: &["DepartmentCode"],
};

pub const EMPLOYEE_POSITIONS: TableDef = TableDef {
    name: "EmployeePositions",
    columns: &[
        ColumnDef {
            name: "EmployeeNo",
            storage: ColumnStorage::Integer,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "PositionCode",
            storage: ColumnStorage::Text,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "From",
            storage: ColumnStorage::DateOnly,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "To",
            storage: ColumnStorage::DateOnly,
            nullable: true,
            default_sql: None,
        },
    ],
    key: &["EmployeeNo", "PositionCode"],
};

pub const EMPLOYEE_DEPARTMENTS: TableDef = TableDef {
    name: "EmployeeDepartments",
    columns: &[
        ColumnDef {
            name: "EmployeeNo",
            storage: ColumnStorage::Integer,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "DepartmentCode",
            storage: ColumnStorage::Text,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "From",
            storage: ColumnStorage::DateOnly,
            nullable: false,
            default_sql: None,
        },
        ColumnDef {
            name: "To",
            storage: ColumnStorage::DateOnly,
            nullable: true,
            default_sql: None,
        },
    ],
    key: &["EmployeeNo", "DepartmentCode"],
};

/// All declared tables, in creation order (parents before children).
pub const TABLES: &[&TableDef] = &[
    &EMPLOYEES,
    &POSITIONS,
    &DEPARTMENTS,
    &EMPLOYEE_POSITIONS,
    &EMPLOYEE_DEPARTMENTS,
];

/// All declared relationships. Only the Employee side cascades.
pub const RELATIONSHIPS: &[RelationshipDef] = &[
    RelationshipDef {
        parent: "Employees",
        child: "EmployeePositions",
        foreign_key: &["EmployeeNo"],
        on_delete: DeletePolicy::Cascade,
    },
    RelationshipDef {
        parent: "Positions",
        child: "EmployeePositions",
        foreign_key: &["PositionCode"],
        on_delete: DeletePolicy::Restrict,
    },
    RelationshipDef {
        parent: "Employees",
        child: "EmployeeDepartments",
        foreign_key: &["EmployeeNo"],
        on_delete: DeletePolicy::Cascade,
    },
    RelationshipDef {
        parent: "Departments",
        child: "EmployeeDepartments",
        foreign_key: &["DepartmentCode"],
        on_delete: DeletePolicy::Restrict,
    },
];

/// Declaration error found while validating a schema description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    EmptyKey {
        table: &'static str,
    },
    DuplicateColumn {
        table: &'static str,
        column: &'static str,
    },
    UnknownKeyColumn {
        table: &'static str,
        column: &'static str,
    },
    UnknownTable {
        name: &'static str,
    },
    UnknownForeignKeyColumn {
        child: &'static str,
        column: &'static str,
    },
    ForeignKeyArity {
        parent: &'static str,
        child: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey { table } => write!(f, "table {table} declares no key columns"),
            Self::DuplicateColumn { table, column } => {
                write!(f, "table {table} declares column {column} twice")
            }
            Self::UnknownKeyColumn { table, column } => {
                write!(f, "key column {column} is not declared on table {table}")
            }
            Self::UnknownTable { name } => {
                write!(f, "relationship references undeclared table {name}")
            }
            Self::UnknownForeignKeyColumn { child, column } => write!(
                f,
                "foreign key column {column} is not declared on table {child}"
            ),
            Self::ForeignKeyArity {
                parent,
                child,
                expected,
                actual,
            } => write!(
                f,
                "foreign key from {child} to {parent} has {actual} columns, parent key has {expected}"
            ),
        }
    }
}

impl Error for SchemaError {}

/// Declared column value rejected at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTypeError {
    /// More fractional digits than the declared scale allows.
    ScaleExceeded {
        column: &'static str,
        value: String,
        scale: u32,
    },
    /// More integer digits than the declared precision leaves room for.
    PrecisionExceeded {
        column: &'static str,
        value: String,
        precision: u32,
        scale: u32,
    },
}

impl Display for ColumnTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScaleExceeded {
                column,
                value,
                scale,
            } => write!(
                f,
                "value {value} for column {column} has more than {scale} fractional digits"
            ),
            Self::PrecisionExceeded {
                column,
                value,
                precision,
                scale,
            } => write!(
                f,
                "value {value} for column {column} does not fit decimal({precision},{scale})"
            ),
        }
    }
}

impl Error for ColumnTypeError {}

/// Checks a schema description for internal consistency.
///
/// # Contract
/// - Every table must declare a non-empty key of declared columns.
/// - Every relationship must reference declared tables, use declared child
///   columns, and match the parent key column count.
pub fn validate(tables: &[&TableDef], relationships: &[RelationshipDef]) -> Result<(), SchemaError> {
    for table in tables {
        for (index, column) in table.columns.iter().enumerate() {
            if table.columns[..index].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: table.name,
                    column: column.name,
                });
            }
        }

        if table.key.is_empty() {
            return Err(SchemaError::EmptyKey { table: table.name });
        }
        for key_column in table.key {
            if !table.columns.iter().any(|c| c.name == *key_column) {
                return Err(SchemaError::UnknownKeyColumn {
                    table: table.name,
                    column: key_column,
                });
            }
        }
    }

    for relationship in relationships {
        let parent = find_table(tables, relationship.parent).ok_or(SchemaError::UnknownTable {
            name: relationship.parent,
        })?;
        let child = find_table(tables, relationship.child).ok_or(SchemaError::UnknownTable {
            name: relationship.child,
        })?;

        if relationship.foreign_key.len() != parent.key.len() {
            return Err(SchemaError::ForeignKeyArity {
                parent: parent.name,
                child: child.name,
                expected: parent.key.len(),
                actual: relationship.foreign_key.len(),
            });
        }
        for fk_column in relationship.foreign_key {
            if !child.columns.iter().any(|c| c.name == *fk_column) {
                return Err(SchemaError::UnknownForeignKeyColumn {
                    child: child.name,
                    column: fk_column,
                });
            }
        }
    }

    Ok(())
}

/// Renders a validated schema description into SQLite DDL.
///
/// Identifiers are double-quoted; `From`/`To` are SQL keywords.
pub fn render_ddl(tables: &[&TableDef], relationships: &[RelationshipDef]) -> String {
    let mut ddl = String::new();

    for table in tables {
        let _ = write!(ddl, "CREATE TABLE IF NOT EXISTS \"{}\" (", table.name);

        for (index, column) in table.columns.iter().enumerate() {
            if index > 0 {
                ddl.push(',');
            }
            let _ = write!(
                ddl,
                "\n    \"{}\" {}",
                column.name,
                storage_sql(column.storage)
            );
            if !column.nullable {
                ddl.push_str(" NOT NULL");
            }
            if let Some(default_sql) = column.default_sql {
                let _ = write!(ddl, " DEFAULT {default_sql}");
            }
        }

        let _ = write!(ddl, ",\n    PRIMARY KEY ({})", quoted_list(table.key));

        for relationship in relationships.iter().filter(|r| r.child == table.name) {
            let parent_key = find_table(tables, relationship.parent)
                .map(|parent| parent.key)
                .unwrap_or_default();
            let _ = write!(
                ddl,
                ",\n    FOREIGN KEY ({}) REFERENCES \"{}\" ({}) ON DELETE {}",
                quoted_list(relationship.foreign_key),
                relationship.parent,
                quoted_list(parent_key),
                delete_policy_sql(relationship.on_delete)
            );
        }

        ddl.push_str("\n);\n");
    }

    ddl
}

/// Truncates a timestamp to its calendar date, per date-only column
/// semantics: any time-of-day component is discarded before storage.
pub fn date_only(value: NaiveDateTime) -> NaiveDate {
    value.date()
}

/// Checks a fixed-point value against a declared precision and scale,
/// returning the canonical value carrying exactly `scale` fractional digits.
pub fn check_decimal(
    column: &'static str,
    value: Decimal,
    precision: u32,
    scale: u32,
) -> Result<Decimal, ColumnTypeError> {
    if value.normalize().scale() > scale {
        return Err(ColumnTypeError::ScaleExceeded {
            column,
            value: value.to_string(),
            scale,
        });
    }

    let mut canonical = value;
    canonical.rescale(scale);

    let integer_digits = canonical.abs().trunc().to_string().len();
    if integer_digits > (precision - scale) as usize {
        return Err(ColumnTypeError::PrecisionExceeded {
            column,
            value: value.to_string(),
            precision,
            scale,
        });
    }

    Ok(canonical)
}

fn find_table<'a>(tables: &'a [&TableDef], name: &str) -> Option<&'a TableDef> {
    tables.iter().find(|table| table.name == name).copied()
}

fn storage_sql(storage: ColumnStorage) -> &'static str {
    match storage {
        ColumnStorage::Integer => "INTEGER",
        ColumnStorage::Text | ColumnStorage::DateOnly | ColumnStorage::Decimal { .. } => "TEXT",
    }
}

fn delete_policy_sql(policy: DeletePolicy) -> &'static str {
    match policy {
        DeletePolicy::Cascade => "CASCADE",
        DeletePolicy::Restrict => "RESTRICT",
    }
}

fn quoted_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{
        check_decimal, date_only, render_ddl, validate, ColumnDef, ColumnStorage, ColumnTypeError,
        DeletePolicy, RelationshipDef, SchemaError, TableDef, RELATIONSHIPS, TABLES,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn declared_schema_is_internally_consistent() {
        validate(TABLES, RELATIONSHIPS).expect("declared schema should validate");
    }

    #[test]
    fn validate_rejects_key_column_missing_from_table() {
        let table = TableDef {
            name: "Broken",
            columns: &[ColumnDef {
                name: "Present",
                storage: ColumnStorage::Integer,
                nullable: false,
                default_sql: None,
            }],
            key: &["Absent"],
        };

        let err = validate(&[&table], &[]).expect_err("missing key column must be rejected");
        assert_eq!(
            err,
            SchemaError::UnknownKeyColumn {
                table: "Broken",
                column: "Absent"
            }
        );
    }

    #[test]
    fn validate_rejects_foreign_key_arity_mismatch() {
        let relationship = RelationshipDef {
            parent: "EmployeePositions",
            child: "Employees",
            foreign_key: &["EmployeeNo"],
            on_delete: DeletePolicy::Restrict,
        };

        let err = validate(TABLES, &[relationship])
            .expect_err("single-column key against composite parent must be rejected");
        assert!(matches!(err, SchemaError::ForeignKeyArity { .. }));
    }

    #[test]
    fn rendered_ddl_declares_cascade_and_restrict_sides() {
        let ddl = render_ddl(TABLES, RELATIONSHIPS);

        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS \"EmployeePositions\""));
        assert!(ddl.contains("PRIMARY KEY (\"EmployeeNo\", \"PositionCode\")"));
        assert!(ddl.contains(
            "FOREIGN KEY (\"EmployeeNo\") REFERENCES \"Employees\" (\"EmployeeNo\") ON DELETE CASCADE"
        ));
        assert!(ddl.contains(
            "FOREIGN KEY (\"PositionCode\") REFERENCES \"Positions\" (\"PositionCode\") ON DELETE RESTRICT"
        ));
        assert!(ddl.contains("\"EmployeeNo\" INTEGER NOT NULL DEFAULT 10000"));
    }

    #[test]
    fn date_only_discards_time_of_day() {
        let birth = NaiveDate::from_ymd_opt(1990, 5, 1)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        assert_eq!(
            date_only(birth),
            NaiveDate::from_ymd_opt(1990, 5, 1).unwrap()
        );
    }

    #[test]
    fn check_decimal_accepts_full_width_value() {
        let canonical = check_decimal("Salary", dec!(12345678.99), 10, 2).unwrap();
        assert_eq!(canonical.to_string(), "12345678.99");
    }

    #[test]
    fn check_decimal_pads_to_declared_scale() {
        let canonical = check_decimal("Salary", dec!(950), 10, 2).unwrap();
        assert_eq!(canonical.to_string(), "950.00");
    }

    #[test]
    fn check_decimal_rejects_nine_integer_digits() {
        let err = check_decimal("Salary", dec!(123456789.00), 10, 2).unwrap_err();
        assert!(matches!(err, ColumnTypeError::PrecisionExceeded { .. }));
    }

    #[test]
    fn check_decimal_rejects_excess_fractional_digits() {
        let err = check_decimal("Salary", dec!(1.999), 10, 2).unwrap_err();
        assert!(matches!(
            err,
            ColumnTypeError::ScaleExceeded { scale: 2, .. }
        ));
    }
}
