use chrono::NaiveDate;
use roster_core::db::open_db_in_memory;
use roster_core::{
    date_only, Employee, EmployeeRepository, RepoError, SqliteEmployeeRepository,
    DEFAULT_EMPLOYEE_NO,
};
use rusqlite::Connection;

#[test]
fn create_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let employee = Employee::with_no(1001, date(1985, 3, 12));
    let employee_no = repo.create_employee(&employee).unwrap();
    assert_eq!(employee_no, 1001);

    let loaded = repo.get_employee(1001).unwrap().unwrap();
    assert_eq!(loaded.employee_no, Some(1001));
    assert_eq!(loaded.birth_date, date(1985, 3, 12));
}

#[test]
fn unspecified_employee_no_receives_declared_default() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let employee_no = repo
        .create_employee(&Employee::new(date(1990, 5, 1)))
        .unwrap();
    assert_eq!(employee_no, DEFAULT_EMPLOYEE_NO);

    let loaded = repo.get_employee(DEFAULT_EMPLOYEE_NO).unwrap().unwrap();
    assert_eq!(loaded.birth_date, date(1990, 5, 1));
}

// The declared default is a fixed constant, not a sequence: a second
// unspecified insert collides on the primary key.
#[test]
fn second_unspecified_employee_no_collides() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    repo.create_employee(&Employee::new(date(1990, 5, 1)))
        .unwrap();
    let err = repo
        .create_employee(&Employee::new(date(1991, 6, 2)))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation { .. }));
}

#[test]
fn duplicate_explicit_employee_no_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    repo.create_employee(&Employee::with_no(1001, date(1985, 3, 12)))
        .unwrap();
    let err = repo
        .create_employee(&Employee::with_no(1001, date(1970, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation { .. }));
}

#[test]
fn birth_timestamp_is_truncated_to_calendar_date() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let birth = date(1990, 5, 1).and_hms_opt(13, 45, 0).unwrap();
    let employee = Employee::born_at(Some(1002), birth);
    repo.create_employee(&employee).unwrap();

    let loaded = repo.get_employee(1002).unwrap().unwrap();
    assert_eq!(loaded.birth_date, date(1990, 5, 1));
    assert_eq!(loaded.birth_date, date_only(birth));
    assert_eq!(
        loaded.birth_date.and_hms_opt(0, 0, 0).unwrap(),
        date(1990, 5, 1).and_hms_opt(0, 0, 0).unwrap()
    );
}

#[test]
fn update_existing_employee() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let mut employee = Employee::with_no(1003, date(1980, 1, 1));
    repo.create_employee(&employee).unwrap();

    employee.birth_date = date(1980, 12, 31);
    repo.update_employee(&employee).unwrap();

    let loaded = repo.get_employee(1003).unwrap().unwrap();
    assert_eq!(loaded.birth_date, date(1980, 12, 31));
}

#[test]
fn update_missing_employee_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let err = repo
        .update_employee(&Employee::with_no(4040, date(1970, 1, 1)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "Employees",
            ..
        }
    ));
}

#[test]
fn delete_missing_employee_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    let err = repo.delete_employee(4040).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn list_returns_employees_ordered_by_number() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    repo.create_employee(&Employee::with_no(1003, date(1982, 7, 9)))
        .unwrap();
    repo.create_employee(&Employee::with_no(1001, date(1985, 3, 12)))
        .unwrap();
    repo.create_employee(&Employee::with_no(1002, date(1990, 5, 1)))
        .unwrap();

    let listed = repo.list_employees().unwrap();
    let numbers: Vec<_> = listed.iter().map(|e| e.employee_no).collect();
    assert_eq!(numbers, vec![Some(1001), Some(1002), Some(1003)]);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let mut conn = Connection::open_in_memory().unwrap();

    let result = SqliteEmployeeRepository::try_new(&mut conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
