//! Domain records for the roster database.
//!
//! # Responsibility
//! - Define the record shapes persisted by the repository layer.
//! - Keep write-boundary validation next to the data it guards.
//!
//! # Invariants
//! - Record identity fields mirror the declared table keys in
//!   `crate::schema`.
//! - Date fields carry calendar dates only; truncation happens before a
//!   value reaches a model.

pub mod assignment;
pub mod department;
pub mod employee;
pub mod position;
