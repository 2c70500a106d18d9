//! Attendance domain model.
//!
//! # Responsibility
//! - Define the mark/record/book data structures used by core business logic.
//! - Own invariants and aggregation so storage and UI layers never re-derive them.
//!
//! # Invariants
//! - Students and subjects are identified by exact, non-empty strings.
//! - Records are append-only and never empty.
//!
//! # See also
//! - `crate::repo::sheet_repo` for the persisted row shape.

pub mod book;
pub mod mark;
pub mod table;
