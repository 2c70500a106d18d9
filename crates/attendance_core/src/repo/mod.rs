//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define whole-sheet load/save contracts for attendance marks.
//! - Isolate CSV and file-replacement details from service orchestration.
//!
//! # Invariants
//! - Read paths reject malformed rows instead of masking them.
//! - Write paths persist every mark in book order behind the fixed header.

pub mod sheet_codec;
pub mod sheet_repo;
