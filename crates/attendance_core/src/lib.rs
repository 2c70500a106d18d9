//! Core domain logic for the attendance ledger.
//! This crate is the single source of truth for attendance invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::book::{AttendanceBook, MarkEntry, ValidationError};
pub use model::mark::{AttendanceRecord, Mark};
pub use model::table::{AttendanceTable, SubjectPercentage, TableCell, TableRow, NOT_APPLICABLE};
pub use repo::sheet_codec::SHEET_HEADER;
pub use repo::sheet_repo::{
    default_sheet_path, CsvSheetRepository, MemorySheetRepository, SheetError, SheetRepository,
    SheetResult, SheetRow, DEFAULT_SHEET_FILE_NAME,
};
pub use service::attendance_store::{AttendanceStore, Hydration, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
