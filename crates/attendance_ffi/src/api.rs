//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the attendance store to the interaction surface via FRB.
//! - Turn every core result into a display-ready response envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide store; `open_attendance` replaces it.
//! - Calls made before `open_attendance` fail with a message instead of
//!   touching any file.

use attendance_core::{
    core_version as core_version_inner, default_sheet_path, init_logging as init_logging_inner,
    ping as ping_inner, AttendanceStore, CsvSheetRepository, Hydration, Mark, StoreError,
    TableCell,
};
use log::warn;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;

static STORE: Lazy<Mutex<Option<AttendanceStore<CsvSheetRepository>>>> =
    Lazy::new(|| Mutex::new(None));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Startup hydration result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationResponse {
    /// Whether the store is open and usable.
    pub ok: bool,
    /// Whether an existing sheet was loaded.
    pub loaded_existing: bool,
    /// Human-readable startup notice or error.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowItem {
    pub student_name: String,
    pub subject_code: String,
    /// Two-decimal percentage or `-`, aligned with `TableResponse::columns`.
    pub cells: Vec<String>,
}

/// Rendered attendance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResponse {
    /// Known subjects in display order.
    pub columns: Vec<String>,
    pub rows: Vec<TableRowItem>,
    /// Empty on success.
    pub message: String,
}

/// Per-subject percentage messages for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentageResponse {
    pub ok: bool,
    /// One sentence per subject, e.g. `Alice's attendance percentage in CS101 is 75.00%`.
    pub messages: Vec<String>,
    /// Error text when `ok` is false.
    pub message: String,
}

/// Opens the process store at `sheet_path` (default: `attendance.csv` in the
/// working directory) and hydrates it.
///
/// # FFI contract
/// - Sync call; reads the sheet file once.
/// - A missing sheet is success with a "starting fresh" notice.
/// - A malformed sheet fails and leaves no store open.
#[flutter_rust_bridge::frb(sync)]
pub fn open_attendance(sheet_path: Option<String>) -> HydrationResponse {
    let path = resolve_sheet_path(sheet_path);
    let mut guard = match STORE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    match AttendanceStore::open_file(path) {
        Ok(store) => {
            let hydration = store.hydration();
            *guard = Some(store);
            HydrationResponse {
                ok: true,
                loaded_existing: matches!(hydration, Hydration::Loaded { .. }),
                message: hydration.message(),
            }
        }
        Err(err) => {
            *guard = None;
            HydrationResponse {
                ok: false,
                loaded_existing: false,
                message: format!("open_attendance failed: {err}"),
            }
        }
    }
}

/// Records a Present mark and saves the sheet.
#[flutter_rust_bridge::frb(sync)]
pub fn mark_present(student_name: String, subject_code: String) -> ActionResponse {
    record(student_name, subject_code, Mark::Present)
}

/// Records an Absent mark and saves the sheet.
#[flutter_rust_bridge::frb(sync)]
pub fn mark_absent(student_name: String, subject_code: String) -> ActionResponse {
    record(student_name, subject_code, Mark::Absent)
}

/// Adds a subject column without recording marks.
#[flutter_rust_bridge::frb(sync)]
pub fn add_subject(subject_code: String) -> ActionResponse {
    let result = with_store(|store| {
        store.add_subject(&subject_code).map_err(|err| match err {
            StoreError::Validation(_) => "Please enter a subject code".to_string(),
            other => user_message(other),
        })
    });
    match result {
        Ok(true) => ActionResponse::success("Subject added."),
        Ok(false) => ActionResponse::success("Subject already exists."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Renders the current attendance table.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_table() -> TableResponse {
    match with_store(|store| Ok(store.snapshot_table())) {
        Ok(table) => TableResponse {
            columns: table.columns,
            rows: table
                .rows
                .into_iter()
                .map(|row| TableRowItem {
                    student_name: row.student_name,
                    subject_code: row.subject_code,
                    cells: row.cells.iter().map(TableCell::render).collect(),
                })
                .collect(),
            message: String::new(),
        },
        Err(message) => TableResponse {
            columns: Vec::new(),
            rows: Vec::new(),
            message,
        },
    }
}

/// Returns one percentage message per subject the student has marks in.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_percentages(student_name: String) -> PercentageResponse {
    if student_name.is_empty() {
        return PercentageResponse {
            ok: false,
            messages: Vec::new(),
            message: "Please enter a student name".to_string(),
        };
    }

    match with_store(|store| {
        store
            .student_percentages(&student_name)
            .map_err(user_message)
    }) {
        Ok(percentages) => PercentageResponse {
            ok: true,
            messages: percentages.iter().map(|item| item.message()).collect(),
            message: String::new(),
        },
        Err(message) => PercentageResponse {
            ok: false,
            messages: Vec::new(),
            message,
        },
    }
}

fn record(student_name: String, subject_code: String, mark: Mark) -> ActionResponse {
    let result = with_store(|store| {
        store
            .record_mark(&student_name, &subject_code, mark)
            .map_err(user_message)
    });
    match result {
        Ok(()) => ActionResponse::success("Attendance saved."),
        Err(message) => ActionResponse::failure(message),
    }
}

fn user_message(err: StoreError) -> String {
    match err {
        StoreError::Validation(_) => "Please enter student name and subject code".to_string(),
        StoreError::StudentNotFound(_) => "No attendance record found for this student".to_string(),
        StoreError::Sheet(err) => format!("Attendance recorded but not saved: {err}"),
    }
}

fn resolve_sheet_path(sheet_path: Option<String>) -> PathBuf {
    match sheet_path {
        Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => default_sheet_path(),
    }
}

fn with_store<T>(
    f: impl FnOnce(&mut AttendanceStore<CsvSheetRepository>) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = match STORE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    match guard.as_mut() {
        Some(store) => f(store),
        None => {
            warn!("event=ffi_call module=ffi status=error error_code=store_not_open");
            Err("attendance store is not open; call open_attendance first".to_string())
        }
    }
}
