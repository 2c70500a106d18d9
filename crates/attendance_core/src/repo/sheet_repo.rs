//! Sheet repository contracts and file/in-memory implementations.
//!
//! # Responsibility
//! - Provide whole-sheet load and save APIs over persisted attendance rows.
//! - Keep file and CSV details inside the core persistence boundary.
//!
//! # Invariants
//! - A missing sheet is `Ok(None)`, not an error.
//! - Saves replace the whole sheet; the target is swapped in by rename so a
//!   failed write never truncates the previous sheet.
//! - File handles never outlive a single load or save call.
//! - A replaced sheet keeps the permissions of the file it replaces.
//! - Log events carry `SheetError::log_fields` only, never row contents.

use super::sheet_codec::{read_sheet, write_sheet};
use crate::model::book::AttendanceBook;
use crate::model::mark::Mark;
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// File name used when the caller does not choose a sheet location.
pub const DEFAULT_SHEET_FILE_NAME: &str = "attendance.csv";

pub type SheetResult<T> = Result<T, SheetError>;

/// Error for sheet load and save operations.
#[derive(Debug)]
pub enum SheetError {
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    /// `row` is the 1-based sheet row; the header is row 1.
    Format {
        row: u64,
        message: String,
    },
}

impl SheetError {
    /// Stable machine code for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "sheet_io_failed",
            Self::Csv(_) => "sheet_csv_invalid",
            Self::Format { .. } => "sheet_format_invalid",
        }
    }

    /// 1-based sheet row the error points at, when known.
    pub fn row(&self) -> Option<u64> {
        match self {
            Self::Io { .. } => None,
            Self::Csv(err) => err.position().map(|pos| pos.record() + 1),
            Self::Format { row, .. } => Some(*row),
        }
    }

    /// `key=value` log fields for this error.
    ///
    /// Messages and paths are left out: both can echo student names.
    pub fn log_fields(&self) -> String {
        let mut fields = format!("error_code={}", self.error_code());
        if let Self::Io {
            operation, source, ..
        } = self
        {
            fields.push_str(&format!(" operation={operation} io_kind={:?}", source.kind()));
        }
        if let Some(row) = self.row() {
            fields.push_str(&format!(" row={row}"));
        }
        fields
    }
}

impl Display for SheetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                operation,
                path,
                source,
            } => write!(f, "failed to {operation} `{}`: {source}", path.display()),
            Self::Csv(err) => write!(f, "{err}"),
            Self::Format { row, message } => {
                write!(f, "invalid attendance sheet row {row}: {message}")
            }
        }
    }
}

impl Error for SheetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::Format { .. } => None,
        }
    }
}

impl From<csv::Error> for SheetError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// One persisted mark row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub student_name: String,
    pub subject_code: String,
    pub mark: Mark,
}

impl SheetRow {
    pub fn new(student_name: impl Into<String>, subject_code: impl Into<String>, mark: Mark) -> Self {
        Self {
            student_name: student_name.into(),
            subject_code: subject_code.into(),
            mark,
        }
    }
}

/// Repository interface for whole-sheet persistence.
pub trait SheetRepository {
    /// Returns all rows in sheet order, or `None` when no sheet exists yet.
    fn load_rows(&self) -> SheetResult<Option<Vec<SheetRow>>>;
    /// Replaces the sheet with every mark in `book`; returns rows written.
    fn save_book(&self, book: &AttendanceBook) -> SheetResult<usize>;
}

/// Returns `DEFAULT_SHEET_FILE_NAME` relative to the working directory.
pub fn default_sheet_path() -> PathBuf {
    PathBuf::from(DEFAULT_SHEET_FILE_NAME)
}

/// CSV-file-backed sheet repository.
#[derive(Debug, Clone)]
pub struct CsvSheetRepository {
    path: PathBuf,
}

impl CsvSheetRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn target_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Writes the sheet next to the target, then renames it over the target.
    ///
    /// The staged file is created owner-only; when a target already exists
    /// its permissions are copied over before the rename.
    fn replace_sheet(&self, book: &AttendanceBook) -> SheetResult<usize> {
        let mut staged = NamedTempFile::new_in(self.target_dir())
            .map_err(|err| self.io_error("stage", err))?;
        if let Ok(existing) = std::fs::metadata(&self.path) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| self.io_error("chmod", err))?;
        }
        let written = write_sheet(staged.as_file_mut(), book)?;
        staged
            .as_file()
            .sync_all()
            .map_err(|err| self.io_error("sync", err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error("replace", err.error))?;
        Ok(written)
    }

    fn io_error(&self, operation: &'static str, source: std::io::Error) -> SheetError {
        SheetError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for CsvSheetRepository {
    fn default() -> Self {
        Self::new(default_sheet_path())
    }
}

impl SheetRepository for CsvSheetRepository {
    fn load_rows(&self) -> SheetResult<Option<Vec<SheetRow>>> {
        let started_at = Instant::now();
        info!("event=sheet_load module=repo status=start");

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=sheet_load module=repo status=missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(None);
            }
            Err(err) => {
                let err = self.io_error("open", err);
                error!(
                    "event=sheet_load module=repo status=error duration_ms={} {}",
                    started_at.elapsed().as_millis(),
                    err.log_fields()
                );
                return Err(err);
            }
        };

        match read_sheet(BufReader::new(file)) {
            Ok(rows) => {
                info!(
                    "event=sheet_load module=repo status=ok rows={} duration_ms={}",
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(rows))
            }
            Err(err) => {
                error!(
                    "event=sheet_load module=repo status=error duration_ms={} {}",
                    started_at.elapsed().as_millis(),
                    err.log_fields()
                );
                Err(err)
            }
        }
    }

    fn save_book(&self, book: &AttendanceBook) -> SheetResult<usize> {
        let started_at = Instant::now();

        let result = self.replace_sheet(book);
        match &result {
            Ok(written) => info!(
                "event=sheet_save module=repo status=ok rows={} duration_ms={}",
                written,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=sheet_save module=repo status=error duration_ms={} {}",
                started_at.elapsed().as_millis(),
                err.log_fields()
            ),
        }
        result
    }
}

/// In-memory sheet repository for tests and previews.
#[derive(Debug, Default)]
pub struct MemorySheetRepository {
    rows: RefCell<Option<Vec<SheetRow>>>,
    saves: Cell<usize>,
}

impl MemorySheetRepository {
    /// Starts without a sheet, as if the file were missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing sheet holding `rows`.
    pub fn with_rows(rows: Vec<SheetRow>) -> Self {
        Self {
            rows: RefCell::new(Some(rows)),
            saves: Cell::new(0),
        }
    }

    /// Current persisted rows, if a sheet exists.
    pub fn rows(&self) -> Option<Vec<SheetRow>> {
        self.rows.borrow().clone()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SheetRepository for MemorySheetRepository {
    fn load_rows(&self) -> SheetResult<Option<Vec<SheetRow>>> {
        Ok(self.rows())
    }

    fn save_book(&self, book: &AttendanceBook) -> SheetResult<usize> {
        let rows = book
            .mark_entries()
            .map(|entry| SheetRow::new(entry.student_name, entry.subject_code, entry.mark))
            .collect::<Vec<_>>();
        let written = rows.len();
        *self.rows.borrow_mut() = Some(rows);
        self.saves.set(self.saves.get() + 1);
        Ok(written)
    }
}
