//! Attendance store use-case service.
//!
//! # Responsibility
//! - Hydrate the attendance book from a sheet repository at construction.
//! - Provide mark, add-subject, table and percentage entry points.
//! - Persist the full book after every recorded mark.
//!
//! # Invariants
//! - Validation failures never mutate the book.
//! - A recorded mark stays in memory even when its save fails; memory is the
//!   authoritative state until the next successful save.
//! - `add_subject` never writes: the sheet has no row shape for a subject
//!   without marks.

use crate::model::book::{AttendanceBook, ValidationError};
use crate::model::mark::Mark;
use crate::model::table::{AttendanceTable, SubjectPercentage};
use crate::repo::sheet_repo::{CsvSheetRepository, SheetError, SheetRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from attendance store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Required name or code is empty.
    Validation(ValidationError),
    /// Student has no recorded marks.
    StudentNotFound(String),
    /// Sheet load or save failure.
    Sheet(SheetError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(name) => {
                write!(f, "no attendance record found for student `{name}`")
            }
            Self::Sheet(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StudentNotFound(_) => None,
            Self::Sheet(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SheetError> for StoreError {
    fn from(value: SheetError) -> Self {
        Self::Sheet(value)
    }
}

/// Outcome of construction-time hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// No sheet existed; the store started empty.
    NoPriorData,
    /// Sheet rows were replayed into the book.
    Loaded { marks: usize },
}

impl Hydration {
    /// Startup notice for the interaction surface.
    pub fn message(&self) -> String {
        match self {
            Self::NoPriorData => "Attendance file not found. Creating a new one.".to_string(),
            Self::Loaded { marks } => format!("Loaded {marks} attendance mark(s)."),
        }
    }
}

/// Attendance store facade over an in-memory book and a sheet repository.
pub struct AttendanceStore<R: SheetRepository> {
    repo: R,
    book: AttendanceBook,
    hydration: Hydration,
}

impl AttendanceStore<CsvSheetRepository> {
    /// Opens a store backed by the CSV sheet at `path`.
    pub fn open_file(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(CsvSheetRepository::new(path))
    }
}

impl<R: SheetRepository> AttendanceStore<R> {
    /// Creates a store and hydrates it from `repo`.
    ///
    /// Rows are replayed in sheet order without triggering saves, so known
    /// subjects come back in first-seen row order.
    ///
    /// # Errors
    /// - `StoreError::Sheet` when the sheet exists but cannot be read or parsed.
    pub fn open(repo: R) -> StoreResult<Self> {
        let mut book = AttendanceBook::new();
        let hydration = match repo.load_rows()? {
            None => {
                warn!("event=store_open module=service status=ok hydration=no_prior_data");
                Hydration::NoPriorData
            }
            Some(rows) => {
                for row in &rows {
                    book.record_mark(&row.student_name, &row.subject_code, row.mark)?;
                }
                info!(
                    "event=store_open module=service status=ok hydration=loaded marks={} students={} subjects={}",
                    rows.len(),
                    book.students().count(),
                    book.known_subjects().len()
                );
                Hydration::Loaded { marks: rows.len() }
            }
        };

        Ok(Self {
            repo,
            book,
            hydration,
        })
    }

    /// Appends one mark and saves the whole book.
    ///
    /// # Errors
    /// - `StoreError::Validation` for empty inputs; nothing changes.
    /// - `StoreError::Sheet` when the save fails; the mark is kept in memory.
    pub fn record_mark(
        &mut self,
        student_name: &str,
        subject_code: &str,
        mark: Mark,
    ) -> StoreResult<()> {
        if let Err(err) = self.book.record_mark(student_name, subject_code, mark) {
            warn!(
                "event=mark_record module=service status=rejected reason={:?}",
                err
            );
            return Err(err.into());
        }

        match self.repo.save_book(&self.book) {
            Ok(rows) => {
                info!(
                    "event=mark_record module=service status=ok mark={} rows={}",
                    mark.code(),
                    rows
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=mark_record module=service status=unsaved mark={} error_code=save_failed",
                    mark.code()
                );
                Err(err.into())
            }
        }
    }

    /// Registers a subject column without recording marks.
    ///
    /// Returns `true` when the subject is new. Not persisted on its own.
    pub fn add_subject(&mut self, subject_code: &str) -> StoreResult<bool> {
        let added = self.book.add_subject(subject_code)?;
        info!(
            "event=subject_add module=service status=ok added={} subjects={}",
            added,
            self.book.known_subjects().len()
        );
        Ok(added)
    }

    /// Builds the display table from current state.
    pub fn snapshot_table(&self) -> AttendanceTable {
        self.book.snapshot_table()
    }

    /// Returns the Present percentage for one pair.
    ///
    /// Returns `Ok(None)` when the student exists but has no marks in
    /// `subject_code`.
    ///
    /// # Errors
    /// - `StoreError::StudentNotFound` when the student was never marked.
    pub fn attendance_percentage(
        &self,
        student_name: &str,
        subject_code: &str,
    ) -> StoreResult<Option<f64>> {
        if !self.book.has_student(student_name) {
            return Err(StoreError::StudentNotFound(student_name.to_string()));
        }
        Ok(self
            .book
            .record(student_name, subject_code)
            .map(|record| record.percentage()))
    }

    /// Returns one percentage per subject the student has marks in.
    ///
    /// # Errors
    /// - `StoreError::StudentNotFound` when the student was never marked.
    pub fn student_percentages(&self, student_name: &str) -> StoreResult<Vec<SubjectPercentage>> {
        self.book
            .student_percentages(student_name)
            .ok_or_else(|| StoreError::StudentNotFound(student_name.to_string()))
    }

    pub fn known_subjects(&self) -> &[String] {
        self.book.known_subjects()
    }

    pub fn students(&self) -> Vec<String> {
        self.book.students().map(str::to_string).collect()
    }

    /// Marks for one pair in entry order; `None` when no mark exists.
    pub fn marks(&self, student_name: &str, subject_code: &str) -> Option<&[Mark]> {
        self.book
            .record(student_name, subject_code)
            .map(|record| record.marks())
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    pub fn book(&self) -> &AttendanceBook {
        &self.book
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}
