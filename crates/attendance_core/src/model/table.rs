//! Display-shaped aggregation over the attendance book.
//!
//! # Responsibility
//! - Build the per-record table the interaction surface renders.
//! - Compute per-subject percentages for one student.
//!
//! # Invariants
//! - Results are recomputed from the book on every call; nothing is cached.
//! - Table columns equal the known subjects in insertion order.

use super::book::AttendanceBook;
use serde::Serialize;

/// Placeholder rendered for cells whose column is not the row's subject.
pub const NOT_APPLICABLE: &str = "-";

/// One cell under a known-subject column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum TableCell {
    Percentage(f64),
    NotApplicable,
}

impl TableCell {
    /// Renders the cell with two-decimal precision or the `-` placeholder.
    pub fn render(&self) -> String {
        match self {
            Self::Percentage(value) => format!("{value:.2}"),
            Self::NotApplicable => NOT_APPLICABLE.to_string(),
        }
    }
}

/// One row per (student, subject) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub student_name: String,
    pub subject_code: String,
    /// Aligned with `AttendanceTable::columns`.
    pub cells: Vec<TableCell>,
}

/// Snapshot of the attendance table at call time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Attendance percentage of one student in one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPercentage {
    pub student_name: String,
    pub subject_code: String,
    pub present: usize,
    pub total: usize,
    pub percentage: f64,
}

impl SubjectPercentage {
    /// User-facing sentence shown by the "get percentage" action.
    pub fn message(&self) -> String {
        format!(
            "{}'s attendance percentage in {} is {:.2}%",
            self.student_name, self.subject_code, self.percentage
        )
    }
}

impl AttendanceBook {
    /// Builds the display table from current state.
    pub fn snapshot_table(&self) -> AttendanceTable {
        let columns = self.known_subjects().to_vec();
        let rows = self
            .records()
            .map(|(student_name, subject_code, record)| TableRow {
                student_name: student_name.to_string(),
                subject_code: subject_code.to_string(),
                cells: columns
                    .iter()
                    .map(|column| {
                        if column == subject_code {
                            TableCell::Percentage(record.percentage())
                        } else {
                            TableCell::NotApplicable
                        }
                    })
                    .collect(),
            })
            .collect();

        AttendanceTable { columns, rows }
    }

    /// Returns one percentage per subject the student has marks in.
    ///
    /// Returns `None` when the student has never been marked.
    pub fn student_percentages(&self, student_name: &str) -> Option<Vec<SubjectPercentage>> {
        let records = self.student_records(student_name)?;
        Some(
            records
                .map(|(subject_code, record)| SubjectPercentage {
                    student_name: student_name.to_string(),
                    subject_code: subject_code.to_string(),
                    present: record.present_count(),
                    total: record.len(),
                    percentage: record.percentage(),
                })
                .collect(),
        )
    }
}
