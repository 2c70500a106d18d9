//! Mark and per-pair attendance record.
//!
//! # Responsibility
//! - Define the two-valued `Mark` and its persisted status code.
//! - Provide the append-only `AttendanceRecord` and its percentage math.
//!
//! # Invariants
//! - A record is created from its first mark and is never empty.
//! - Marks are never edited or removed once appended.

use serde::{Deserialize, Serialize};

/// One attendance entry for a student in a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Serialized as `P` to match the sheet `Status` column.
    #[serde(rename = "P")]
    Present,
    /// Serialized as `A` to match the sheet `Status` column.
    #[serde(rename = "A")]
    Absent,
}

impl Mark {
    /// Returns the persisted status code (`P` or `A`).
    pub fn code(self) -> &'static str {
        match self {
            Self::Present => "P",
            Self::Absent => "A",
        }
    }

    /// Parses a persisted status code.
    ///
    /// Matching is exact; `p` or ` P` are not accepted.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "P" => Some(Self::Present),
            "A" => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Ordered marks for one (student, subject) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    marks: Vec<Mark>,
}

impl AttendanceRecord {
    /// Creates a record holding its first mark.
    pub(crate) fn starting_with(mark: Mark) -> Self {
        Self { marks: vec![mark] }
    }

    pub(crate) fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Marks in entry order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.marks.iter().filter(|mark| mark.is_present()).count()
    }

    /// Returns `100 * present / total`.
    ///
    /// A zero-length record yields `0.0` instead of dividing by zero.
    pub fn percentage(&self) -> f64 {
        if self.marks.is_empty() {
            return 0.0;
        }
        self.present_count() as f64 / self.marks.len() as f64 * 100.0
    }
}
