//! In-memory attendance book.
//!
//! # Responsibility
//! - Hold the student -> subject -> record mapping and the known-subjects set.
//! - Enforce presence validation before any mutation.
//! - Expose ordered read views for aggregation and persistence.
//!
//! # Invariants
//! - A student entry exists only after its first recorded mark.
//! - A subject is known once added or marked, and is never removed.
//! - Iteration order is insertion order for students, subjects per student,
//!   and known subjects.
//! - Names and codes are compared exactly; no trimming or case folding.
//! - Each ordered `Vec` has a hash index kept in step with it; entries are
//!   only ever appended, so stored positions never go stale.

use super::mark::{AttendanceRecord, Mark};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Presence validation failure for book mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyStudentName,
    EmptySubjectCode,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStudentName => write!(f, "student name must not be empty"),
            Self::EmptySubjectCode => write!(f, "subject code must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// One persisted-shape mark: who, where, what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkEntry<'a> {
    pub student_name: &'a str,
    pub subject_code: &'a str,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SubjectRecord {
    subject_code: String,
    record: AttendanceRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StudentEntry {
    name: String,
    subjects: Vec<SubjectRecord>,
    subject_index: HashMap<String, usize>,
}

impl StudentEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subjects: Vec::new(),
            subject_index: HashMap::new(),
        }
    }

    fn record(&self, subject_code: &str) -> Option<&AttendanceRecord> {
        self.subject_index
            .get(subject_code)
            .map(|&index| &self.subjects[index].record)
    }

    fn push_mark(&mut self, subject_code: &str, mark: Mark) {
        if let Some(&index) = self.subject_index.get(subject_code) {
            self.subjects[index].record.push(mark);
            return;
        }
        self.subject_index
            .insert(subject_code.to_string(), self.subjects.len());
        self.subjects.push(SubjectRecord {
            subject_code: subject_code.to_string(),
            record: AttendanceRecord::starting_with(mark),
        });
    }
}

/// Aggregate root data for attendance marks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceBook {
    students: Vec<StudentEntry>,
    student_index: HashMap<String, usize>,
    known_subjects: Vec<String>,
    known_subject_set: HashSet<String>,
}

impl AttendanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one mark for `(student_name, subject_code)`.
    ///
    /// # Errors
    /// - Returns `ValidationError` for an empty name or code. The book is not
    ///   touched in that case.
    pub fn record_mark(
        &mut self,
        student_name: &str,
        subject_code: &str,
        mark: Mark,
    ) -> Result<(), ValidationError> {
        validate_student_name(student_name)?;
        validate_subject_code(subject_code)?;

        let index = match self.student_index.get(student_name) {
            Some(&index) => index,
            None => {
                let index = self.students.len();
                self.students.push(StudentEntry::new(student_name));
                self.student_index.insert(student_name.to_string(), index);
                index
            }
        };
        self.students[index].push_mark(subject_code, mark);

        self.register_subject(subject_code);
        Ok(())
    }

    /// Registers a subject without recording any mark.
    ///
    /// Returns `true` when the subject was not known before.
    pub fn add_subject(&mut self, subject_code: &str) -> Result<bool, ValidationError> {
        validate_subject_code(subject_code)?;
        Ok(self.register_subject(subject_code))
    }

    /// Known subjects in first-seen order.
    pub fn known_subjects(&self) -> &[String] {
        &self.known_subjects
    }

    /// Student names in first-marked order.
    pub fn students(&self) -> impl Iterator<Item = &str> + '_ {
        self.students.iter().map(|entry| entry.name.as_str())
    }

    pub fn has_student(&self, student_name: &str) -> bool {
        self.student(student_name).is_some()
    }

    /// Returns the record for one pair, if any mark exists for it.
    pub fn record(&self, student_name: &str, subject_code: &str) -> Option<&AttendanceRecord> {
        self.student(student_name)
            .and_then(|entry| entry.record(subject_code))
    }

    /// Returns `(subject_code, record)` pairs for one student in insertion order.
    ///
    /// Returns `None` when the student has never been marked.
    pub fn student_records(
        &self,
        student_name: &str,
    ) -> Option<impl Iterator<Item = (&str, &AttendanceRecord)> + '_> {
        self.student(student_name).map(|entry| {
            entry
                .subjects
                .iter()
                .map(|subject| (subject.subject_code.as_str(), &subject.record))
        })
    }

    /// Every `(student, subject, record)` triple in display order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &AttendanceRecord)> + '_ {
        self.students.iter().flat_map(|student| {
            student.subjects.iter().map(move |subject| {
                (
                    student.name.as_str(),
                    subject.subject_code.as_str(),
                    &subject.record,
                )
            })
        })
    }

    /// Every individual mark flattened in persistence order.
    pub fn mark_entries(&self) -> impl Iterator<Item = MarkEntry<'_>> + '_ {
        self.records()
            .flat_map(|(student_name, subject_code, record)| {
                record.marks().iter().map(move |mark| MarkEntry {
                    student_name,
                    subject_code,
                    mark: *mark,
                })
            })
    }

    pub fn mark_count(&self) -> usize {
        self.records().map(|(_, _, record)| record.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.known_subjects.is_empty()
    }

    fn student(&self, student_name: &str) -> Option<&StudentEntry> {
        self.student_index
            .get(student_name)
            .map(|&index| &self.students[index])
    }

    fn register_subject(&mut self, subject_code: &str) -> bool {
        if !self.known_subject_set.insert(subject_code.to_string()) {
            return false;
        }
        self.known_subjects.push(subject_code.to_string());
        true
    }
}

fn validate_student_name(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyStudentName);
    }
    Ok(())
}

fn validate_subject_code(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptySubjectCode);
    }
    Ok(())
}
