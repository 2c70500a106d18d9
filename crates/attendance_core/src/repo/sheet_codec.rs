//! Tabular sheet encoding for attendance marks.
//!
//! # Responsibility
//! - Parse `Student Name,Subject,Status` rows into owned `SheetRow`s.
//! - Write the full book as one row per mark behind a fixed header.
//!
//! # Invariants
//! - Header row is always written, even for an empty book.
//! - Any row that cannot be read back as (name, subject, mark) is rejected
//!   with its 1-based sheet row number (header is row 1); nothing is
//!   skipped silently.
//! - Rows are numbered by record, not by text line: blank lines carry no
//!   row, so the number stays exact when the file has gaps.

use super::sheet_repo::{SheetError, SheetResult, SheetRow};
use crate::model::book::{AttendanceBook, MarkEntry};
use crate::model::mark::Mark;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::io::{Read, Write};

/// Exact header labels of the persisted sheet.
pub const SHEET_HEADER: [&str; 3] = ["Student Name", "Subject", "Status"];

const UTF8_BOM: char = '\u{feff}';

#[derive(Serialize)]
struct SheetRowRef<'a> {
    student_name: &'a str,
    subject_code: &'a str,
    status: Mark,
}

impl<'a> From<MarkEntry<'a>> for SheetRowRef<'a> {
    fn from(entry: MarkEntry<'a>) -> Self {
        Self {
            student_name: entry.student_name,
            subject_code: entry.subject_code,
            status: entry.mark,
        }
    }
}

/// Reads every mark row from a sheet.
///
/// An empty input yields no rows. A non-empty input must start with
/// `SHEET_HEADER`.
///
/// # Errors
/// - `SheetError::Csv` for transport-level failures (I/O, invalid UTF-8).
/// - `SheetError::Format` for a wrong header, wrong arity, an empty name or
///   code, or an unknown status code.
pub fn read_sheet<R: Read>(input: R) -> SheetResult<Vec<SheetRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    match records.next() {
        None => return Ok(Vec::new()),
        Some(header) => check_header(&header?)?,
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(parse_row(&record)?);
    }
    Ok(rows)
}

/// Writes the header plus one row per mark; returns the mark row count.
pub fn write_sheet<W: Write>(output: W, book: &AttendanceBook) -> SheetResult<usize> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(SHEET_HEADER)?;

    let mut written = 0;
    for entry in book.mark_entries() {
        writer.serialize(SheetRowRef::from(entry))?;
        written += 1;
    }

    writer.flush().map_err(|err| SheetError::Csv(err.into()))?;
    Ok(written)
}

fn check_header(record: &StringRecord) -> SheetResult<()> {
    let labels = record
        .iter()
        .enumerate()
        .map(|(index, label)| {
            if index == 0 {
                label.trim_start_matches(UTF8_BOM)
            } else {
                label
            }
        })
        .collect::<Vec<_>>();

    if labels != SHEET_HEADER {
        return Err(SheetError::Format {
            row: row_of(record),
            message: format!(
                "expected header `{}`, got `{}`",
                SHEET_HEADER.join(","),
                labels.join(",")
            ),
        });
    }
    Ok(())
}

fn parse_row(record: &StringRecord) -> SheetResult<SheetRow> {
    let row = row_of(record);
    if record.len() != SHEET_HEADER.len() {
        return Err(SheetError::Format {
            row,
            message: format!(
                "expected {} columns, got {}",
                SHEET_HEADER.len(),
                record.len()
            ),
        });
    }

    let student_name = &record[0];
    let subject_code = &record[1];
    let status = &record[2];

    if student_name.is_empty() {
        return Err(SheetError::Format {
            row,
            message: "student name is empty".to_string(),
        });
    }
    if subject_code.is_empty() {
        return Err(SheetError::Format {
            row,
            message: "subject code is empty".to_string(),
        });
    }
    let mark = Mark::from_code(status).ok_or_else(|| SheetError::Format {
        row,
        message: format!("unknown status `{status}`; expected P|A"),
    })?;

    Ok(SheetRow {
        student_name: student_name.to_string(),
        subject_code: subject_code.to_string(),
        mark,
    })
}

/// 1-based sheet row; the csv reader skips blank lines, so its line counter
/// cannot be trusted here.
fn row_of(record: &StringRecord) -> u64 {
    record.position().map(|pos| pos.record() + 1).unwrap_or(0)
}
