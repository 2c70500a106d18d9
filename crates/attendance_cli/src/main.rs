//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `attendance_core` linkage without the Flutter runtime.
//! - Print the attendance table hydrated from the default sheet location.

use attendance_core::{default_sheet_path, AttendanceStore, TableCell};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("attendance_core ping={}", attendance_core::ping());
    println!("attendance_core version={}", attendance_core::core_version());

    let path = default_sheet_path();
    let store = match AttendanceStore::open_file(&path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to open `{}`: {err}", path.display());
            return ExitCode::FAILURE;
        }
    };
    println!("{}", store.hydration().message());

    let table = store.snapshot_table();
    let mut header = vec!["Student Name".to_string(), "Subject".to_string()];
    header.extend(table.columns.iter().cloned());
    println!("{}", header.join("\t"));
    for row in &table.rows {
        let mut line = vec![row.student_name.clone(), row.subject_code.clone()];
        line.extend(row.cells.iter().map(TableCell::render));
        println!("{}", line.join("\t"));
    }

    ExitCode::SUCCESS
}
