use attendance_core::{
    AttendanceStore, CsvSheetRepository, Mark, SheetError, SheetRepository, StoreError,
    SHEET_HEADER,
};
use std::fs;

#[test]
fn saved_sheet_matches_documented_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");

    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.record_mark("Alice", "MATH101", Mark::Present).unwrap();
    store.record_mark("Alice", "MATH101", Mark::Present).unwrap();
    store.record_mark("Alice", "MATH101", Mark::Present).unwrap();
    store.record_mark("Bob", "MATH101", Mark::Absent).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], SHEET_HEADER.join(","));
    assert_eq!(
        &lines[1..],
        [
            "Alice,MATH101,P",
            "Alice,MATH101,P",
            "Alice,MATH101,P",
            "Bob,MATH101,A"
        ]
    );
}

#[test]
fn malformed_sheet_fails_hydration_with_row_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    fs::write(
        &path,
        "Student Name,Subject,Status\nAlice,CS101,P\nBob,CS101,X\n",
    )
    .unwrap();

    let err = AttendanceStore::open_file(&path).err().expect("open must fail");
    match err {
        StoreError::Sheet(SheetError::Format { row, message }) => {
            assert_eq!(row, 3);
            assert!(message.contains("unknown status `X`"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sheet_with_extra_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    fs::write(
        &path,
        "Student Name,Subject,Status\nAlice,CS101,P,extra\n",
    )
    .unwrap();

    let err = AttendanceStore::open_file(&path).err().expect("open must fail");
    assert!(
        matches!(err, StoreError::Sheet(SheetError::Format { row: 2, .. })),
        "{err}"
    );
}

#[test]
fn header_only_sheet_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");
    fs::write(&path, "Student Name,Subject,Status\n").unwrap();

    let store = AttendanceStore::open_file(&path).unwrap();
    assert_eq!(
        store.hydration(),
        attendance_core::Hydration::Loaded { marks: 0 }
    );
    assert!(store.known_subjects().is_empty());
}

#[test]
fn failed_save_keeps_mark_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone").join("attendance.csv");

    let mut store = AttendanceStore::open_file(&path).unwrap();
    let err = store
        .record_mark("Alice", "CS101", Mark::Present)
        .unwrap_err();

    assert!(matches!(err, StoreError::Sheet(SheetError::Io { .. })), "{err}");
    assert_eq!(store.marks("Alice", "CS101").unwrap(), [Mark::Present]);
    assert_eq!(store.known_subjects(), ["CS101"]);
}

#[test]
fn next_successful_save_catches_up_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("later");
    let path = nested.join("attendance.csv");

    let mut store = AttendanceStore::open_file(&path).unwrap();
    assert!(store.record_mark("Alice", "CS101", Mark::Present).is_err());

    fs::create_dir(&nested).unwrap();
    store.record_mark("Alice", "CS101", Mark::Absent).unwrap();

    let rows = CsvSheetRepository::new(&path).load_rows().unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].mark, Mark::Present);
    assert_eq!(rows[1].mark, Mark::Absent);
}

#[test]
fn unreadable_sheet_path_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = AttendanceStore::open_file(dir.path()).err().expect("open must fail");
    assert!(matches!(err, StoreError::Sheet(_)), "{err}");
}

#[test]
fn save_leaves_no_staging_files_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("attendance.csv");

    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.record_mark("Alice", "CS101", Mark::Present).unwrap();
    store.record_mark("Alice", "CS101", Mark::Absent).unwrap();

    let entries = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect::<Vec<_>>();
    assert_eq!(entries, vec![std::ffi::OsString::from("attendance.csv")]);
}
