use attendance_core::{AttendanceStore, Hydration, Mark, StoreError, TableCell, ValidationError};
use std::path::PathBuf;
use tempfile::TempDir;

fn sheet_path(dir: &TempDir) -> PathBuf {
    dir.path().join("attendance.csv")
}

#[test]
fn marks_round_trip_through_sheet_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = sheet_path(&dir);

    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.record_mark("Alice", "CS101", Mark::Present).unwrap();
    store.record_mark("Bob", "MATH1", Mark::Absent).unwrap();
    store.record_mark("Alice", "CS101", Mark::Absent).unwrap();
    store.record_mark("Alice", "MATH1", Mark::Present).unwrap();
    store.record_mark("Alice", "CS101", Mark::Present).unwrap();
    drop(store);

    let reloaded = AttendanceStore::open_file(&path).unwrap();
    assert_eq!(reloaded.hydration(), Hydration::Loaded { marks: 5 });
    assert_eq!(
        reloaded.marks("Alice", "CS101").unwrap(),
        [Mark::Present, Mark::Absent, Mark::Present]
    );
    assert_eq!(reloaded.marks("Alice", "MATH1").unwrap(), [Mark::Present]);
    assert_eq!(reloaded.marks("Bob", "MATH1").unwrap(), [Mark::Absent]);
    assert_eq!(reloaded.students(), vec!["Alice", "Bob"]);
    assert_eq!(reloaded.known_subjects(), ["CS101", "MATH1"]);
}

#[test]
fn add_subject_twice_keeps_single_entry_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();

    assert!(store.add_subject("X").unwrap());
    assert!(store.add_subject("Y").unwrap());
    assert!(!store.add_subject("X").unwrap());

    assert_eq!(store.known_subjects(), ["X", "Y"]);
}

#[test]
fn percentage_of_three_present_in_four_is_75() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();
    for mark in [Mark::Present, Mark::Present, Mark::Absent, Mark::Present] {
        store.record_mark("Alice", "CS101", mark).unwrap();
    }

    let percentage = store
        .attendance_percentage("Alice", "CS101")
        .unwrap()
        .unwrap();
    assert!((percentage - 75.0).abs() < 1e-9);

    let per_subject = store.student_percentages("Alice").unwrap();
    assert_eq!(per_subject.len(), 1);
    assert_eq!(per_subject[0].present, 3);
    assert_eq!(per_subject[0].total, 4);
    assert_eq!(
        per_subject[0].message(),
        "Alice's attendance percentage in CS101 is 75.00%"
    );
}

#[test]
fn empty_inputs_are_rejected_without_changing_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = sheet_path(&dir);
    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.record_mark("Carol", "BIO1", Mark::Present).unwrap();
    let before = store.book().clone();
    let sheet_before = std::fs::read_to_string(&path).unwrap();

    let err = store.record_mark("", "CS101", Mark::Present).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyStudentName)
    ));
    let err = store.record_mark("Alice", "", Mark::Present).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptySubjectCode)
    ));
    let err = store.add_subject("").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptySubjectCode)
    ));

    assert_eq!(store.book(), &before);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), sheet_before);
}

#[test]
fn unknown_student_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();

    let err = store.student_percentages("Nobody").unwrap_err();
    assert!(matches!(err, StoreError::StudentNotFound(ref name) if name == "Nobody"));
    assert_eq!(
        err.to_string(),
        "no attendance record found for student `Nobody`"
    );
    assert!(matches!(
        store.attendance_percentage("Nobody", "CS101"),
        Err(StoreError::StudentNotFound(_))
    ));
}

#[test]
fn subject_without_marks_is_lost_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = sheet_path(&dir);

    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.add_subject("PHY201").unwrap();
    store.record_mark("Alice", "CS101", Mark::Present).unwrap();
    assert_eq!(store.known_subjects(), ["PHY201", "CS101"]);
    drop(store);

    let reloaded = AttendanceStore::open_file(&path).unwrap();
    assert_eq!(reloaded.known_subjects(), ["CS101"]);
}

#[test]
fn subject_added_alone_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = sheet_path(&dir);

    let mut store = AttendanceStore::open_file(&path).unwrap();
    store.add_subject("PHY201").unwrap();

    assert!(!path.exists());
}

#[test]
fn first_mark_for_new_student_and_subject_creates_one_entry_each() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();
    store.add_subject("MATH1").unwrap();

    store.record_mark("Bob", "HIST1", Mark::Absent).unwrap();

    assert_eq!(store.students(), vec!["Bob"]);
    assert_eq!(store.marks("Bob", "HIST1").unwrap(), [Mark::Absent]);
    assert_eq!(store.book().records().count(), 1);
    assert_eq!(store.known_subjects(), ["MATH1", "HIST1"]);
}

#[test]
fn snapshot_table_follows_student_then_subject_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();
    store.record_mark("Bob", "MATH1", Mark::Absent).unwrap();
    store.record_mark("Alice", "CS101", Mark::Present).unwrap();
    store.record_mark("Bob", "CS101", Mark::Present).unwrap();
    store.add_subject("PHY201").unwrap();

    let table = store.snapshot_table();
    assert_eq!(table.columns, vec!["MATH1", "CS101", "PHY201"]);

    let keys = table
        .rows
        .iter()
        .map(|row| (row.student_name.as_str(), row.subject_code.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        keys,
        vec![("Bob", "MATH1"), ("Bob", "CS101"), ("Alice", "CS101")]
    );
    assert_eq!(
        table.rows[0].cells,
        vec![
            TableCell::Percentage(0.0),
            TableCell::NotApplicable,
            TableCell::NotApplicable
        ]
    );
    assert_eq!(
        table.rows[1]
            .cells
            .iter()
            .map(TableCell::render)
            .collect::<Vec<_>>(),
        vec!["-", "100.00", "-"]
    );
}

#[test]
fn missing_sheet_reports_no_prior_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = AttendanceStore::open_file(sheet_path(&dir)).unwrap();

    assert_eq!(store.hydration(), Hydration::NoPriorData);
    assert!(store.book().is_empty());
    assert!(store.snapshot_table().rows.is_empty());
}
