use chrono::NaiveDate;
use reminder_tool::config::Config;
use reminder_tool::loader::{LoadError, load_records};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn config_for(path: &Path) -> Config {
    let mut config = Config::default();
    config.excel_file = path.to_path_buf();
    config
}

#[test]
fn csv_rows_load_into_records() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    fs::write(
        &path,
        "Course Name,Program Name,Start Date,End Date\n\
         Intro to NLP,NLP,2024-06-15,2024-06-20\n\
         Data Visualization,DASH,06/22/2024,06/25/2024\n",
    )
    .expect("write csv");

    let records = load_records(&config_for(&path)).expect("load csv");
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].name, "Intro to NLP");
    assert_eq!(records[0].program.as_deref(), Some("NLP"));
    assert_eq!(records[0].start_date, date(2024, 6, 15));
    assert_eq!(records[0].end_date, Some(date(2024, 6, 20)));

    assert_eq!(records[1].start_date, date(2024, 6, 22));
    assert_eq!(records[1].end_date, Some(date(2024, 6, 25)));
}

#[test]
fn unparseable_start_date_skips_the_row_without_failing() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    fs::write(
        &path,
        "Course Name,Start Date,End Date\n\
         Good Row,2024-06-15,2024-06-20\n\
         Bad Row,sometime soon,2024-06-20\n\
         Empty Row,,\n",
    )
    .expect("write csv");

    let records = load_records(&config_for(&path)).expect("load csv");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Good Row");
}

#[test]
fn missing_end_date_column_is_tolerated() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    fs::write(
        &path,
        "Course Name,Start Date\nIntro to NLP,2024-06-15\n",
    )
    .expect("write csv");

    let records = load_records(&config_for(&path)).expect("load csv");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].end_date, None);
    assert_eq!(records[0].program, None);
}

#[test]
fn missing_start_column_fails_the_load() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    fs::write(&path, "Course Name,Finish\nIntro to NLP,2024-06-20\n").expect("write csv");

    match load_records(&config_for(&path)) {
        Err(LoadError::MissingColumn(column)) => assert_eq!(column, "Start Date"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn name_column_candidates_are_tried_in_order() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    // No "Course Name" header; the fallback "Name" candidate should match.
    fs::write(&path, "Name,Start Date\nWorkshop,2024-06-15\n").expect("write csv");

    let records = load_records(&config_for(&path)).expect("load csv");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Workshop");
}

#[test]
fn header_matching_ignores_case_and_padding() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.csv");
    fs::write(
        &path,
        " course name , start date \nIntro to NLP,2024-06-15\n",
    )
    .expect("write csv");

    let records = load_records(&config_for(&path)).expect("load csv");
    assert_eq!(records.len(), 1);
}

#[test]
fn missing_file_is_a_not_found_error() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("does_not_exist.csv");
    match load_records(&config_for(&path)) {
        Err(LoadError::NotFound(reported)) => assert_eq!(reported, path),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("schedule.txt");
    fs::write(&path, "whatever").expect("write file");
    match load_records(&config_for(&path)) {
        Err(LoadError::Unsupported(ext)) => assert_eq!(ext, "txt"),
        other => panic!("expected Unsupported, got {other:?}"),
    }
}
