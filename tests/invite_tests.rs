use chrono::NaiveDate;
use reminder_tool::invite::{self, CalendarInvite};
use reminder_tool::record::ScheduleRecord;
use std::fs;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_record() -> ScheduleRecord {
    let mut record = ScheduleRecord::new("Intro to NLP", date(2024, 6, 15));
    record.end_date = Some(date(2024, 6, 20));
    record.program = Some("NLP".to_string());
    record
}

#[test]
fn invite_renders_all_day_event() {
    let invite = CalendarInvite::for_record(&sample_record(), Some("UBC")).expect("invite");
    let ics = invite.to_ics();

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert!(ics.contains("BEGIN:VEVENT\r\n"));
    assert!(ics.contains("DTSTART;VALUE=DATE:20240615\r\n"));
    assert!(ics.contains("DTEND;VALUE=DATE:20240620\r\n"));
    assert!(ics.contains("SUMMARY:Intro to NLP\r\n"));
    assert!(ics.contains("LOCATION:UBC\r\n"));
    assert!(ics.contains("STATUS:CONFIRMED\r\n"));
    assert!(ics.contains(&format!("UID:{}\r\n", invite.uid)));
    assert!(invite.uid.ends_with("@reminder-tool"));
    // Description folds the course details into one escaped line.
    assert!(ics.contains("DESCRIPTION:Course: Intro to NLP\\nProgram: NLP\\n"));
}

#[test]
fn location_line_is_omitted_without_a_location() {
    let invite = CalendarInvite::for_record(&sample_record(), None).expect("invite");
    assert!(!invite.to_ics().contains("LOCATION:"));
}

#[test]
fn text_values_are_escaped() {
    let mut record = sample_record();
    record.name = "Lists; Sets, and\nBackslash \\".to_string();
    let invite = CalendarInvite::for_record(&record, None).expect("invite");
    let ics = invite.to_ics();
    assert!(ics.contains("SUMMARY:Lists\\; Sets\\, and\\nBackslash \\\\\r\n"));
}

#[test]
fn record_without_end_date_has_no_invite() {
    let record = ScheduleRecord::new("No End", date(2024, 6, 15));
    assert!(CalendarInvite::for_record(&record, None).is_none());
}

#[test]
fn filename_is_sanitized() {
    let mut record = sample_record();
    record.name = "KCDS / Module 1".to_string();
    let invite = CalendarInvite::for_record(&record, None).expect("invite");
    assert_eq!(invite.filename(), "KCDS___Module_1.ics");
}

#[test]
fn write_invites_creates_one_file_per_complete_record() {
    let dir = tempdir().expect("create temp dir");
    let out = dir.path().join("invites");

    let records = vec![
        sample_record(),
        // No end date, so no invite.
        ScheduleRecord::new("No End", date(2024, 6, 15)),
    ];
    let created = invite::write_invites(&records, Some("UBC"), &out).expect("write invites");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0], out.join("Intro_to_NLP.ics"));

    let contents = fs::read_to_string(&created[0]).expect("read invite");
    assert!(contents.contains("SUMMARY:Intro to NLP"));
}
