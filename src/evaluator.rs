use crate::record::ScheduleRecord;
use chrono::{Duration, NaiveDate};

/// A (record, offset) pair whose reminder is due today.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReminderMatch<'a> {
    pub record: &'a ScheduleRecord,
    /// Positive = days before start_date, negative = days after end_date.
    pub offset: i64,
}

impl ReminderMatch<'_> {
    pub fn is_before_start(&self) -> bool {
        self.offset >= 0
    }
}

/// Decide which (record, offset) pairs are due on `today`.
///
/// For offset `o >= 0` a record matches when `today == start_date - o` days.
/// For `o < 0` it matches when `today == end_date + |o|` days; records
/// without an end date never match negative offsets. Pure function of its
/// inputs, evaluated once per batch pass.
pub fn due_reminders<'a>(
    records: &'a [ScheduleRecord],
    offsets: &[i64],
    today: NaiveDate,
) -> Vec<ReminderMatch<'a>> {
    let mut matches = Vec::new();
    for record in records {
        for &offset in offsets {
            if offset >= 0 {
                if today == record.start_date - Duration::days(offset) {
                    matches.push(ReminderMatch { record, offset });
                }
            } else if let Some(end_date) = record.end_date {
                if today == end_date + Duration::days(-offset) {
                    matches.push(ReminderMatch { record, offset });
                }
            }
        }
    }
    matches
}

/// Human phrasing for an offset, used in subjects and bodies.
/// Whole weeks read as weeks, everything else as days.
pub fn describe_offset(offset: i64) -> String {
    match offset {
        0 => "starts today".to_string(),
        1 => "starts tomorrow".to_string(),
        o if o > 0 && o % 7 == 0 => {
            let weeks = o / 7;
            if weeks == 1 {
                "starts in 1 week".to_string()
            } else {
                format!("starts in {weeks} weeks")
            }
        }
        o if o > 0 => format!("starts in {o} days"),
        o => {
            let days = -o;
            if days % 7 == 0 {
                let weeks = days / 7;
                if weeks == 1 {
                    "ended 1 week ago".to_string()
                } else {
                    format!("ended {weeks} weeks ago")
                }
            } else if days == 1 {
                "ended yesterday".to_string()
            } else {
                format!("ended {days} days ago")
            }
        }
    }
}
