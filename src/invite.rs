use crate::record::ScheduleRecord;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An all-day calendar event rendered as an iCalendar (.ics) invite.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarInvite {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stamp: DateTime<Utc>,
}

impl CalendarInvite {
    /// Build an invite for a record. Records without an end date have no
    /// all-day span to put on a calendar and yield `None`.
    pub fn for_record(record: &ScheduleRecord, location: Option<&str>) -> Option<Self> {
        let end = record.end_date?;
        let program = record.program.as_deref().unwrap_or("N/A");
        let description = format!(
            "Course: {}\nProgram: {}\nStart: {}\nEnd: {}",
            record.name, program, record.start_date, end
        );
        Some(Self {
            uid: format!("{}@reminder-tool", Uuid::new_v4()),
            summary: record.name.clone(),
            description,
            location: location.map(|l| l.to_string()),
            start: record.start_date,
            end,
            stamp: Utc::now(),
        })
    }

    /// Render RFC 5545 text with CRLF line endings.
    pub fn to_ics(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Reminder Tool//Course Event//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", self.stamp.format("%Y%m%dT%H%M%SZ")),
            format!("DTSTART;VALUE=DATE:{}", self.start.format("%Y%m%d")),
            format!("DTEND;VALUE=DATE:{}", self.end.format("%Y%m%d")),
            format!("SUMMARY:{}", escape_text(&self.summary)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
        ];
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("STATUS:CONFIRMED".to_string());
        lines.push("TRANSP:OPAQUE".to_string());
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    pub fn filename(&self) -> String {
        let stem: String = self
            .summary
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{stem}.ics")
    }
}

/// Write one .ics file per record into `dir`, returning the created paths.
pub fn write_invites(
    records: &[ScheduleRecord],
    location: Option<&str>,
    dir: &Path,
) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut created = Vec::new();
    for record in records {
        let Some(invite) = CalendarInvite::for_record(record, location) else {
            warn!("no calendar invite for '{}': missing end date", record.name);
            continue;
        };
        let path = dir.join(invite.filename());
        fs::write(&path, invite.to_ics())?;
        info!("created calendar invite {}", path.display());
        created.push(path);
    }
    info!("created {} calendar invite file(s)", created.len());
    Ok(created)
}

/// Escape TEXT values per RFC 5545 section 3.3.11.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}
