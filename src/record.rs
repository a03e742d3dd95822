use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One schedule entry loaded from a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub name: String,
    pub start_date: NaiveDate,
    /// Not every row carries an end date; rows without one never match
    /// after-end offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Worksheet the row came from, when the input had multiple sheets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl ScheduleRecord {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date: None,
            program: None,
            sheet: None,
        }
    }
}
