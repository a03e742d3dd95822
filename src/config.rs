use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "email_config.json";

#[derive(Debug)]
pub enum ConfigError {
    NotFound(PathBuf),
    Io(io::Error),
    Json(SerdeJsonError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "config file not found: {}", path.display())
            }
            ConfigError::Io(err) => write!(f, "config io error: {err}"),
            ConfigError::Json(err) => write!(f, "malformed config: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for ConfigError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Json(value)
    }
}

/// Logical name → spreadsheet column header mapping for the date columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumns {
    pub start_date: String,
    pub end_date: String,
}

impl Default for DateColumns {
    fn default() -> Self {
        Self {
            start_date: "Start Date".to_string(),
            end_date: "End Date".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
    pub recipients: Vec<String>,
    pub excel_file: PathBuf,
    #[serde(default)]
    pub date_columns: DateColumns,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: Vec<i64>,
    /// Candidate headers for the event name, tried in order.
    #[serde(default = "default_name_columns")]
    pub name_columns: Vec<String>,
    #[serde(default = "default_program_column")]
    pub program_column: String,
    /// LOCATION for generated calendar invites; omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_location: Option<String>,
    #[serde(default = "default_smtp_timeout_secs")]
    pub smtp_timeout_secs: u64,
}

fn default_reminder_days() -> Vec<i64> {
    vec![14, 7, 2, 1, -14]
}

fn default_name_columns() -> Vec<String> {
    vec![
        "Course Name".to_string(),
        "Event Name".to_string(),
        "Name".to_string(),
    ]
}

fn default_program_column() -> String {
    "Program Name".to_string()
}

fn default_smtp_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp_server: "smtp-mail.outlook.com".to_string(),
            smtp_port: 587,
            sender_email: "your_email@outlook.com".to_string(),
            sender_password: "your_password".to_string(),
            recipients: vec![
                "recipient1@example.com".to_string(),
                "recipient2@example.com".to_string(),
            ],
            excel_file: PathBuf::from("data/schedules.xlsx"),
            date_columns: DateColumns::default(),
            reminder_days: default_reminder_days(),
            name_columns: default_name_columns(),
            program_column: default_program_column(),
            invite_location: None,
            smtp_timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let config: Config = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config template for `remind init`.
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &Config::default())?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_server.trim().is_empty() {
            return Err(ConfigError::Invalid("smtp_server is empty".into()));
        }
        if self.smtp_port == 0 {
            return Err(ConfigError::Invalid("smtp_port must be nonzero".into()));
        }
        if self.sender_email.trim().is_empty() {
            return Err(ConfigError::Invalid("sender_email is empty".into()));
        }
        if self.recipients.is_empty() {
            return Err(ConfigError::Invalid("recipients list is empty".into()));
        }
        if self.name_columns.is_empty() {
            return Err(ConfigError::Invalid("name_columns list is empty".into()));
        }
        Ok(())
    }
}
