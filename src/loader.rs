use crate::config::Config;
use crate::dates::parse_date;
use crate::record::ScheduleRecord;
use calamine::{Data, DataType, Reader, open_workbook_auto};
use chrono::NaiveDate;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    Workbook(String),
    Csv(csv::Error),
    MissingColumn(String),
    Unsupported(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => {
                write!(f, "schedule file not found: {}", path.display())
            }
            LoadError::Workbook(msg) => write!(f, "workbook error: {msg}"),
            LoadError::Csv(err) => write!(f, "csv error: {err}"),
            LoadError::MissingColumn(column) => {
                write!(f, "required column '{column}' not found")
            }
            LoadError::Unsupported(ext) => {
                write!(f, "unsupported schedule format '{ext}'")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<calamine::Error> for LoadError {
    fn from(value: calamine::Error) -> Self {
        Self::Workbook(value.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Column positions resolved against one header row. Name and start date are
/// required; end date and program are used when present.
struct ColumnIndexes {
    name: usize,
    start: usize,
    end: Option<usize>,
    program: Option<usize>,
}

impl ColumnIndexes {
    fn resolve(headers: &[String], config: &Config) -> Result<Self, LoadError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted.trim()))
        };

        let name = config
            .name_columns
            .iter()
            .find_map(|candidate| find(candidate))
            .ok_or_else(|| LoadError::MissingColumn(config.name_columns.join(" / ")))?;
        let start = find(&config.date_columns.start_date)
            .ok_or_else(|| LoadError::MissingColumn(config.date_columns.start_date.clone()))?;
        let end = find(&config.date_columns.end_date);
        let program = find(&config.program_column);

        Ok(Self {
            name,
            start,
            end,
            program,
        })
    }
}

/// Load schedule records from the configured file, dispatching on extension.
/// Workbook formats scan every sheet; rows that cannot be parsed are skipped
/// with a warning rather than failing the load.
pub fn load_records(config: &Config) -> Result<Vec<ScheduleRecord>, LoadError> {
    let path = config.excel_file.as_path();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => load_records_from_csv(path, config),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_records_from_workbook(path, config),
        other => Err(LoadError::Unsupported(other.to_string())),
    }
}

/// Load records from every sheet of an Excel/OpenDocument workbook. Sheets
/// without the required columns are skipped; the load only fails when no
/// sheet yields them.
pub fn load_records_from_workbook(
    path: &Path,
    config: &Config,
) -> Result<Vec<ScheduleRecord>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut records = Vec::new();
    let mut missing_column: Option<LoadError> = None;
    let mut usable_sheets = 0;

    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name)?;
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };
        let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
        let columns = match ColumnIndexes::resolve(&headers, config) {
            Ok(columns) => columns,
            Err(err) => {
                warn!("sheet '{sheet_name}' skipped: {err}");
                missing_column.get_or_insert(err);
                continue;
            }
        };
        usable_sheets += 1;

        let before = records.len();
        for (row_idx, row) in rows.enumerate() {
            let name = row.get(columns.name).map(cell_to_string).and_then(non_empty);
            let start = row.get(columns.start).and_then(cell_to_date);
            let end = columns.end.and_then(|i| row.get(i)).and_then(cell_to_date);
            let program = columns
                .program
                .and_then(|i| row.get(i))
                .map(cell_to_string)
                .and_then(non_empty);
            if let Some(record) =
                build_record(name, start, end, program, Some(sheet_name.as_str()), row_idx)
            {
                records.push(record);
            }
        }
        info!(
            "loaded {} record(s) from sheet '{sheet_name}'",
            records.len() - before
        );
    }

    if usable_sheets == 0 {
        if let Some(err) = missing_column {
            return Err(err);
        }
    }
    info!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Load records from a CSV file with a header row. A missing required column
/// is fatal here since there is no other sheet to fall back to.
pub fn load_records_from_csv(
    path: &Path,
    config: &Config,
) -> Result<Vec<ScheduleRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = ColumnIndexes::resolve(&headers, config)?;

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!("row {} skipped: {err}", row_idx + 2);
                continue;
            }
        };
        let field = |idx: usize| row.get(idx).map(|s| s.to_string()).and_then(non_empty);
        let name = field(columns.name);
        let start = field(columns.start).as_deref().and_then(parse_date);
        let end = columns
            .end
            .and_then(|i| field(i))
            .as_deref()
            .and_then(parse_date);
        let program = columns.program.and_then(|i| field(i));
        if let Some(record) = build_record(name, start, end, program, None, row_idx) {
            records.push(record);
        }
    }
    info!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

fn build_record(
    name: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    program: Option<String>,
    sheet: Option<&str>,
    row_idx: usize,
) -> Option<ScheduleRecord> {
    // Header offset: data rows start at spreadsheet row 2.
    let row_number = row_idx + 2;
    let Some(name) = name else {
        // Fully empty rows are common padding at the bottom of a sheet.
        if start.is_some() || end.is_some() {
            warn!("row {row_number} skipped: no event name");
        }
        return None;
    };
    let Some(start) = start else {
        warn!("row {row_number} ('{name}') skipped: missing or unparseable start date");
        return None;
    };

    let mut record = ScheduleRecord::new(name, start);
    record.end_date = end;
    record.program = program;
    record.sheet = sheet.map(|s| s.to_string());
    Some(record)
}

fn cell_to_string(cell: &Data) -> String {
    cell.as_string().unwrap_or_default().trim().to_string()
}

fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    // Native date cells convert directly; text cells go through the ordered
    // format list.
    cell.as_date()
        .or_else(|| cell.as_string().as_deref().and_then(parse_date))
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
