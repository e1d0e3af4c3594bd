//! Tabular sources (CSV and JSON Lines) turned into index records.
//!
//! Column roles are resolved once per run against the header, so per-row
//! work never repeats name lookups.

use crate::error::IngestError;
use crate::models::TabularRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const DEFAULT_TEXT_COLUMN: &str = "Description";
pub const DEFAULT_TIMESTAMP_CANDIDATES: [&str; 5] =
    ["created_dttm", "created_at", "timestamp", "time", "date"];
pub const TIMESTAMP_FIELD: &str = "timestamp";

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Recognized column roles for a tabular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub text: String,
    pub id: Option<String>,
    pub timestamp_candidates: Vec<String>,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_COLUMN.to_string(),
            id: None,
            timestamp_candidates: DEFAULT_TIMESTAMP_CANDIDATES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

/// Column positions for one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub text: usize,
    pub id: Option<usize>,
    pub timestamps: Vec<usize>,
}

impl ColumnRoles {
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text = column.into();
        self
    }

    pub fn with_id_column(mut self, column: Option<String>) -> Self {
        self.id = column;
        self
    }

    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns, IngestError> {
        let missing = |column: &str| IngestError::MissingColumn {
            column: column.to_string(),
            available: headers.to_vec(),
        };

        let text = find_column(headers, &self.text).ok_or_else(|| missing(&self.text))?;
        let id = match &self.id {
            Some(column) => Some(find_column(headers, column).ok_or_else(|| missing(column))?),
            None => None,
        };
        let timestamps = self
            .timestamp_candidates
            .iter()
            .filter_map(|candidate| find_column(headers, candidate))
            .collect();

        Ok(ResolvedColumns {
            text,
            id,
            timestamps,
        })
    }
}

fn find_column(headers: &[String], wanted: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header == wanted)
        .or_else(|| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(wanted))
        })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn normalize_column_name(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn load_table(path: &Path) -> Result<Table, IngestError> {
    if !path.exists() {
        return Err(IngestError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path),
        "jsonl" | "ndjson" => load_json_lines(path),
        _ => Err(IngestError::InvalidArgument(format!(
            "only .csv, .jsonl or .ndjson are supported: {}",
            path.display()
        ))),
    }
}

fn load_csv(path: &Path) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_column_name)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();
            return Err(IngestError::InvalidArgument(format!(
                "{}: expected {} fields on line {line}, saw {}",
                path.display(),
                headers.len(),
                record.len()
            )));
        }

        let mut row: Vec<Value> = record.iter().map(infer_cell).collect();
        row.resize(headers.len(), Value::Null);
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn load_json_lines(path: &Path) -> Result<Table, IngestError> {
    let reader = BufReader::new(File::open(path)?);
    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let object = match serde_json::from_str::<Value>(&line)? {
            Value::Object(object) => object,
            other => {
                return Err(IngestError::InvalidArgument(format!(
                    "expected a json object per line, got {other}"
                )))
            }
        };

        let mut normalized = Map::new();
        for (key, value) in object {
            let key = normalize_column_name(&key);
            if !headers.contains(&key) {
                headers.push(key.clone());
            }
            normalized.insert(key, value);
        }
        objects.push(normalized);
    }

    let rows = objects
        .into_iter()
        .map(|mut object| {
            headers
                .iter()
                .map(|header| object.remove(header).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Ok(Table { headers, rows })
}

fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::Number(integer.into());
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Trims the text column and drops rows whose text is empty.
pub fn sanitize(table: Table, columns: &ResolvedColumns) -> Result<Table, IngestError> {
    let column_name = table
        .headers
        .get(columns.text)
        .cloned()
        .unwrap_or_default();

    let rows: Vec<Vec<Value>> = table
        .rows
        .into_iter()
        .filter_map(|mut row| {
            let text = row.get(columns.text).and_then(cell_text)?;
            row[columns.text] = Value::String(text);
            Some(row)
        })
        .collect();

    if rows.is_empty() {
        return Err(IngestError::EmptyColumn(column_name));
    }

    Ok(Table {
        headers: table.headers,
        rows,
    })
}

pub fn build_records(table: &Table, columns: &ResolvedColumns) -> Vec<TabularRecord> {
    table
        .rows
        .iter()
        .map(|row| {
            let mut source = Map::new();
            for (header, value) in table.headers.iter().zip(row) {
                let blank = match value {
                    Value::Null => true,
                    Value::String(text) => text.trim().is_empty(),
                    _ => false,
                };
                if !blank {
                    source.insert(header.clone(), value.clone());
                }
            }

            let timestamp = columns
                .timestamps
                .iter()
                .filter_map(|index| row.get(*index).and_then(cell_text))
                .find_map(|raw| to_iso(&raw));
            if let Some(timestamp) = timestamp {
                source.insert(TIMESTAMP_FIELD.to_string(), Value::String(timestamp));
            }

            let id = columns
                .id
                .and_then(|index| row.get(index))
                .and_then(cell_text);

            TabularRecord { id, source }
        })
        .collect()
}

/// Loads, resolves, sanitizes and converts a tabular file in one pass.
pub fn load_records(path: &Path, roles: &ColumnRoles) -> Result<Vec<TabularRecord>, IngestError> {
    let table = load_table(path)?;
    let columns = roles.resolve(&table.headers)?;
    let table = sanitize(table, &columns)?;
    Ok(build_records(&table, &columns))
}

/// Parses common date/time spellings into ISO-8601.
pub fn to_iso(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.to_rfc3339());
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.format("%Y-%m-%dT%H:%M:%S").to_string());
        }
    }

    None
}
