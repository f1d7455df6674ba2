/*!
 * Export of translated entries.
 *
 * Both formats carry only entries with a non-empty translation, in
 * collection order:
 * - JSON: a pretty-printed `{ "key": "translation" }` object
 * - CSV: a `Key,Translation` header and one fully quoted row per entry
 */

use anyhow::{anyhow, Context, Result};
use log::info;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::file_utils::FileManager;

/// Header row of the CSV export
pub const CSV_HEADER: &str = "Key,Translation";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(anyhow!("Invalid export format: {}", s)),
        }
    }
}

/// File name of an export, e.g. `de.json`
pub fn export_file_name(language_code: &str, format: ExportFormat) -> String {
    format!("{}.{}", language_code, format.extension())
}

/// Render `(key, translation)` pairs as a pretty-printed JSON object
pub fn to_json(data: &[(String, String)]) -> Result<String> {
    let map: Map<String, Value> = data
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();

    serde_json::to_string_pretty(&Value::Object(map)).context("Failed to serialize translations")
}

/// Render `(key, translation)` pairs as CSV
pub fn to_csv(data: &[(String, String)]) -> String {
    let rows = data
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{},{}", quote_csv_field(key), quote_csv_field(value)));

    std::iter::once(CSV_HEADER.to_string())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Enclose a field in double quotes, doubling inner quotes
pub fn quote_csv_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Unescape a single CSV field
///
/// Quoted fields lose their enclosing quotes and have doubled quotes
/// collapsed; unquoted fields are returned as-is.
pub fn parse_csv_field(field: &str) -> String {
    match field.strip_prefix('"').and_then(|f| f.strip_suffix('"')) {
        Some(inner) if field.len() >= 2 => inner.replace("\"\"", "\""),
        _ => field.to_string(),
    }
}

/// Parse CSV produced by `to_csv` back into `(key, translation)` pairs
///
/// Quoted fields may contain commas, doubled quotes and line breaks.
pub fn parse_csv(content: &str) -> Result<Vec<(String, String)>> {
    let mut records = split_csv_records(content)?.into_iter();

    match records.next() {
        Some(header) if header.join(",") == CSV_HEADER => {}
        Some(header) => return Err(anyhow!("Unexpected CSV header: {}", header.join(","))),
        None => return Ok(Vec::new()),
    }

    records
        .enumerate()
        .map(|(i, record)| match <[String; 2]>::try_from(record) {
            Ok([key, value]) => Ok((key, value)),
            Err(record) => Err(anyhow!("Row {} has {} fields, expected 2", i + 1, record.len())),
        })
        .collect()
}

fn split_csv_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) => in_quotes = true,
            (',', false) => record.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            (c, _) => field.push(c),
        }
    }

    if in_quotes {
        return Err(anyhow!("Unterminated quoted field"));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

/// Render and write an export into `dir`, returning the written path
pub fn write_export<P: AsRef<Path>>(
    dir: P,
    language_code: &str,
    format: ExportFormat,
    data: &[(String, String)],
) -> Result<PathBuf> {
    let content = match format {
        ExportFormat::Json => to_json(data)?,
        ExportFormat::Csv => to_csv(data),
    };

    let path = dir.as_ref().join(export_file_name(language_code, format));
    FileManager::write_to_file(&path, &content)?;

    info!("Exported {} translations to {}", data.iter().filter(|(_, v)| !v.is_empty()).count(), path.display());
    Ok(path)
}
