//! CSV mirror of the run log
//!
//! A spreadsheet-friendly copy of every run. The JSON-lines file stays the
//! source of truth; this file is append-only and never read back.

use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::RunRecord;
use crate::types::{Result, ResultExt};

pub const COLUMNS: [&str; 12] = [
    "Timestamp",
    "Filename",
    "Language",
    "Model",
    "Input Tokens",
    "Output Tokens",
    "Total Tokens",
    "Cost (USD)",
    "Output Path",
    "PDF Path",
    "Success",
    "Error",
];

/// Quote a field when it contains a delimiter, quote or line break
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_row<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let escaped: Vec<String> = fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect();
    escaped.join(",")
}

/// Timestamp in spreadsheet form, or unchanged when it does not parse
fn display_timestamp(timestamp: &str) -> String {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

pub fn header_row() -> String {
    join_row(COLUMNS)
}

pub fn record_row(record: &RunRecord) -> String {
    join_row([
        display_timestamp(&record.timestamp),
        record.filename.clone(),
        record.language.clone(),
        record.model.clone(),
        record.input_tokens.to_string(),
        record.output_tokens.to_string(),
        record.total_tokens.to_string(),
        format!("{:.6}", record.cost_usd),
        record.output_path.clone(),
        record.pdf_path.clone().unwrap_or_default(),
        if record.success { "Yes" } else { "No" }.to_string(),
        record.error.clone().unwrap_or_default(),
    ])
}

/// Append one record, writing the header first when the file is new or empty
pub fn append(path: &Path, record: &RunRecord) -> Result<()> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .history_context(format!("open {}", path.display()))?;

    let mut out = String::new();
    if needs_header {
        out.push_str(&header_row());
        out.push('\n');
    }
    out.push_str(&record_row(record));
    out.push('\n');

    file.write_all(out.as_bytes())
        .history_context(format!("write {}", path.display()))
}
