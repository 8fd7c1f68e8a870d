//! Run History
//!
//! Every documentation run is appended to a JSON-lines file, the primary
//! store, and mirrored to a CSV file for spreadsheet users. The summary
//! aggregates the JSON-lines file only.

mod csv;
mod summary;

pub use summary::{GroupStats, HistorySummary, group_thousands};

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::constants::{history::RUN_COST_DECIMALS, round_to};
use crate::types::{AgentError, Result, ResultExt};

/// One logged run, as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default = "unknown")]
    pub language: String,
    #[serde(default = "unknown")]
    pub model: String,
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
    #[serde(default)]
    pub cost_usd: f64,
    #[serde(default)]
    pub output_path: String,
    #[serde(default)]
    pub pdf_path: Option<String>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn default_success() -> bool {
    true
}

/// Input for [`RunLogger::log_run`]; timestamp and totals are filled in
#[derive(Debug, Clone, Default)]
pub struct RunEntry {
    pub filename: String,
    pub language: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    pub output_path: String,
    pub pdf_path: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl RunEntry {
    fn into_record(self) -> RunRecord {
        RunRecord {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            filename: self.filename,
            language: self.language,
            model: self.model,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            total_tokens: self.input_tokens + self.output_tokens,
            cost_usd: round_to(self.cost_usd, RUN_COST_DECIMALS),
            output_path: self.output_path,
            pdf_path: self.pdf_path,
            success: self.success,
            error: self.error,
        }
    }
}

/// Appends runs to the history files and reads them back
#[derive(Debug, Clone)]
pub struct RunLogger {
    jsonl_path: PathBuf,
    csv_path: PathBuf,
}

impl RunLogger {
    pub fn new(jsonl_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            jsonl_path: jsonl_path.into(),
            csv_path: csv_path.into(),
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(&config.jsonl_path, &config.csv_path)
    }

    pub fn jsonl_path(&self) -> &Path {
        &self.jsonl_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Record one run. Only the JSON-lines append can fail the call.
    pub fn log_run(&self, entry: RunEntry) -> Result<RunRecord> {
        let record = entry.into_record();

        ensure_parent(&self.jsonl_path)?;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.jsonl_path)
            .history_context(format!("open {}", self.jsonl_path.display()))?;
        file.write_all(line.as_bytes())
            .history_context(format!("write {}", self.jsonl_path.display()))?;

        if let Err(e) = ensure_parent(&self.csv_path).and_then(|_| csv::append(&self.csv_path, &record))
        {
            warn!(path = %self.csv_path.display(), error = %e, "CSV history mirror not updated");
        }

        debug!(file = %record.filename, success = record.success, "Run logged");
        Ok(record)
    }

    /// All records in file order. A missing file is an empty history.
    pub fn load_history(&self) -> Result<Vec<RunRecord>> {
        let file = match fs::File::open(&self.jsonl_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AgentError::Io(e)),
        };

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.history_context(format!("read {}", self.jsonl_path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RunRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => debug!(line = idx + 1, error = %e, "Skipping malformed history line"),
            }
        }
        Ok(records)
    }

    pub fn summary(&self) -> Result<HistorySummary> {
        Ok(HistorySummary::from_records(&self.load_history()?))
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .history_context(format!("create {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn logger(dir: &TempDir) -> RunLogger {
        RunLogger::new(
            dir.path().join("logs/run_history.jsonl"),
            dir.path().join("logs/run_history.csv"),
        )
    }

    fn entry(filename: &str, success: bool) -> RunEntry {
        RunEntry {
            filename: filename.to_string(),
            language: "SQL".to_string(),
            model: "gpt-4o-mini".to_string(),
            input_tokens: 1000,
            output_tokens: 500,
            cost_usd: 0.000_450_000_4,
            output_path: format!("output/{}.md", filename),
            pdf_path: None,
            success,
            error: (!success).then(|| "LLM API error: boom".to_string()),
        }
    }

    #[test]
    fn test_log_run_fills_derived_fields() {
        let dir = TempDir::new().unwrap();
        let record = logger(&dir).log_run(entry("a.sql", true)).unwrap();

        assert_eq!(record.total_tokens, 1500);
        assert_eq!(record.cost_usd, 0.00045);
        assert!(record.timestamp.contains('T'));
    }

    #[test]
    fn test_jsonl_and_csv_written() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir);
        logger.log_run(entry("a.sql", true)).unwrap();
        logger.log_run(entry("b.sql", false)).unwrap();

        let jsonl = fs::read_to_string(logger.jsonl_path()).unwrap();
        assert_eq!(jsonl.lines().count(), 2);

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("Timestamp,"));
        assert!(rows[2].contains(",No,LLM API error: boom"));
    }

    #[test]
    fn test_csv_failure_does_not_fail_run() {
        let dir = TempDir::new().unwrap();
        // A directory where the CSV file should be
        let csv_path = dir.path().join("mirror");
        fs::create_dir(&csv_path).unwrap();
        let logger = RunLogger::new(dir.path().join("h.jsonl"), &csv_path);

        assert!(logger.log_run(entry("a.sql", true)).is_ok());
        assert_eq!(logger.load_history().unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(logger(&dir).load_history().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.jsonl");
        fs::write(
            &path,
            "{\"filename\":\"a.sql\",\"cost_usd\":0.5}\nnot json\n\n{\"filename\":\"b.py\",\"success\":false}\n",
        )
        .unwrap();

        let records = RunLogger::new(&path, dir.path().join("h.csv"))
            .load_history()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].success);
        assert_eq!(records[0].language, "Unknown");
        assert!(!records[1].success);
    }

    #[test]
    fn test_record_roundtrips_through_jsonl() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir);
        let written = logger.log_run(entry("a.sql", false)).unwrap();
        let loaded = logger.load_history().unwrap();
        assert_eq!(loaded, vec![written]);
    }
}
