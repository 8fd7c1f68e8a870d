//! History Command
//!
//! Summarize the run history.
//!
//! Usage:
//!   legacydoc history [-f json]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::history::RunLogger;
use crate::types::Result;

pub fn run(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    let logger = RunLogger::from_config(&config.history);
    let summary = logger.summary()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", summary.display());
    if !summary.is_empty() {
        let output = Output::new();
        output.info(&format!("Run log:    {}", logger.jsonl_path().display()));
        output.info(&format!("CSV mirror: {}", logger.csv_path().display()));
    }
    Ok(())
}
