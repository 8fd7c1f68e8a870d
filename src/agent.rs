//! Documentation Pipeline
//!
//! ```text
//! read → generate (LLM) → save Markdown (+ PDF) → log run
//! ```
//!
//! Folder mode scans for supported files and runs the same steps on each,
//! one at a time, in path order.

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::ai::{SharedProvider, TokenUsage, generate_documentation};
use crate::config::Config;
use crate::constants::report::{DISPLAY_TIMESTAMP_FORMAT, FILE_SUFFIX, FILE_TIMESTAMP_FORMAT};
use crate::history::{RunEntry, RunLogger, group_thousands};
use crate::render;
use crate::source::{FileScanner, Language, read_code_file};
use crate::types::Result;

/// Where a report was written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPaths {
    pub md_path: PathBuf,
    /// `None` when PDF export was off or failed
    pub pdf_path: Option<PathBuf>,
}

/// Result of documenting one file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub filename: String,
    pub language: Language,
    pub success: bool,
    pub usage: TokenUsage,
    pub cost_usd: f64,
    pub paths: Option<SavedPaths>,
    pub error: Option<String>,
}

/// Aggregate of a folder run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub processed: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cost: f64,
}

impl BatchStats {
    fn record(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        if outcome.success {
            self.succeeded += 1;
            self.total_input_tokens += u64::from(outcome.usage.input_tokens);
            self.total_output_tokens += u64::from(outcome.usage.output_tokens);
            self.total_cost += outcome.cost_usd;
        } else {
            self.failed += 1;
        }
    }

    fn record_unreadable(&mut self) {
        self.processed += 1;
        self.failed += 1;
    }

    pub fn display(&self) -> String {
        format!(
            "Files processed: {}\n\
             Succeeded:       {}\n\
             Failed:          {}\n\
             Total tokens:    {} in / {} out\n\
             Total cost:      ${:.4}",
            self.processed,
            self.succeeded,
            self.failed,
            group_thousands(self.total_input_tokens),
            group_thousands(self.total_output_tokens),
            self.total_cost
        )
    }
}

/// Markdown report body as saved to disk
pub fn report_markdown(filename: &str, documentation: &str, generated: &str) -> String {
    format!(
        "# Documentation: {}\n\n*Generated: {}*\n\n---\n\n{}",
        filename, generated, documentation
    )
}

/// `<stem>_documentation_<timestamp>`
pub fn report_basename(filename: &str, timestamp: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!("{}{}_{}", stem, FILE_SUFFIX, timestamp)
}

pub struct DocumentationAgent {
    provider: SharedProvider,
    config: Config,
    logger: RunLogger,
}

impl DocumentationAgent {
    pub fn new(provider: SharedProvider, config: Config) -> Self {
        let logger = RunLogger::from_config(&config.history);
        Self {
            provider,
            config,
            logger,
        }
    }

    pub fn logger(&self) -> &RunLogger {
        &self.logger
    }

    /// Write the report for `filename` under the output directory.
    ///
    /// A failed Markdown write is an error. A failed PDF render is logged and
    /// leaves `pdf_path` empty.
    pub fn save_documentation(
        &self,
        filename: &str,
        documentation: &str,
        export_pdf: bool,
    ) -> Result<SavedPaths> {
        let out_dir = &self.config.output.dir;
        fs::create_dir_all(out_dir)?;

        let now = Local::now();
        let basename = report_basename(filename, &now.format(FILE_TIMESTAMP_FORMAT).to_string());
        let md_path = out_dir.join(format!("{}.md", basename));
        let content = report_markdown(
            filename,
            documentation,
            &now.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
        );

        fs::write(&md_path, &content)?;
        info!(path = %md_path.display(), "Markdown report saved");

        let pdf_path = if export_pdf {
            let pdf_path = out_dir.join(format!("{}.pdf", basename));
            let outcome = render::markdown_to_pdf(&content, &pdf_path);
            if outcome.success {
                Some(pdf_path)
            } else {
                warn!(
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "PDF export skipped"
                );
                None
            }
        } else {
            None
        };

        Ok(SavedPaths { md_path, pdf_path })
    }

    /// Document one file and log the run.
    ///
    /// Read and save failures are errors. An LLM failure is a logged,
    /// unsuccessful outcome.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn process_file(&self, path: &Path, export_pdf: bool) -> Result<FileOutcome> {
        let source = read_code_file(path)?;
        info!(file = %source.filename, language = %source.language, "Documenting file");

        let result = generate_documentation(self.provider.as_ref(), &source).await;

        let documentation = match (result.success, result.documentation) {
            (true, Some(doc)) => doc,
            _ => {
                let error = result
                    .error
                    .unwrap_or_else(|| "LLM API error: empty response".to_string());
                self.logger.log_run(RunEntry {
                    filename: source.filename.clone(),
                    language: source.language.to_string(),
                    model: result.model_used,
                    output_path: String::new(),
                    success: false,
                    error: Some(error.clone()),
                    ..RunEntry::default()
                })?;
                return Ok(FileOutcome {
                    filename: source.filename,
                    language: source.language,
                    success: false,
                    usage: TokenUsage::default(),
                    cost_usd: 0.0,
                    paths: None,
                    error: Some(error),
                });
            }
        };

        let paths = self.save_documentation(&source.filename, &documentation, export_pdf)?;

        self.logger.log_run(RunEntry {
            filename: source.filename.clone(),
            language: source.language.to_string(),
            model: result.model_used,
            input_tokens: result.usage.input_tokens,
            output_tokens: result.usage.output_tokens,
            cost_usd: result.estimated_cost,
            output_path: paths.md_path.display().to_string(),
            pdf_path: paths.pdf_path.as_ref().map(|p| p.display().to_string()),
            success: true,
            error: None,
        })?;

        Ok(FileOutcome {
            filename: source.filename,
            language: source.language,
            success: true,
            usage: result.usage,
            cost_usd: result.estimated_cost,
            paths: Some(paths),
            error: None,
        })
    }

    /// Document every supported file under `folder`, sequentially
    #[instrument(skip_all, fields(folder = %folder.display()))]
    pub async fn process_folder(&self, folder: &Path, export_pdf: bool) -> Result<BatchStats> {
        let files = FileScanner::new(folder)
            .with_exclude(&self.config.scan.exclude)
            .with_max_file_size(self.config.scan.max_file_size)
            .scan()?;

        let mut stats = BatchStats::default();
        if files.is_empty() {
            warn!(
                "No supported code files found. Supported extensions: {}",
                Language::supported_extensions().join(", ")
            );
            return Ok(stats);
        }

        info!(count = files.len(), "Found code files to process");

        for file in &files {
            match self.process_file(&file.path, export_pdf).await {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "File skipped");
                    stats.record_unreadable();
                }
            }
        }

        info!(
            processed = stats.processed,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "Batch complete"
        );
        Ok(stats)
    }
}
