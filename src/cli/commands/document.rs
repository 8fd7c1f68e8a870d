//! Document Command
//!
//! Generate documentation for one source file or every supported file in a
//! folder.
//!
//! Usage:
//!   legacydoc document <path> [--pdf] [--output DIR] [--provider P] [--model M]

use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

use crate::agent::{BatchStats, DocumentationAgent, FileOutcome};
use crate::ai::{ProviderConfig, create_provider};
use crate::cli::Output;
use crate::config::{Config, ConfigLoader};
use crate::history::group_thousands;
use crate::types::{AgentError, Result};

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    pub path: PathBuf,
    pub pdf: bool,
    pub output: Option<PathBuf>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

impl DocumentOptions {
    /// Command-line flags win over every config layer
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.output {
            config.output.dir = dir.clone();
        }
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.pdf {
            config.output.pdf = true;
        }
    }
}

pub fn run(options: DocumentOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    options.apply(&mut config);

    let target = &options.path;
    if !target.exists() {
        return Err(AgentError::NotFound(target.display().to_string()));
    }

    let provider = create_provider(&ProviderConfig::from(&config.llm))?;
    info!("Using LLM provider: {} ({})", provider.name(), provider.model());

    let export_pdf = config.output.pdf;
    let agent = DocumentationAgent::new(provider, config);
    let output = Output::new();
    let rt = Runtime::new()?;

    output.banner("LEGACY CODE DOCUMENTATION AGENT");

    if target.is_dir() {
        output.field("Mode", "Batch Processing");
        output.field("Folder", target.display());
        if export_pdf {
            output.field("PDF export", "Enabled");
        }

        let stats = rt.block_on(agent.process_folder(target, export_pdf))?;
        print_batch(&output, &stats);
        return Ok(());
    }

    output.field("Mode", "Single File");
    if export_pdf {
        output.field("PDF export", "Enabled");
    }

    let outcome = rt.block_on(agent.process_file(target, export_pdf))?;
    print_file(&output, &outcome);

    if outcome.success {
        output.banner("COMPLETE!");
        Ok(())
    } else {
        let error = outcome.error.unwrap_or_default();
        let reason = error.strip_prefix("LLM API error: ").unwrap_or(&error);
        Err(AgentError::llm(reason))
    }
}

fn print_file(output: &Output, outcome: &FileOutcome) {
    println!();
    if !outcome.success {
        output.error(&format!(
            "{}: {}",
            outcome.filename,
            outcome.error.as_deref().unwrap_or("unknown error")
        ));
        return;
    }

    if let Some(paths) = &outcome.paths {
        output.success(&format!("Saved: {}", paths.md_path.display()));
        if let Some(pdf) = &paths.pdf_path {
            output.success(&format!("PDF:   {}", pdf.display()));
        }
    }
    output.field(
        "Tokens",
        format!(
            "{} in / {} out",
            group_thousands(u64::from(outcome.usage.input_tokens)),
            group_thousands(u64::from(outcome.usage.output_tokens))
        ),
    );
    output.field("Cost", format!("${:.4}", outcome.cost_usd));
}

fn print_batch(output: &Output, stats: &BatchStats) {
    if stats.processed == 0 {
        output.warning("No supported code files found");
        return;
    }
    output.banner("BATCH COMPLETE!");
    output.block(&stats.display());
    if stats.failed > 0 {
        output.warning(&format!("{} file(s) failed; see run history", stats.failed));
    }
}
