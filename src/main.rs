use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use legacydoc::cli::commands::document::DocumentOptions;

#[derive(Parser)]
#[command(name = "legacydoc")]
#[command(
    version,
    about = "Generate business documentation for legacy SQL, Python, C++ and DAX code"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Document a source file or every supported file in a folder
    Document {
        #[arg(help = "File or folder to document")]
        path: PathBuf,
        #[arg(long, help = "Also export each report as PDF")]
        pdf: bool,
        #[arg(long, short, help = "Output directory for reports")]
        output: Option<PathBuf>,
        #[arg(long, help = "LLM provider (openai, anthropic, gemini, ollama)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Convert a Markdown report to PDF
    Render {
        #[arg(help = "Markdown file to convert")]
        markdown: PathBuf,
        #[arg(long, short, help = "PDF path (default: same name with .pdf)")]
        output: Option<PathBuf>,
    },

    /// Show run history summary
    History {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = ["text", "json"],
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = ["text", "json"],
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Print panics as a short report before the default hook runs
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mlegacydoc encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    // .env may carry OPENAI_API_KEY and DEFAULT_MODEL
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Document {
            path,
            pdf,
            output,
            provider,
            model,
        } => {
            legacydoc::cli::commands::document::run(DocumentOptions {
                path,
                pdf,
                output,
                provider,
                model,
            })?;
        }
        Commands::Render { markdown, output } => {
            legacydoc::cli::commands::render::run(&markdown, output.as_deref())?;
        }
        Commands::History { format } => {
            legacydoc::cli::commands::history::run(&format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                legacydoc::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                legacydoc::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                legacydoc::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
