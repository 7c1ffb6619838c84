//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{build, catalog, compliance_cmd, question_cmd};
use crate::compiler::Config;

#[derive(Parser)]
#[command(name = "lexcat")]
#[command(author, version, about = "Compile legal document definitions into a typed catalog")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new lexcat project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Discover definitions and write the catalog artifacts
    Build,

    /// Rebuild the catalog whenever a definition changes
    Watch {
        /// Seconds to coalesce bursts of file changes
        #[arg(long, default_value = "2")]
        debounce: u64,
    },

    /// List the documents in the catalog
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one document's catalog entry in full
    Show {
        /// Document id
        id: String,
    },

    /// Show compliance guidance for a state
    Compliance {
        /// Two-letter state code
        state: String,

        /// One-line summary instead of the full display
        #[arg(long)]
        summary: bool,
    },

    /// Show a document's active questions for a set of answers
    Questions {
        /// Document id
        id: String,

        /// Answers as a JSON object of question id -> value
        #[arg(long, default_value = "{}")]
        answers: String,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load()?;
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format);

    match cli.command {
        Commands::Init { path } => build::init(&output, &path)?,
        Commands::Build => build::run(&output, &config)?,
        Commands::Watch { debounce } => build::watch(&output, &config, debounce)?,
        Commands::List { category } => catalog::list(&output, &config, category.as_deref())?,
        Commands::Show { id } => catalog::show(&output, &config, &id)?,
        Commands::Compliance { state, summary } => {
            compliance_cmd::run(&output, &state, summary)?
        }
        Commands::Questions { id, answers } => {
            question_cmd::run(&output, &config, &id, &answers)?
        }
    }

    Ok(())
}

/// Logging goes to stderr so stdout stays parseable in JSON mode
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lexcat_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexcat_cli=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
