//! xlogstat CLI
//!
//! Statistics over saved `pg_xlogdump` output.
//!
//! # Commands
//!
//! - `analyze` - Classify dump lines and report per-segment statistics
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Statistics for PostgreSQL xlog segment dumps.
#[derive(Parser)]
#[command(name = "xlogstat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report statistics for saved pg_xlogdump output
    Analyze {
        /// Files holding pg_xlogdump output, `-` for stdin (default)
        inputs: Vec<PathBuf>,

        /// Add a summary over all inputs
        #[arg(short, long)]
        summary: bool,

        /// Add the top relations by distinct pages
        #[arg(short, long)]
        top_relations: bool,

        /// Number of top relations to list
        #[arg(short = 'n', long, default_value = "10")]
        top_n: usize,

        /// JSON file mapping relation file nodes to names
        #[arg(short = 'R', long)]
        relation_names: Option<PathBuf>,

        /// Number of inputs analyzed concurrently
        #[arg(short, long, default_value = "1")]
        jobs: usize,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr, reports to stdout.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            inputs,
            summary,
            top_relations,
            top_n,
            relation_names,
            jobs,
            compact,
        } => {
            let options = commands::analyze::AnalyzeOptions {
                summary,
                top_relations,
                top_n,
                relation_names,
                jobs,
                compact,
            };
            commands::analyze::run(&inputs, &options)?;
        }
        Commands::Version => {
            println!("xlogstat CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("xlogstat core v{}", xlogstat_core::VERSION);
        }
    }

    Ok(())
}
