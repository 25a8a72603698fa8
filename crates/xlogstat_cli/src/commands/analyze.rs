//! Analyze command implementation.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use xlogstat_core::{
    AnalysisReport, Analyzer, AnalyzerConfig, FileSource, MapResolver, SegmentSource, TextSource,
};

/// Options of the analyze command.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Roll all inputs up into a summary.
    pub summary: bool,
    /// Rank top relations.
    pub top_relations: bool,
    /// Size of the top relations list.
    pub top_n: usize,
    /// Relation name mapping file.
    pub relation_names: Option<PathBuf>,
    /// Worker threads.
    pub jobs: usize,
    /// Single-line JSON output.
    pub compact: bool,
}

/// Runs the analyze command.
pub fn run(inputs: &[PathBuf], options: &AnalyzeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let sources = collect_sources(inputs, io::stdin())?;
    info!("Analyzing {} segment dump(s)", sources.len());

    let report = analyzer(options)?.analyze(&sources)?;

    let stdout = io::stdout();
    write_report(&report, options.compact, stdout.lock())?;
    Ok(())
}

fn analyzer(options: &AnalyzeOptions) -> Result<Analyzer, Box<dyn std::error::Error>> {
    let config = AnalyzerConfig::new()
        .summary(options.summary)
        .top_relations(options.top_relations)
        .top_n(options.top_n)
        .jobs(options.jobs);

    let mut analyzer = Analyzer::new(config);
    if let Some(path) = &options.relation_names {
        analyzer = analyzer.with_resolver(Box::new(MapResolver::from_json_file(path)?));
    }
    Ok(analyzer)
}

/// Turns command-line inputs into sources; `-` (or no input) reads `stdin`.
fn collect_sources(
    inputs: &[PathBuf],
    mut stdin: impl Read,
) -> Result<Vec<Box<dyn SegmentSource>>, Box<dyn std::error::Error>> {
    let stdin_path = Path::new("-");
    let mut sources: Vec<Box<dyn SegmentSource>> = Vec::with_capacity(inputs.len().max(1));
    let mut stdin_text = None;

    let default_input = [stdin_path.to_path_buf()];
    let inputs = if inputs.is_empty() { &default_input[..] } else { inputs };

    for input in inputs {
        if input == stdin_path {
            if stdin_text.is_none() {
                let mut text = String::new();
                stdin.read_to_string(&mut text)?;
                stdin_text = Some(text);
            }
            let text = stdin_text.clone().unwrap_or_default();
            sources.push(Box::new(TextSource::new("stdin", text)));
        } else {
            sources.push(Box::new(FileSource::new(input)));
        }
    }
    Ok(sources)
}

fn write_report(
    report: &AnalysisReport,
    compact: bool,
    mut out: impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    if compact {
        serde_json::to_writer(&mut out, report)?;
    } else {
        serde_json::to_writer_pretty(&mut out, report)?;
    }
    writeln!(out)?;
    Ok(())
}
