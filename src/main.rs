//! machscope - inspect the structure and imports of a 64-bit Mach-O image.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use machscope::config::AnalysisConfig;
use machscope::logging::{self, LogFormat};
use machscope::render::{render_json, render_text};

/// Inspect the structure and imports of a 64-bit Mach-O image.
#[derive(Parser, Debug)]
#[command(name = "machscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Demangle Rust and C++ symbol names
    #[arg(long)]
    demangle: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write log records as JSON
    #[arg(long)]
    log_json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Mach-O image to analyze
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    logging::init(format, logging::verbosity_filter(cli.verbose));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Analysis failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if cli.demangle {
        config.symbols.demangle = true;
    }

    let report = machscope::analyze_path(&cli.file, &config)
        .with_context(|| format!("analyzing {}", cli.file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let json = render_json(&report).context("serializing report")?;
        writeln!(out, "{json}")?;
    } else {
        render_text(&report, &mut out)?;
    }
    out.flush()?;
    Ok(())
}
