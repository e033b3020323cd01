//! Evon command-line interface
//!
//! Reads the program graph written by the loader, analyzes the root package
//! and writes the dispatcher file next to its sources.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use evon_cli::{load_config, log_level, Overrides, Result};
use pipeline::{JsonGraphLoader, Options};

/// Command-line interface configuration for evon.
#[derive(Parser, Debug)]
#[command(name = "evon", about = "Generate event dispatchers for annotated handler types", version)]
struct Cli {
    /// Program graph produced by the loader
    graph: PathBuf,
    /// Required suffix of the event handler type names
    #[arg(long)]
    handler_suffix: Option<String>,
    /// Suffix of the generated event type names
    #[arg(long)]
    event_suffix: Option<String>,
    /// Output source file name
    #[arg(long)]
    out: Option<String>,
    /// Comma-separated build tags the graph is expected to use
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
    /// Show event handler types without generation
    #[arg(long)]
    show: bool,
    /// Configuration file (default: evon.toml next to the graph)
    #[arg(long)]
    config: Option<PathBuf>,
    /// More log output; repeat for tracing
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            handler_suffix: self.handler_suffix.clone(),
            event_suffix: self.event_suffix.clone(),
            out: self.out.clone(),
            tags: self.tags.clone(),
            show: self.show,
        }
    }

    fn base_dir(&self) -> &Path {
        match self.graph.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

/// Main entry point for the evon application.
fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let base_dir = cli.base_dir();

    let mut config = load_config(cli.config.as_deref(), base_dir)?;
    cli.overrides().apply(&mut config);
    config.validate()?;
    logging::set_level(log_level(&config, cli.verbose)?);

    let loader = JsonGraphLoader::new(&cli.graph).with_tags(config.loader.tags.clone());
    let options = Options::from_config(&config);
    let outcome =
        pipeline::run(&loader, base_dir, &options, &mut io::stdout().lock(), &mut io::stderr().lock())?;

    Ok(outcome.is_success())
}
