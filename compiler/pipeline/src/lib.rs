#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Generator pipeline.
//!
//! Runs one pass over a loaded program graph:
//!
//! - `loader` - where program graphs come from
//! - `summary` - the show-only listing
//! - `output` - writing and removing the generated file
//!
//! [`process`] reports loader errors, analyzes the root package and then either
//! prints a summary or writes the generated file. Diagnostics are reported, not
//! returned as errors; [`PipelineError`] is reserved for operational failures.

use std::io::Write;
use std::path::{Path, PathBuf};

use analysis::{AnalysisError, Naming};
use codegen::{CodeGenerator, DispatcherGenerator};
use config::Config;
use ir::{GraphError, Program};
use thiserror::Error;

pub mod loader;
pub mod output;
pub mod summary;

pub use loader::{JsonGraphLoader, ProgramLoader};
pub use summary::{monospace_width, render_summary, NO_HANDLERS};

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The program graph could not be loaded.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Analysis failed for a reason other than diagnostics.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The generated file could not be written or removed.
    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        /// Output file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// I/O error while reporting.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Settings of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Naming convention
    pub naming: Naming,
    /// Output file name, relative to the package directory
    pub out_file: String,
    /// Only list handler types
    pub show: bool,
}

impl Default for Options {
    fn default() -> Self { Self::from_config(&Config::default()) }
}

impl Options {
    /// Options taken from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            naming: Naming::new(&config.naming.handler_suffix, &config.naming.event_suffix),
            out_file: config.output.file.clone(),
            show: config.output.show,
        }
    }

    /// Set show-only mode.
    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Diagnostics were reported; nothing was written
    Rejected(usize),
    /// No handler types in the package
    NoHandlers,
    /// The summary of this many events was printed
    Shown(usize),
    /// The file at this path was written
    Generated(PathBuf),
}

impl Outcome {
    /// Whether the run counts as successful.
    pub fn is_success(&self) -> bool { !matches!(self, Outcome::Rejected(_)) }
}

/// Where the generated file of `program` goes.
///
/// The root package directory, resolved against `base_dir` when it is
/// relative or missing.
pub fn output_path(program: &Program, base_dir: &Path, out_file: &str) -> Result<PathBuf> {
    let root = program
        .root_package()
        .ok_or_else(|| GraphError::MissingRoot(program.root.clone()))?;
    Ok(base_dir.join(&root.dir).join(out_file))
}

/// Run one generator pass, writing the file at `path` unless in show mode.
///
/// Normal output goes to `out`, loader errors and diagnostics to `err`.
pub fn process<O: Write, E: Write>(
    program: &Program,
    path: &Path,
    options: &Options,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome> {
    let root = program
        .root_package()
        .ok_or_else(|| GraphError::MissingRoot(program.root.clone()))?;

    // Errors in a previous output file are stale by definition.
    let own = path.to_string_lossy();
    for error in root.errors.iter().filter(|e| !e.pos.starts_with(own.as_ref())) {
        writeln!(err, "[go] {}", error)?;
    }

    let model = match analysis::analyze(program, &options.naming) {
        Ok(model) => model,
        Err(AnalysisError::Rejected(diagnostics)) => {
            for diagnostic in &diagnostics {
                writeln!(err, "[evon] {}", diagnostic)?;
            }
            return Ok(Outcome::Rejected(diagnostics.len()));
        }
        Err(other) => return Err(other.into()),
    };

    if model.is_empty() {
        writeln!(out, "{}", NO_HANDLERS)?;
        if !options.show {
            output::remove_stale(path)?;
        }
        return Ok(Outcome::NoHandlers);
    }

    if options.show {
        write!(out, "{}", render_summary(&model))?;
        return Ok(Outcome::Shown(model.events.len()));
    }

    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let files = DispatcherGenerator::new(file_name).generate(&model)?;
    for (name, source) in &files {
        output::write_file(&path.with_file_name(name), source)?;
    }
    logging::info("pipeline", &format!("{} event type(s) generated", model.events.len()));

    writeln!(out, "Generated {}", path.display())?;
    Ok(Outcome::Generated(path.to_path_buf()))
}

/// Load the program through `loader` and run [`process`] on it.
///
/// The output path is derived with [`output_path`].
pub fn run<O: Write, E: Write>(
    loader: &dyn ProgramLoader,
    base_dir: &Path,
    options: &Options,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome> {
    let program = loader.load()?;
    let path = output_path(&program, base_dir, &options.out_file)?;
    logging::trace("pipeline", &format!("output path {}", path.display()));
    process(&program, &path, options, out, err)
}
