//! Program graph sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ir::Program;

use crate::Result;

/// Something that yields the type-checked program to generate for.
pub trait ProgramLoader {
    /// Load the program.
    fn load(&self) -> Result<Program>;
}

/// An already loaded program.
impl ProgramLoader for Program {
    fn load(&self) -> Result<Program> { Ok(self.clone()) }
}

/// Reads a program graph written by the external loader as JSON.
#[derive(Debug, Clone)]
pub struct JsonGraphLoader {
    path: PathBuf,
    tags: Vec<String>,
}

impl JsonGraphLoader {
    /// Create a loader for the graph file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into(), tags: Vec::new() } }

    /// Build tags the graph is expected to have been loaded with.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Path of the graph file.
    pub fn path(&self) -> &Path { &self.path }
}

impl ProgramLoader for JsonGraphLoader {
    fn load(&self) -> Result<Program> {
        logging::info("loader", &format!("loading {}", self.path.display()));
        let program = Program::from_file(&self.path)?;

        let wanted: BTreeSet<&str> = self.tags.iter().map(String::as_str).collect();
        let loaded: BTreeSet<&str> = program.tags.iter().map(String::as_str).collect();
        if !wanted.is_empty() && wanted != loaded {
            logging::warn(
                "loader",
                &format!(
                    "graph was loaded with tags [{}], expected [{}]",
                    loaded.into_iter().collect::<Vec<_>>().join(","),
                    wanted.into_iter().collect::<Vec<_>>().join(",")
                ),
            );
        }

        Ok(program)
    }
}
