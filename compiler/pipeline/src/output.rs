//! Generated file handling.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::{PipelineError, Result};

/// Write `contents` to `path`, replacing any previous file.
///
/// Callers render first; the file is only created here. The handle is closed
/// when this returns, on success and on every error.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    let output = |source| PipelineError::Output { path: path.to_path_buf(), source };

    let mut file = File::create(path).map_err(output)?;
    file.write_all(contents.as_bytes()).map_err(output)?;
    file.flush().map_err(output)?;
    Ok(())
}

/// Remove a previously generated file. Returns whether one existed.
pub fn remove_stale(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            logging::info("output", &format!("removed stale {}", path.display()));
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(PipelineError::Output { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_remove() {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("evon_gen.go");

        write_file(&path, "package app\n").expect("write succeeds");
        assert_eq!(fs::read_to_string(&path).expect("readable"), "package app\n");

        assert!(remove_stale(&path).expect("remove succeeds"));
        assert!(!path.exists());
        assert!(!remove_stale(&path).expect("missing file is fine"));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("missing").join("evon_gen.go");

        match write_file(&path, "x") {
            Err(PipelineError::Output { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an output error, got {:?}", other),
        }
    }
}
