//! Log sources

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use herald_core::error::GitError;

use crate::repository::Result;

/// A revision range: commits reachable from `to` but not from `from`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRange {
    /// Exclusive lower bound; `None` means the whole history
    pub from: Option<String>,
    /// Inclusive upper bound
    pub to: String,
}

impl LogRange {
    /// Range over the whole history up to `to`
    pub fn up_to(to: impl Into<String>) -> Self {
        Self {
            from: None,
            to: to.into(),
        }
    }

    /// Range between two revisions
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: to.into(),
        }
    }
}

impl Default for LogRange {
    fn default() -> Self {
        Self::up_to("HEAD")
    }
}

impl std::fmt::Display for LogRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.from {
            Some(from) => write!(f, "{}..{}", from, self.to),
            None => f.write_str(&self.to),
        }
    }
}

/// Anything that can hand out raw log text in the wire format
pub trait LogSource {
    /// Read the log for `range`, newest commit first
    fn read_log(&self, range: &LogRange) -> Result<String>;
}

/// Log text captured ahead of time, e.g. by `git log` in a CI step
///
/// The range is not applied: the file is expected to already cover it.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path the log is read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSource for FileLogSource {
    #[instrument(skip(self, range), fields(path = %self.path.display(), range = %range))]
    fn read_log(&self, range: &LogRange) -> Result<String> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| GitError::LogUnreadable {
            path: self.path.clone(),
            source,
        })?;
        debug!(bytes = text.len(), "read captured log");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_range_display() {
        assert_eq!(LogRange::default().to_string(), "HEAD");
        assert_eq!(LogRange::between("v1.0.0", "main").to_string(), "v1.0.0..main");
    }

    #[test]
    fn test_file_source_reads_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("log.txt");
        std::fs::write(&path, "abc\x1e\n").unwrap();

        let source = FileLogSource::new(&path);
        assert_eq!(source.read_log(&LogRange::default()).unwrap(), "abc\x1e\n");
    }

    #[test]
    fn test_file_source_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = FileLogSource::new(temp.path().join("missing.txt"));

        let err = source.read_log(&LogRange::default()).unwrap_err();
        assert!(matches!(err, GitError::LogUnreadable { .. }));
    }
}
