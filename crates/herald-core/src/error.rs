//! Error types for Herald

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using HeraldError
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Main error type for Herald operations
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git / log source errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Changelog pipeline errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file extension is not one herald reads
    #[error("Unsupported config format: {0} (expected .toml, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while obtaining raw log text
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// A revision in the requested range could not be resolved
    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    /// A captured log file could not be read
    #[error("Failed to read log from {path}: {source}")]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A commit carries a timestamp chrono cannot represent
    #[error("Commit {commit} has an out-of-range timestamp: {seconds}")]
    InvalidTimestamp { commit: String, seconds: i64 },

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Changelog pipeline errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// A required argument was empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The log text could not be split into well-formed records
    #[error("Malformed log record {record}: {message}")]
    Parse { record: usize, message: String },

    /// The template source failed to compile
    #[error("Failed to compile template: {0}")]
    Template(String),

    /// The template could not be rendered against the bound context
    #[error("Failed to render changelog: {0}")]
    Render(String),

    /// Reading or writing a template or changelog file failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A writer operation was called out of order
    #[error("Cannot {operation} a changelog writer that is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

impl ChangelogError {
    /// Create an IO error bound to the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error for the record at `record` (zero based)
    pub fn parse(record: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            record,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = ChangelogError::InvalidState {
            operation: "save",
            state: "compiled",
        };
        assert_eq!(
            err.to_string(),
            "Cannot save a changelog writer that is compiled"
        );
    }

    #[test]
    fn test_changelog_error_converts() {
        let err: HeraldError = ChangelogError::parse(3, "expected 7 fields").into();
        assert!(matches!(
            err,
            HeraldError::Changelog(ChangelogError::Parse { record: 3, .. })
        ));
        assert!(err.to_string().contains("record 3"));
    }

    #[test]
    fn test_config_read_error_names_path() {
        let err: HeraldError = ConfigError::Read {
            path: PathBuf::from("herald.toml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(matches!(err, HeraldError::Config(ConfigError::Read { .. })));
        assert!(err.to_string().starts_with("Failed to read config herald.toml"));
    }
}
