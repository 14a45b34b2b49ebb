//! Herald Git - log sources for the changelog engine
//!
//! This crate produces raw log text in the record format understood by the
//! changelog parser, either from a git repository or from a captured file.

mod commits;
pub mod format;
mod repository;
mod source;

pub use format::{format_record, LogRecord, FIELD_COUNT, FIELD_SEPARATOR, GIT_LOG_FORMAT, RECORD_SEPARATOR};
pub use repository::{GitRepo, Result};
pub use source::{FileLogSource, LogRange, LogSource};
