//! Herald Core - shared foundation for the herald changelog engine
//!
//! This crate provides the error taxonomy and the configuration system used
//! by the log source, changelog and CLI crates.

pub mod config;
pub mod error;

pub use config::{ChangelogConfig, CommitTypeConfig, Config, GitConfig};
pub use error::{ChangelogError, ConfigError, GitError, HeraldError, Result};
