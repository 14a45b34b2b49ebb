//! CLI commands

mod changelog;
mod init;
mod version;

pub use changelog::ChangelogCommand;
pub use init::InitCommand;
pub use version::VersionCommand;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::debug;

use herald_changelog::{ChangelogGenerator, Clock, FixedClock, GitLog, SystemClock};
use herald_core::config::Config;
use herald_git::{FileLogSource, GitRepo, LogRange, LogSource};

/// Where the commit log comes from
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Start of the range, exclusive (defaults to `git.from`)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the range, inclusive (defaults to `git.to`)
    #[arg(long)]
    pub to: Option<String>,

    /// Read a captured log in herald record format instead of the repository
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl LogArgs {
    /// Commit range, command line first, then configuration
    pub fn range(&self, config: &Config) -> LogRange {
        LogRange {
            from: self.from.clone().or_else(|| config.git.from.clone()),
            to: self.to.clone().unwrap_or_else(|| config.git.to.clone()),
        }
    }

    /// Read and parse the log
    pub fn read(
        &self,
        cwd: &Path,
        config: &Config,
        generator: &ChangelogGenerator,
    ) -> anyhow::Result<GitLog> {
        let range = self.range(config);
        let source: Box<dyn LogSource> = match &self.log_file {
            Some(path) => Box::new(FileLogSource::new(cwd.join(path))),
            None => Box::new(GitRepo::discover(cwd)?),
        };

        let log = generator
            .read(source.as_ref(), &range)
            .with_context(|| format!("failed to read commit log for {}", range))?;
        debug!(commits = log.len(), "commit log ready");
        Ok(log)
    }
}

/// Build clock, pinned by `SOURCE_DATE_EPOCH` when it is set
pub fn build_clock() -> anyhow::Result<Box<dyn Clock>> {
    match std::env::var("SOURCE_DATE_EPOCH") {
        Ok(value) => {
            let seconds: i64 = value
                .trim()
                .parse()
                .with_context(|| format!("invalid SOURCE_DATE_EPOCH '{}'", value))?;
            let clock = FixedClock::from_epoch(seconds)
                .with_context(|| format!("SOURCE_DATE_EPOCH out of range: {}", seconds))?;
            Ok(Box::new(clock))
        }
        Err(_) => Ok(Box::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_prefers_command_line() {
        let mut config = Config::default();
        config.git.from = Some("v1.0.0".to_string());

        let args = LogArgs {
            from: None,
            to: Some("main".to_string()),
            log_file: None,
        };
        let range = args.range(&config);
        assert_eq!(range.from.as_deref(), Some("v1.0.0"));
        assert_eq!(range.to, "main");

        let args = LogArgs {
            from: Some("v2.0.0".to_string()),
            to: None,
            log_file: None,
        };
        let range = args.range(&config);
        assert_eq!(range.from.as_deref(), Some("v2.0.0"));
        assert_eq!(range.to, "HEAD");
    }
}
