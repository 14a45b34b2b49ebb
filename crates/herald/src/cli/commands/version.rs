//! Version command

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use herald_changelog::{ChangelogGenerator, VersionImpact};
use herald_core::config::discover_config;

use super::LogArgs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Calculate the next version
#[derive(Debug, Args)]
pub struct VersionCommand {
    #[command(flatten)]
    pub log: LogArgs,

    /// Current version
    #[arg(long, value_name = "VERSION", default_value = "0.0.0")]
    pub current: String,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(current = %self.current, "executing version command");
        let current = semver::Version::parse(self.current.trim_start_matches('v'))
            .with_context(|| format!("invalid current version '{}'", self.current))?;

        let cwd = std::env::current_dir()?;
        let config = discover_config(&cwd)?.config;

        let generator = ChangelogGenerator::new(config.changelog.clone());
        let log = self.log.read(&cwd, &config, &generator)?;
        let impact = generator.classify(&log).impact();
        let next = impact.bump(&current);

        self.output_result(&current, &next, impact, log.len(), cli)
    }

    fn output_result(
        &self,
        current: &semver::Version,
        next: &semver::Version,
        impact: VersionImpact,
        commit_count: usize,
        cli: &Cli,
    ) -> anyhow::Result<()> {
        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "current": current.to_string(),
                    "next": next.to_string(),
                    "impact": impact,
                    "commits": commit_count,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if cli.quiet || !cli.verbose => {
                println!("{}", next);
            }
            OutputFormat::Text => {
                println!("{}", output::version_style().apply_to(next));
                eprintln!("{}", output::key_value("current", &current.to_string()));
                eprintln!("{}", output::key_value("impact", impact.as_str()));
                eprintln!("{}", output::key_value("commits", &commit_count.to_string()));
                if impact == VersionImpact::None {
                    eprintln!("  {}", style("no releasable changes").dim());
                }
            }
        }
        Ok(())
    }
}
