//! Changelog command

use clap::Args;
use tracing::info;

use herald_changelog::{ChangelogContext, ChangelogGenerator, GenerateOptions};
use herald_core::config::discover_config;

use super::{build_clock, LogArgs};
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Generate changelog
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    #[command(flatten)]
    pub log: LogArgs,

    /// Version to generate changelog for
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Template file (defaults to configured template, then the built-in one)
    #[arg(short, long)]
    pub template: Option<std::path::PathBuf>,

    /// Write to file (default: print to stdout)
    #[arg(short, long)]
    pub write: bool,

    /// Output file (defaults to configured changelog file)
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(version = ?self.for_version, write = self.write, "executing changelog command");
        let cwd = std::env::current_dir()?;
        let config = discover_config(&cwd)?.config;

        let generator = ChangelogGenerator::new(config.changelog.clone());
        let log = self.log.read(&cwd, &config, &generator)?;

        if log.is_empty() && !cli.quiet {
            output::warning("No commits found in range.");
        }

        let clock = build_clock()?;

        if cli.format == OutputFormat::Json && !self.write {
            let classified = generator.classify(&log);
            let mut context =
                ChangelogContext::with_clock(&classified, generator.config(), clock.as_ref());
            if let Some(version) = &self.for_version {
                context = context.with_version(version);
            }
            println!("{}", serde_json::to_string_pretty(&context)?);
            return Ok(());
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(&config.changelog.file));
        let options = GenerateOptions {
            output: output_path.clone(),
            template: self.template.clone(),
            version: self.for_version.clone(),
            save: self.write,
            clock: clock.as_ref(),
        };
        let changelog = generator.generate(&log, &options)?;

        if !self.write {
            print!("{}", changelog);
            return Ok(());
        }

        match cli.format {
            OutputFormat::Json => {
                let result = serde_json::json!({
                    "path": output_path,
                    "commits": log.len(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!(
                        "Changelog written to {}",
                        output::path_style().apply_to(output_path.display())
                    ));
                }
                if cli.verbose {
                    output::info(&output::key_value("commits", &log.len().to_string()));
                }
            }
        }

        Ok(())
    }
}
