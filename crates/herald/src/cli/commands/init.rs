//! Init command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use herald_core::config::{
    load_config, ConfigFormat, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML,
};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Initialize a new Herald configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        write_config(&config_path, self.force)?;

        match cli.format {
            OutputFormat::Json => {
                let result = serde_json::json!({ "path": config_path });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    output::success(&format!(
                        "Created {}",
                        output::path_style().apply_to(config_path.display())
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Write the default configuration and check that it loads back
fn write_config(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if ConfigFormat::from_path(path) != Some(ConfigFormat::Toml) {
        anyhow::bail!(
            "The default configuration is TOML; use a .toml path instead of {}",
            path.display()
        );
    }

    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    load_config(path)?;
    Ok(())
}
