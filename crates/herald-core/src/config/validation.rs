//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_git(config)?;
    validate_changelog(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.to.trim().is_empty() {
        return Err(invalid("git.to", "range end cannot be empty"));
    }

    if config.git.from.as_deref().is_some_and(|f| f.trim().is_empty()) {
        return Err(invalid("git.from", "range start cannot be empty when set"));
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    let changelog = &config.changelog;

    if changelog.file.as_os_str().is_empty() {
        return Err(invalid("changelog.file", "file cannot be empty"));
    }

    for (i, column) in changelog.sort_by.iter().enumerate() {
        if column.trim().is_empty() {
            return Err(invalid(
                &format!("changelog.sort_by[{}]", i),
                "sort column cannot be empty",
            ));
        }
    }

    for (name, type_config) in &changelog.types {
        if type_config.section.trim().is_empty() {
            return Err(invalid(
                &format!("changelog.types.{}.section", name),
                "section title cannot be empty",
            ));
        }
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> crate::error::HeraldError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommitTypeConfig;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_sort_column() {
        let mut config = Config::default();
        config.changelog.sort_by.push("  ".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("changelog.sort_by[2]"));
    }

    #[test]
    fn test_validate_empty_section_title() {
        let mut config = Config::default();
        config.changelog.types.insert(
            "wip".to_string(),
            CommitTypeConfig {
                section: String::new(),
                hidden: false,
            },
        );
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_range_end() {
        let mut config = Config::default();
        config.git.to = String::new();
        assert!(validate_config(&config).is_err());
    }
}
