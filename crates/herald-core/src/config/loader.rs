//! Configuration loading
//!
//! A project is configured by the first herald config file found walking up
//! from the working directory. Each level is checked directly and under
//! `.github/`. No file means defaults; a file that fails to load is an error.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::CONFIG_FILE_NAMES;
use super::types::Config;
use super::validation::validate_config;

/// Syntax of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Format for `path`, if its extension is one herald reads
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> Result<Config> {
        let config = match self {
            Self::Toml => toml::from_str(content).map_err(ConfigError::TomlError)?,
            Self::Yaml => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
        };
        Ok(config)
    }
}

/// Configuration together with the file it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Validated configuration
    pub config: Config,
    /// `None` when no config file exists and defaults are in use
    pub path: Option<PathBuf>,
}

/// Parse and validate one config file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    info!(path = %path.display(), ?format, "loading config");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = format.parse(&content)?;

    validate_config(&config)?;
    Ok(config)
}

/// Locate and load the configuration governing `dir`
pub fn discover_config(dir: &Path) -> Result<LoadedConfig> {
    let Some(path) = locate(dir) else {
        warn!(dir = %dir.display(), "no herald config found, using defaults");
        return Ok(LoadedConfig::default());
    };

    let config = load_config(&path)?;
    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}

fn locate(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .flat_map(|level| {
            CONFIG_FILE_NAMES
                .iter()
                .flat_map(move |name| [level.join(name), level.join(".github").join(name)])
        })
        .find(|candidate| candidate.is_file())
        .inspect(|path| debug!(path = %path.display(), "config file located"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        let format = |p: &str| ConfigFormat::from_path(Path::new(p));
        assert_eq!(format("herald.toml"), Some(ConfigFormat::Toml));
        assert_eq!(format("a/.herald.yml"), Some(ConfigFormat::Yaml));
        assert_eq!(format("herald.json"), None);
        assert_eq!(format("herald"), None);
    }

    #[test]
    fn test_discover_in_dir() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("herald.toml");
        std::fs::write(&config_path, "[git]\nto = \"main\"").unwrap();

        let loaded = discover_config(temp.path()).unwrap();
        assert_eq!(loaded.path, Some(config_path));
        assert_eq!(loaded.config.git.to, "main");
    }

    #[test]
    fn test_discover_in_github_dir() {
        let temp = TempDir::new().unwrap();
        let github_dir = temp.path().join(".github");
        std::fs::create_dir_all(&github_dir).unwrap();
        let config_path = github_dir.join("herald.yaml");
        std::fs::write(&config_path, "git:\n  to: main\n").unwrap();

        assert_eq!(locate(temp.path()), Some(config_path));
    }

    #[test]
    fn test_discover_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".herald.toml");
        std::fs::write(&config_path, "").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(locate(&nested), Some(config_path));
    }

    #[test]
    fn test_nearest_level_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("herald.toml"), "").unwrap();
        let nested = temp.path().join("pkg");
        std::fs::create_dir_all(nested.join(".github")).unwrap();
        let inner = nested.join(".github").join("herald.yaml");
        std::fs::write(&inner, "").unwrap();

        assert_eq!(locate(&nested), Some(inner));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("herald.toml");
        std::fs::write(
            &config_path,
            "[git]\nfrom = \"v1.0.0\"\n\n[changelog]\nsort_by = [\"date\"]\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.git.from.as_deref(), Some("v1.0.0"));
        assert_eq!(config.changelog.sort_by, vec!["date"]);
        assert!(config.changelog.is_visible("feat"));
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("herald.yaml");
        std::fs::write(
            &config_path,
            "changelog:\n  file: docs/CHANGES.md\n  types:\n    feat:\n      section: New\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.changelog.file, PathBuf::from("docs/CHANGES.md"));
        assert_eq!(config.changelog.section_title("feat"), "New");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_config(Path::new("herald.json")).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let loaded = discover_config(temp.path()).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.config.changelog.file, PathBuf::from("CHANGELOG.md"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("herald.toml"), "[changelog]\nfile = \"\"\n").unwrap();

        let err = discover_config(temp.path()).unwrap_err();
        assert!(err.to_string().contains("changelog.file"));
    }
}
