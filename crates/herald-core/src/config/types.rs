//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration for Herald
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    pub name: Option<String>,

    /// Log range configuration
    pub git: GitConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Log range configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Exclusive lower bound of the range (tag, branch or hash)
    pub from: Option<String>,

    /// Inclusive upper bound of the range
    pub to: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            from: None,
            to: "HEAD".to_string(),
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path
    pub file: PathBuf,

    /// Handlebars template file; the built-in Markdown template is used when unset
    pub template: Option<PathBuf>,

    /// Columns commits are ordered by within the rendered log
    pub sort_by: Vec<String>,

    /// Buckets rendered first, in this order (after breaking changes)
    pub section_order: Vec<String>,

    /// Title of the breaking changes section
    pub breaking_section: String,

    /// Commit types and how they are rendered
    #[serde(default)]
    pub types: HashMap<String, CommitTypeConfig>,

    /// Whether merge commits are kept
    pub include_merges: bool,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        let types = [
            ("feat", "Features", false),
            ("fix", "Bug Fixes", false),
            ("perf", "Performance", false),
            ("docs", "Documentation", false),
            ("refactor", "Refactoring", true),
            ("test", "Tests", true),
            ("build", "Build System", true),
            ("ci", "Continuous Integration", true),
            ("chore", "Chores", true),
        ]
        .into_iter()
        .map(|(name, section, hidden)| {
            (
                name.to_string(),
                CommitTypeConfig {
                    section: section.to_string(),
                    hidden,
                },
            )
        })
        .collect();

        Self {
            file: PathBuf::from("CHANGELOG.md"),
            template: None,
            sort_by: vec!["scope".to_string(), "subject".to_string()],
            section_order: vec![
                "feat".to_string(),
                "fix".to_string(),
                "perf".to_string(),
                "docs".to_string(),
            ],
            breaking_section: "⚠ BREAKING CHANGES".to_string(),
            types,
            include_merges: true,
        }
    }
}

impl ChangelogConfig {
    /// Section title for a bucket; unknown buckets use the bucket name
    pub fn section_title(&self, bucket: &str) -> String {
        self.types
            .get(bucket)
            .map(|t| t.section.clone())
            .unwrap_or_else(|| bucket.to_string())
    }

    /// Whether a bucket is rendered as its own section
    ///
    /// Types without an entry are hidden, so stray prefixes and untyped
    /// commits stay out of the default output.
    pub fn is_visible(&self, bucket: &str) -> bool {
        self.types.get(bucket).is_some_and(|t| !t.hidden)
    }
}

/// Configuration for a commit type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitTypeConfig {
    /// Section title in changelog
    pub section: String,

    /// Whether to hide from changelog
    #[serde(default)]
    pub hidden: bool,
}
