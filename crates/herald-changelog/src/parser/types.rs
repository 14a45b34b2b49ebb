//! Parser configuration types

use herald_core::config::ChangelogConfig;

/// Configuration for the commit parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Whether to keep merge commits
    pub include_merges: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            include_merges: true,
        }
    }
}

impl ParserConfig {
    /// Derive parser settings from the changelog configuration
    pub fn from_changelog(config: &ChangelogConfig) -> Self {
        Self {
            include_merges: config.include_merges,
        }
    }

    /// Set whether to include merge commits
    pub fn with_merges(mut self, include: bool) -> Self {
        self.include_merges = include;
        self
    }
}
