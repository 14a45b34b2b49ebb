//! Changelog types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Commit type given to commits whose subject is not a conventional header
pub const UNTYPED: &str = "none";

/// A commit parsed from the log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Abbreviated hash
    pub short_hash: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author date
    pub date: DateTime<Utc>,
    /// Full first line of the message
    pub header: String,
    /// Description after the `type(scope)!:` prefix, or the whole header
    pub subject: String,
    /// Body text without the footer block
    pub body: String,
    /// Lowercased commit type (feat, fix, etc.), [`UNTYPED`] if absent
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Scope (optional, in parentheses)
    pub scope: Option<String>,
    /// Whether this is a breaking change
    pub breaking: bool,
    /// Footer fields in message order
    pub footers: Vec<Footer>,
    /// Issue and pull request references, in order of first appearance
    pub references: Vec<String>,
}

impl Commit {
    /// Whether the subject followed the conventional commit grammar
    pub fn is_conventional(&self) -> bool {
        self.commit_type != UNTYPED
    }

    /// First footer value for `token`, ignoring case
    pub fn footer(&self, token: &str) -> Option<&str> {
        self.footers
            .iter()
            .find(|f| f.is(token))
            .map(|f| f.value.as_str())
    }

    /// All footer values for `token`, ignoring case, in message order
    pub fn footers_named<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.footers
            .iter()
            .filter(move |f| f.is(token))
            .map(|f| f.value.as_str())
    }
}

/// A footer field from a commit body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    /// Footer token as written (e.g., "BREAKING CHANGE", "Closes", "Refs")
    pub token: String,
    /// Footer value
    pub value: String,
}

impl Footer {
    /// Create a footer
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive token match
    pub fn is(&self, token: &str) -> bool {
        self.token.eq_ignore_ascii_case(token)
    }

    /// Whether this footer announces a breaking change
    pub fn is_breaking(&self) -> bool {
        self.is("BREAKING CHANGE") || self.is("BREAKING-CHANGE")
    }
}

/// An ordered, parsed log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GitLog {
    /// Exclusive lower bound of the range the log covers
    pub from_ref: Option<String>,
    /// Inclusive upper bound of the range the log covers
    pub to_ref: Option<String>,
    /// Commits in the order the log source produced them
    pub commits: Vec<Commit>,
}

impl GitLog {
    /// Create a log without range metadata
    pub fn new(commits: Vec<Commit>) -> Self {
        Self {
            from_ref: None,
            to_ref: None,
            commits,
        }
    }

    /// Attach range metadata
    pub fn with_range(mut self, from_ref: Option<String>, to_ref: impl Into<String>) -> Self {
        self.from_ref = from_ref;
        self.to_ref = Some(to_ref.into());
        self
    }

    /// Number of commits
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Check if the log has no commits
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Look up a commit by full hash
    pub fn get(&self, hash: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.hash == hash)
    }
}
