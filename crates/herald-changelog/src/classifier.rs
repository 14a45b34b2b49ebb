//! Commit classification
//!
//! Maps conventional commit types to a semantic version impact and a
//! rendering bucket. Results are kept next to the commits they describe;
//! the parsed commits themselves are never modified.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::types::{Commit, GitLog};

/// Bucket holding every breaking commit regardless of its type
pub const BREAKING_BUCKET: &str = "breaking";

/// Effect a commit has on the next semantic version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionImpact {
    /// No release needed
    #[default]
    None,
    /// Bug fix release
    Patch,
    /// Feature release
    Minor,
    /// Incompatible release
    Major,
}

impl VersionImpact {
    /// Lowercase name used in templates and projections
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }

    /// Apply this impact to `current`
    pub fn bump(&self, current: &semver::Version) -> semver::Version {
        let mut next = current.clone();

        match self {
            Self::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
            Self::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            Self::Patch => {
                // A pre-release is released by dropping its tag
                if current.pre.is_empty() {
                    next.patch += 1;
                }
            }
            Self::None => return next,
        }

        next.pre = semver::Prerelease::EMPTY;
        next.build = semver::BuildMetadata::EMPTY;
        next
    }
}

impl fmt::Display for VersionImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Version impact
    pub impact: VersionImpact,
    /// Grouping label: the commit type, or [`BREAKING_BUCKET`]
    pub bucket: String,
}

impl Classification {
    /// Whether the commit landed in the breaking bucket
    pub fn is_breaking(&self) -> bool {
        self.bucket == BREAKING_BUCKET
    }
}

/// Classifier implementing the conventional commit version rules
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitClassifier;

impl CommitClassifier {
    /// Create a classifier
    pub fn new() -> Self {
        Self
    }

    /// Classify a single commit
    pub fn classify(&self, commit: &Commit) -> Classification {
        let impact = if commit.breaking {
            VersionImpact::Major
        } else {
            match commit.commit_type.as_str() {
                "feat" => VersionImpact::Minor,
                "fix" | "perf" => VersionImpact::Patch,
                _ => VersionImpact::None,
            }
        };

        let bucket = if commit.breaking {
            BREAKING_BUCKET.to_string()
        } else {
            commit.commit_type.clone()
        };

        Classification { impact, bucket }
    }

    /// Classify every commit of a log, keeping log order
    pub fn classify_log<'a>(&self, log: &'a GitLog) -> ClassifiedLog<'a> {
        let commits: Vec<ClassifiedCommit<'a>> = log
            .commits
            .iter()
            .map(|commit| ClassifiedCommit {
                commit,
                classification: self.classify(commit),
            })
            .collect();

        let classified = ClassifiedLog { log, commits };
        debug!(
            commits = classified.commits.len(),
            impact = %classified.impact(),
            "log classified"
        );
        classified
    }
}

/// A commit together with its classification
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedCommit<'a> {
    /// The parsed commit
    #[serde(flatten)]
    pub commit: &'a Commit,
    /// Its classification
    #[serde(flatten)]
    pub classification: Classification,
}

/// A log whose commits carry classifications, in rendering order
#[derive(Debug, Clone)]
pub struct ClassifiedLog<'a> {
    log: &'a GitLog,
    commits: Vec<ClassifiedCommit<'a>>,
}

impl<'a> ClassifiedLog<'a> {
    /// The log the classifications were computed from
    pub fn log(&self) -> &'a GitLog {
        self.log
    }

    /// Classified commits in their current order
    pub fn commits(&self) -> &[ClassifiedCommit<'a>] {
        &self.commits
    }

    /// Mutable access for reordering; the commits themselves stay shared
    pub fn commits_mut(&mut self) -> &mut Vec<ClassifiedCommit<'a>> {
        &mut self.commits
    }

    /// Highest impact across the log
    pub fn impact(&self) -> VersionImpact {
        self.commits
            .iter()
            .map(|c| c.classification.impact)
            .max()
            .unwrap_or_default()
    }

    /// Commits in a bucket, in current order
    pub fn bucket<'s>(&'s self, bucket: &'s str) -> impl Iterator<Item = &'s ClassifiedCommit<'a>> + 's {
        self.commits
            .iter()
            .filter(move |c| c.classification.bucket == bucket)
    }
}
