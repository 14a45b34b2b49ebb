//! Template context
//!
//! The data a changelog template is rendered against: the ordered, classified
//! commits, those commits grouped into sections, and release metadata.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use herald_core::config::ChangelogConfig;

use crate::classifier::{ClassifiedCommit, ClassifiedLog, VersionImpact, BREAKING_BUCKET};
use crate::types::GitLog;

/// Source of the build timestamp
pub trait Clock {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, for reproducible output
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock fixed at a Unix timestamp, as found in `SOURCE_DATE_EPOCH`
    pub fn from_epoch(seconds: i64) -> Option<Self> {
        Utc.timestamp_opt(seconds, 0).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A group of commits sharing a bucket
#[derive(Debug, Clone, Serialize)]
pub struct Section<'a> {
    /// Bucket the commits were classified into
    pub bucket: String,
    /// Display title
    pub title: String,
    /// Commits in rendering order
    pub commits: Vec<ClassifiedCommit<'a>>,
}

/// Everything a template can reference
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogContext<'a> {
    /// Version being released, if known
    pub version: Option<String>,
    /// Release date (`YYYY-MM-DD`)
    pub date: String,
    /// Build timestamp
    pub generated_at: DateTime<Utc>,
    /// Range start of the log
    pub from_ref: Option<String>,
    /// Range end of the log
    pub to_ref: Option<String>,
    /// Highest version impact in the log
    pub impact: VersionImpact,
    /// All commits in rendering order, hidden types included
    pub commits: Vec<ClassifiedCommit<'a>>,
    /// Breaking commits in rendering order
    pub breaking: Vec<ClassifiedCommit<'a>>,
    /// Visible sections, breaking changes first
    pub sections: Vec<Section<'a>>,
    #[serde(skip)]
    log: &'a GitLog,
}

impl<'a> ChangelogContext<'a> {
    /// Build the context from an ordered, classified log
    pub fn new(classified: &ClassifiedLog<'a>, config: &ChangelogConfig) -> Self {
        Self::with_clock(classified, config, &SystemClock)
    }

    /// Build the context, taking the build time from `clock`
    pub fn with_clock(
        classified: &ClassifiedLog<'a>,
        config: &ChangelogConfig,
        clock: &dyn Clock,
    ) -> Self {
        let log = classified.log();
        let generated_at = clock.now();
        let sections = build_sections(classified, config);

        debug!(
            commits = classified.commits().len(),
            sections = sections.len(),
            "changelog context built"
        );

        Self {
            version: None,
            date: generated_at.format("%Y-%m-%d").to_string(),
            generated_at,
            from_ref: log.from_ref.clone(),
            to_ref: log.to_ref.clone(),
            impact: classified.impact(),
            commits: classified.commits().to_vec(),
            breaking: classified.bucket(BREAKING_BUCKET).cloned().collect(),
            sections,
            log,
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The log this context was built from
    pub fn log(&self) -> &'a GitLog {
        self.log
    }
}

/// Group commits into sections, keeping their order inside each section
///
/// Breaking changes come first, then the configured section order, then any
/// other visible bucket alphabetically. Hidden and unknown types get no
/// section of their own.
fn build_sections<'a>(classified: &ClassifiedLog<'a>, config: &ChangelogConfig) -> Vec<Section<'a>> {
    let mut buckets: Vec<&str> = Vec::new();
    for commit in classified.commits() {
        let bucket = commit.classification.bucket.as_str();
        if !buckets.contains(&bucket) {
            buckets.push(bucket);
        }
    }

    let rank = |bucket: &str| -> (usize, String) {
        if bucket == BREAKING_BUCKET {
            return (0, String::new());
        }
        match config.section_order.iter().position(|b| b == bucket) {
            Some(pos) => (1 + pos, String::new()),
            None => (usize::MAX, bucket.to_string()),
        }
    };

    buckets.retain(|b| *b == BREAKING_BUCKET || config.is_visible(b));
    buckets.sort_by_key(|b| rank(b));

    buckets
        .into_iter()
        .map(|bucket| Section {
            bucket: bucket.to_string(),
            title: if bucket == BREAKING_BUCKET {
                config.breaking_section.clone()
            } else {
                config.section_title(bucket)
            },
            commits: classified.bucket(bucket).cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CommitClassifier;
    use crate::types::fixtures::commit;
    use herald_core::config::CommitTypeConfig;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 30, 23, 0, 0).unwrap())
    }

    fn sample_log() -> GitLog {
        let mut breaking = commit("d", "chore", "update deps");
        breaking.breaking = true;
        GitLog::new(vec![
            commit("a", "fix", "null pointer"),
            commit("b", "feat", "add login"),
            commit("c", "chore", "tidy"),
            breaking,
            commit("e", "docs", "readme"),
            commit("f", "zzz", "custom"),
        ])
        .with_range(Some("v1.0.0".to_string()), "HEAD")
    }

    #[test]
    fn test_sections_order_and_visibility() {
        let log = sample_log();
        let classified = CommitClassifier::new().classify_log(&log);
        let context = ChangelogContext::with_clock(&classified, &ChangelogConfig::default(), &clock());

        let buckets: Vec<&str> = context.sections.iter().map(|s| s.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["breaking", "feat", "fix", "docs"]);
        assert_eq!(context.sections[0].title, "⚠ BREAKING CHANGES");
        assert_eq!(context.sections[1].title, "Features");
        assert_eq!(context.sections[0].commits[0].commit.hash, "d");
    }

    #[test]
    fn test_unlisted_visible_buckets_sort_alphabetically() {
        let log = sample_log();
        let classified = CommitClassifier::new().classify_log(&log);
        let mut config = ChangelogConfig::default();
        config.section_order.clear();
        config.types.insert(
            "zzz".to_string(),
            CommitTypeConfig {
                section: "Custom".to_string(),
                hidden: false,
            },
        );

        let context = ChangelogContext::with_clock(&classified, &config, &clock());
        let buckets: Vec<&str> = context.sections.iter().map(|s| s.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["breaking", "docs", "feat", "fix", "zzz"]);
    }

    #[test]
    fn test_metadata() {
        let log = sample_log();
        let classified = CommitClassifier::new().classify_log(&log);
        let context = ChangelogContext::with_clock(&classified, &ChangelogConfig::default(), &clock())
            .with_version("2.0.0");

        assert_eq!(context.date, "2024-06-30");
        assert_eq!(context.version.as_deref(), Some("2.0.0"));
        assert_eq!(context.from_ref.as_deref(), Some("v1.0.0"));
        assert_eq!(context.impact, VersionImpact::Major);
        assert_eq!(context.commits.len(), 6);
        assert_eq!(context.breaking.len(), 1);
        assert_eq!(context.log().len(), 6);
    }

    #[test]
    fn test_fixed_clock_from_epoch() {
        let clock = FixedClock::from_epoch(0).unwrap();
        assert_eq!(clock.now().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }
}
