//! Commit parsing
//!
//! Turns raw log text in the `herald_git::format` wire format into a
//! [`GitLog`]. Only structural damage fails the parse; a subject that is not a
//! conventional header still yields a commit, typed [`crate::types::UNTYPED`].

mod conventional;
mod types;

pub use conventional::{
    extract_references, has_breaking_note, parse_body, parse_header, Header,
};
pub use types::*;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use herald_core::error::ChangelogError;
use herald_git::{FIELD_COUNT, FIELD_SEPARATOR, RECORD_SEPARATOR};
use tracing::{debug, instrument};

use crate::types::{Commit, GitLog};

/// Parser from log text to [`GitLog`]
#[derive(Debug, Clone, Default)]
pub struct CommitParser {
    config: ParserConfig,
}

impl CommitParser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a whole log, preserving record order
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn parse(&self, text: &str) -> Result<GitLog, ChangelogError> {
        let mut chunks: Vec<&str> = text.split(RECORD_SEPARATOR).collect();

        // Everything after the final separator must be padding
        let tail = chunks.pop().unwrap_or_default();
        if !tail.trim().is_empty() {
            return Err(ChangelogError::parse(
                chunks.len(),
                "record is not terminated by a record separator",
            ));
        }

        let mut seen = HashSet::new();
        let mut commits = Vec::with_capacity(chunks.len());
        let mut skipped = 0usize;

        for (index, chunk) in chunks.into_iter().enumerate() {
            let commit = self.parse_record(index, chunk)?;

            if !seen.insert(commit.hash.clone()) {
                return Err(ChangelogError::parse(
                    index,
                    format!("duplicate commit hash {}", commit.hash),
                ));
            }

            if !self.config.include_merges && commit.header.starts_with("Merge ") {
                skipped += 1;
                continue;
            }

            commits.push(commit);
        }

        debug!(commits = commits.len(), skipped, "log parsed");
        Ok(GitLog::new(commits))
    }

    /// Parse one record's fields into a commit
    fn parse_record(&self, index: usize, chunk: &str) -> Result<Commit, ChangelogError> {
        let fields: Vec<&str> = chunk.trim_start().split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ChangelogError::parse(
                index,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }

        let hash = fields[0].trim();
        if hash.is_empty() {
            return Err(ChangelogError::parse(index, "empty commit hash"));
        }

        let date = DateTime::parse_from_rfc3339(fields[4].trim())
            .map_err(|e| {
                ChangelogError::parse(index, format!("invalid date '{}': {}", fields[4], e))
            })?
            .with_timezone(&Utc);

        let short_hash = match fields[1].trim() {
            "" => hash.chars().take(7).collect(),
            short => short.to_string(),
        };

        let header_line = fields[5].trim();
        let header = parse_header(header_line);
        let (body, footers) = parse_body(fields[6]);
        let references = extract_references(&footers);
        let breaking = header.breaking
            || footers.iter().any(|f| f.is_breaking())
            || has_breaking_note(fields[6]);

        Ok(Commit {
            hash: hash.to_string(),
            short_hash,
            author_name: fields[2].trim().to_string(),
            author_email: fields[3].trim().to_string(),
            date,
            header: header_line.to_string(),
            subject: header.description,
            body,
            commit_type: header.commit_type,
            scope: header.scope,
            breaking,
            footers,
            references,
        })
    }
}
