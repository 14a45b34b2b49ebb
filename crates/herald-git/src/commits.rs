//! Commit history rendered as log text

use chrono::{TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use herald_core::error::GitError;

use crate::format::{format_record, LogRecord};
use crate::repository::{GitRepo, Result};
use crate::source::{LogRange, LogSource};

impl GitRepo {
    /// Collect the commits in `range`, newest first
    #[instrument(skip(self, range), fields(range = %range))]
    pub fn records(&self, range: &LogRange) -> Result<Vec<LogRecord>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.resolve(&range.to)?)?;
        if let Some(from) = &range.from {
            revwalk.hide(self.resolve(from)?)?;
        }

        let mut records = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            records.push(commit_to_record(&commit)?);
        }

        debug!(count = records.len(), "collected commits");
        Ok(records)
    }
}

impl LogSource for GitRepo {
    fn read_log(&self, range: &LogRange) -> Result<String> {
        Ok(self.records(range)?.iter().map(format_record).collect())
    }
}

/// Convert a git2 Commit to a LogRecord dated by its author time
fn commit_to_record(commit: &git2::Commit<'_>) -> Result<LogRecord> {
    let author = commit.author();
    let seconds = author.when().seconds();

    let date = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| GitError::InvalidTimestamp {
            commit: commit.id().to_string(),
            seconds,
        })?;

    Ok(LogRecord::new(
        commit.id().to_string(),
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or("unknown@example.com"),
        date,
        commit.summary().unwrap_or("(no message)"),
    )
    .with_body(commit.body().unwrap_or_default().trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str) -> git2::Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn setup_repo() -> (TempDir, GitRepo, git2::Oid) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let first = commit(&repo, "chore: initial commit");
        commit(&repo, "feat(api): add endpoint\n\nLonger body.\n\nCloses #4");

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo, first)
    }

    #[test]
    fn test_records_newest_first() {
        let (_temp, repo, _) = setup_repo();
        let records = repo.records(&LogRange::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject, "feat(api): add endpoint");
        assert_eq!(records[0].body, "Longer body.\n\nCloses #4");
        assert_eq!(records[0].short_hash.len(), 7);
        assert_eq!(records[1].subject, "chore: initial commit");
    }

    #[test]
    fn test_records_respect_range() {
        let (_temp, repo, first) = setup_repo();
        let range = LogRange::between(first.to_string(), "HEAD");
        let records = repo.records(&range).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject, "feat(api): add endpoint");
    }

    #[test]
    fn test_record_date_is_author_time() {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let authored = git2::Time::new(1_700_000_000, 60);
        let committed = git2::Time::new(1_800_000_000, 0);
        let author = Signature::new("Ada", "ada@example.com", &authored).unwrap();
        let committer = Signature::new("Bot", "bot@example.com", &committed).unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &author, &committer, "fix: rebased", &tree, &[])
            .unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        let records = git_repo.records(&LogRange::default()).unwrap();

        assert_eq!(records[0].date, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(records[0].author_name, "Ada");
    }

    #[test]
    fn test_read_log_wire_format() {
        let (_temp, repo, _) = setup_repo();
        let text = repo.read_log(&LogRange::default()).unwrap();

        assert_eq!(text.matches(crate::RECORD_SEPARATOR).count(), 2);
        assert!(text.contains("Test\x1ftest@example.com"));
    }
}
