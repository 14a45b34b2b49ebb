//! Log wire format
//!
//! A log is a sequence of records, each terminated by [`RECORD_SEPARATOR`].
//! A record holds exactly [`FIELD_COUNT`] fields separated by
//! [`FIELD_SEPARATOR`], in this order:
//!
//! ```text
//! hash US short_hash US author_name US author_email US date US subject US body RS
//! ```
//!
//! `date` is RFC 3339. Whitespace between records is ignored. The same text is
//! produced by `git log --format=` [`GIT_LOG_FORMAT`], so CI jobs can capture a
//! log once and feed it back through [`crate::FileLogSource`].

use chrono::{DateTime, Utc};

/// ASCII unit separator, between fields of one record
pub const FIELD_SEPARATOR: char = '\x1f';

/// ASCII record separator, after every record
pub const RECORD_SEPARATOR: char = '\x1e';

/// Number of fields in a record
pub const FIELD_COUNT: usize = 7;

/// `git log --format` string producing the wire format
pub const GIT_LOG_FORMAT: &str = "%H%x1f%h%x1f%an%x1f%ae%x1f%aI%x1f%s%x1f%b%x1e";

/// One commit as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
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
    /// First line of the message
    pub subject: String,
    /// Remaining message lines
    pub body: String,
}

impl LogRecord {
    /// Create a record; the short hash is the first 7 characters of `hash`
    pub fn new(
        hash: impl Into<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        date: DateTime<Utc>,
        subject: impl Into<String>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            author_name: author_name.into(),
            author_email: author_email.into(),
            date,
            subject: subject.into(),
            body: String::new(),
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Render one record, including its trailing separator and a newline
///
/// Separator characters inside field values are replaced by spaces so a
/// record can never be split in the wrong place.
pub fn format_record(record: &LogRecord) -> String {
    let date = record.date.to_rfc3339();
    let fields = [
        record.hash.as_str(),
        record.short_hash.as_str(),
        record.author_name.as_str(),
        record.author_email.as_str(),
        date.as_str(),
        record.subject.as_str(),
        record.body.as_str(),
    ];

    let mut out = fields
        .iter()
        .map(|f| sanitize(f))
        .collect::<Vec<_>>()
        .join(&FIELD_SEPARATOR.to_string());
    out.push(RECORD_SEPARATOR);
    out.push('\n');
    out
}

fn sanitize(value: &str) -> String {
    value.replace([FIELD_SEPARATOR, RECORD_SEPARATOR], " ")
}
