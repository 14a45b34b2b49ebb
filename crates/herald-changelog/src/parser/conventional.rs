//! Conventional Commits message grammar
//!
//! Parses commit messages following the Conventional Commits specification:
//! https://www.conventionalcommits.org/

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{Footer, UNTYPED};

/// Regex for parsing conventional commit headers
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?:\s+(?P<description>.+)$",
    )
    .expect("Invalid regex")
});

/// Regex for footer lines, `Token: value` or `Token #value`
static FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<token>(?i:BREAKING[ -]CHANGE)|[A-Za-z][A-Za-z0-9-]*)(?:: (?P<value>.*)| (?P<issue>#.*))$",
    )
    .expect("Invalid regex")
});

/// Regex for a breaking change note anywhere in a body
static BREAKING_NOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^BREAKING[ -]CHANGE: ").expect("Invalid regex"));

/// Regex for issue and pull request identifiers inside reference footers
static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[\w.-]+/[\w.-]+)?#\d+|\bGH-\d+\b").expect("Invalid regex")
});

/// Footer tokens whose values carry issue references
const REFERENCE_TOKENS: &[&str] = &[
    "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
    "ref", "refs", "references", "see",
];

/// The parts of a conventional header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Lowercased commit type, or [`UNTYPED`]
    pub commit_type: String,
    /// Scope between the parentheses, if any
    pub scope: Option<String>,
    /// Whether the `!` marker was present
    pub breaking: bool,
    /// Text after the colon
    pub description: String,
}

impl Header {
    /// Header used when the grammar does not match
    fn untyped(header: &str) -> Self {
        Self {
            commit_type: UNTYPED.to_string(),
            scope: None,
            breaking: false,
            description: header.to_string(),
        }
    }
}

/// Split a header into type, scope, breaking marker and description
///
/// Never fails: a header outside the grammar becomes an untyped header whose
/// description is the whole line.
pub fn parse_header(header: &str) -> Header {
    let header = header.trim();
    let Some(caps) = CONVENTIONAL_REGEX.captures(header) else {
        return Header::untyped(header);
    };

    let scope = caps
        .name("scope")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Header {
        commit_type: caps["type"].to_lowercase(),
        scope,
        breaking: caps.name("breaking").is_some(),
        description: caps["description"].trim().to_string(),
    }
}

/// Split a body into free text and its trailing footer block
///
/// The footer block lives in the last paragraph. It is the whole paragraph
/// when its first line is a footer; otherwise it is the trailing run of
/// footer lines and indented continuation lines. Lines inside the block that
/// are not footers continue the value of the footer above them.
pub fn parse_body(body: &str) -> (String, Vec<Footer>) {
    let body = body.trim_matches('\n').trim_end();
    let paragraphs = split_paragraphs(body);

    let Some((last, rest)) = paragraphs.split_last() else {
        return (String::new(), Vec::new());
    };

    let Some(start) = footer_start(last) else {
        return (body.to_string(), Vec::new());
    };
    let (prose, block) = last.split_at(start);

    let mut footers: Vec<Footer> = Vec::new();
    for line in block {
        if let Some(caps) = FOOTER_REGEX.captures(line) {
            let value = caps
                .name("value")
                .or_else(|| caps.name("issue"))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            footers.push(Footer::new(&caps["token"], value));
        } else if let Some(previous) = footers.last_mut() {
            previous.value.push('\n');
            previous.value.push_str(line.trim());
        }
    }

    let text = rest
        .iter()
        .map(|p| p.join("\n"))
        .chain((!prose.is_empty()).then(|| prose.join("\n")))
        .collect::<Vec<_>>()
        .join("\n\n");

    (text, footers)
}

/// Whether any body line opens with a `BREAKING CHANGE:` note
///
/// Catches notes that are not part of the footer block, such as a breaking
/// change paragraph followed by further explanation.
pub fn has_breaking_note(body: &str) -> bool {
    BREAKING_NOTE_REGEX.is_match(body)
}

/// Index where the footer block of a paragraph starts
fn footer_start(lines: &[&str]) -> Option<usize> {
    if lines.first().is_some_and(|line| FOOTER_REGEX.is_match(line)) {
        return Some(0);
    }

    let mut start = None;
    for (index, line) in lines.iter().enumerate().rev() {
        if FOOTER_REGEX.is_match(line) {
            start = Some(index);
        } else if !line.starts_with(char::is_whitespace) {
            break;
        }
    }
    start
}

/// Collect issue references from reference footers, deduplicated, in order
pub fn extract_references(footers: &[Footer]) -> Vec<String> {
    let mut references: Vec<String> = Vec::new();

    for footer in footers {
        let is_reference = REFERENCE_TOKENS
            .iter()
            .any(|token| footer.token.eq_ignore_ascii_case(token));
        if !is_reference {
            continue;
        }

        for m in REFERENCE_REGEX.find_iter(&footer.value) {
            if !references.iter().any(|r| r == m.as_str()) {
                references.push(m.as_str().to_string());
            }
        }
    }

    references
}

fn split_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}
