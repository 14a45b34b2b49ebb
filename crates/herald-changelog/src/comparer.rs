//! Deterministic record ordering
//!
//! [`RecordComparer`] orders any record that can be flattened into a
//! case-insensitive string map. Records are compared on the configured sort
//! columns first; when those tie, every key present in either record is
//! compared in alphabetical order. Two records only compare equal when they
//! hold the same value under every key, so sorted or deduplicating
//! collections never merge records that merely share a grouping key.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::classifier::ClassifiedCommit;
use crate::types::Commit;

/// Case-insensitive, flattened key/value view of a record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordProjection {
    // keyed by the folded key; holds the key as first inserted and its value
    fields: HashMap<String, (String, String)>,
}

impl RecordProjection {
    /// Create an empty projection
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any value stored under a differently-cased key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.get_mut(&fold(&key)) {
            Some(entry) => entry.1 = value,
            None => {
                self.fields.insert(fold(&key), (key, value));
            }
        }
    }

    /// Append `value` to `key` on a new line, inserting it if absent
    fn append(&mut self, key: &str, value: &str) {
        match self.fields.get_mut(&fold(key)) {
            Some(entry) => {
                entry.1.push('\n');
                entry.1.push_str(value);
            }
            None => self.insert(key, value),
        }
    }

    /// Value for `key`, ignoring case
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&fold(key)).map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or the empty string
    pub fn resolve(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Keys as first inserted
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|(k, _)| k.as_str())
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the projection has no keys
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecordProjection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut projection = Self::new();
        for (key, value) in iter {
            projection.insert(key, value);
        }
        projection
    }
}

/// Keys a commit projects from its own fields; footers cannot override them
const COMMIT_FIELDS: &[&str] = &[
    "hash",
    "short_hash",
    "author_name",
    "author_email",
    "date",
    "header",
    "subject",
    "body",
    "type",
    "scope",
    "breaking",
    "references",
];

/// Records that can be flattened for comparison
pub trait Projectable {
    /// Build the flattened view of this record
    fn project(&self) -> RecordProjection;
}

impl Projectable for RecordProjection {
    fn project(&self) -> RecordProjection {
        self.clone()
    }
}

impl Projectable for Commit {
    /// First-class fields win over footers of the same name; repeated
    /// footers are joined with newlines in message order.
    fn project(&self) -> RecordProjection {
        let mut projection = RecordProjection::new();
        projection.insert("hash", &self.hash);
        projection.insert("short_hash", &self.short_hash);
        projection.insert("author_name", &self.author_name);
        projection.insert("author_email", &self.author_email);
        projection.insert("date", self.date.to_rfc3339());
        projection.insert("header", &self.header);
        projection.insert("subject", &self.subject);
        projection.insert("body", &self.body);
        projection.insert("type", &self.commit_type);
        projection.insert("scope", self.scope.as_deref().unwrap_or_default());
        projection.insert("breaking", self.breaking.to_string());
        projection.insert("references", self.references.join(" "));

        for footer in &self.footers {
            if !COMMIT_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(&footer.token)) {
                projection.append(&footer.token, &footer.value);
            }
        }

        projection
    }
}

impl Projectable for ClassifiedCommit<'_> {
    fn project(&self) -> RecordProjection {
        let mut projection = self.commit.project();
        projection.insert("bucket", &self.classification.bucket);
        projection.insert("impact", self.classification.impact.as_str());
        projection
    }
}

impl Projectable for BTreeMap<String, String> {
    fn project(&self) -> RecordProjection {
        self.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

impl Projectable for HashMap<String, String> {
    fn project(&self) -> RecordProjection {
        let mut entries: Vec<(&String, &String)> = self.iter().collect();
        // Keys that differ only by case collide; make the winner independent of hash order
        entries.sort();
        entries
            .into_iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Projectable for Vec<(String, String)> {
    fn project(&self) -> RecordProjection {
        self.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

impl<T: Projectable + ?Sized> Projectable for &T {
    fn project(&self) -> RecordProjection {
        (**self).project()
    }
}

/// Total-order comparator driven by an ordered list of sort columns
#[derive(Debug, Clone, Default)]
pub struct RecordComparer {
    columns: Vec<String>,
}

impl RecordComparer {
    /// Create a comparer over `columns`, most significant first
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// The sort columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Compare two projections
    pub fn compare_projections(&self, a: &RecordProjection, b: &RecordProjection) -> Ordering {
        for column in &self.columns {
            let ordering = cmp_ignore_case(a.resolve(column), b.resolve(column));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        // Sort columns tie: compare every key either record has, alphabetically
        let mut keys: Vec<&str> = a.keys().chain(b.keys()).collect();
        keys.sort_by(|x, y| cmp_ignore_case(x, y));
        keys.dedup_by(|x, y| cmp_ignore_case(x, y) == Ordering::Equal);

        keys.into_iter()
            .map(|key| cmp_ignore_case(a.resolve(key), b.resolve(key)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Compare two records
    pub fn compare<T: Projectable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        self.compare_projections(&a.project(), &b.project())
    }

    /// Sort records in place, projecting each record once
    pub fn sort<T: Projectable>(&self, records: &mut Vec<T>) {
        let mut keyed: Vec<(RecordProjection, T)> =
            records.drain(..).map(|r| (r.project(), r)).collect();
        keyed.sort_by(|(a, _), (b, _)| self.compare_projections(a, b));
        records.extend(keyed.into_iter().map(|(_, r)| r));
    }

    /// Sort records and drop those comparing equal to their predecessor
    ///
    /// Only records identical under every key collapse; the first one is kept.
    pub fn sort_dedup<T: Projectable>(&self, records: &mut Vec<T>) {
        let mut keyed: Vec<(RecordProjection, T)> =
            records.drain(..).map(|r| (r.project(), r)).collect();
        keyed.sort_by(|(a, _), (b, _)| self.compare_projections(a, b));
        keyed.dedup_by(|(a, _), (b, _)| self.compare_projections(a, b) == Ordering::Equal);
        records.extend(keyed.into_iter().map(|(_, r)| r));
    }
}

/// Ordinal comparison after folding both strings to upper case
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}

fn fold(key: &str) -> String {
    key.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CommitClassifier;
    use crate::types::fixtures::commit;
    use crate::types::{Footer, GitLog};
    use proptest::prelude::*;

    fn record(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fallback_orders_ties_on_sort_column() {
        let r0 = record(&[("sortBy", "alpha"), ("title", "bravo")]);
        let r1 = record(&[("title", "alpha"), ("sortBy", "bravo")]);
        let r2 = record(&[("sortBy", "bravo"), ("title", "delta")]);
        let r3 = record(&[("title", "charlie"), ("sortBy", "charlie")]);

        let mut records = vec![r3.clone(), r2.clone(), r0.clone(), r1.clone()];
        RecordComparer::new(["sortBy"]).sort(&mut records);

        assert_eq!(records, vec![r0, r1, r2, r3]);
    }

    #[test]
    fn test_columns_resolve_case_insensitively() {
        let comparer = RecordComparer::new(["SORTBY"]);
        let a = record(&[("sortby", "a"), ("z", "9")]);
        let b = record(&[("SortBy", "B"), ("z", "0")]);
        assert_eq!(comparer.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_missing_key_sorts_as_empty() {
        let comparer = RecordComparer::new(["scope"]);
        let scoped = record(&[("scope", "api")]);
        let unscoped = record(&[("subject", "zzz")]);
        assert_eq!(comparer.compare(&unscoped, &scoped), Ordering::Less);
    }

    #[test]
    fn test_values_compare_ignoring_case() {
        let comparer = RecordComparer::new(["name"]);
        let a = record(&[("name", "Alpha")]);
        let b = record(&[("NAME", "alpha")]);
        assert_eq!(comparer.compare(&a, &b), Ordering::Equal);
        assert_eq!(cmp_ignore_case("apple", "Banana"), Ordering::Less);
        assert_eq!(cmp_ignore_case("_x", "ax"), Ordering::Greater);
    }

    #[test]
    fn test_sort_dedup_only_collapses_identical_records() {
        let comparer = RecordComparer::new(["group"]);
        let mut records = vec![
            record(&[("group", "a"), ("id", "2")]),
            record(&[("group", "a"), ("id", "1")]),
            record(&[("GROUP", "A"), ("ID", "1")]),
        ];
        comparer.sort_dedup(&mut records);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].project().get("id"), Some("1"));
        assert_eq!(records[1].project().get("id"), Some("2"));
    }

    #[test]
    fn test_commit_projection() {
        let mut c = commit("abc1234", "fix", "crash");
        c.scope = Some("io".to_string());
        c.footers = vec![
            Footer::new("Closes", "#1"),
            Footer::new("closes", "#2"),
            Footer::new("Subject", "ignored"),
            Footer::new("HASH", "ignored"),
        ];

        let projection = c.project();
        assert_eq!(projection.get("TYPE"), Some("fix"));
        assert_eq!(projection.get("scope"), Some("io"));
        assert_eq!(projection.get("closes"), Some("#1\n#2"));
        assert_eq!(projection.get("subject"), Some("crash"));
        assert_eq!(projection.get("hash"), Some("abc1234"));
        assert_eq!(projection.resolve("missing"), "");
    }

    #[test]
    fn test_sort_classified_commits() {
        let mut breaking = commit("c", "chore", "deps");
        breaking.breaking = true;
        let log = GitLog::new(vec![
            commit("a", "fix", "zeta"),
            breaking,
            commit("b", "feat", "alpha"),
        ]);

        let mut classified = CommitClassifier::new().classify_log(&log);
        RecordComparer::new(["bucket", "subject"]).sort(classified.commits_mut());

        let order: Vec<&str> = classified
            .commits()
            .iter()
            .map(|c| c.commit.hash.as_str())
            .collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    fn arb_record() -> impl Strategy<Value = BTreeMap<String, String>> {
        proptest::collection::btree_map("[a-cA-C]{1,2}", "[a-cA-C_]{0,2}", 0..4)
    }

    proptest! {
        #[test]
        fn prop_antisymmetric(a in arb_record(), b in arb_record(), cols in proptest::collection::vec("[a-c]", 0..3)) {
            let comparer = RecordComparer::new(cols);
            prop_assert_eq!(comparer.compare(&a, &b), comparer.compare(&b, &a).reverse());
        }

        #[test]
        fn prop_transitive(a in arb_record(), b in arb_record(), c in arb_record()) {
            let comparer = RecordComparer::new(["a"]);
            if comparer.compare(&a, &b) != Ordering::Greater && comparer.compare(&b, &c) != Ordering::Greater {
                prop_assert_ne!(comparer.compare(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_equal_only_when_projections_match(a in arb_record(), b in arb_record()) {
            let comparer = RecordComparer::new(["b"]);
            if comparer.compare(&a, &b) == Ordering::Equal {
                let (pa, pb) = (a.project(), b.project());
                let mut keys: Vec<&str> = pa.keys().chain(pb.keys()).collect();
                keys.sort();
                for key in keys {
                    prop_assert_eq!(pa.resolve(key).to_uppercase(), pb.resolve(key).to_uppercase());
                }
            }
        }

        #[test]
        fn prop_sort_is_deterministic(records in proptest::collection::vec(arb_record(), 0..8)) {
            let comparer = RecordComparer::new(["a", "b"]);
            let mut first = records.clone();
            let mut second: Vec<_> = records.into_iter().rev().collect();
            comparer.sort_dedup(&mut first);
            comparer.sort_dedup(&mut second);
            let first: Vec<RecordProjection> = first.iter().map(Projectable::project).collect();
            let second: Vec<RecordProjection> = second.iter().map(Projectable::project).collect();
            prop_assert_eq!(first.len(), second.len());
            for (x, y) in first.iter().zip(second.iter()) {
                prop_assert_eq!(RecordComparer::new(["a", "b"]).compare_projections(x, y), Ordering::Equal);
            }
        }
    }
}
