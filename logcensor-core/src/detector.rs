//! detector.rs - Discovers sensitive values in a configuration snapshot.
//!
//! A value is sensitive when the name of the key holding it contains one of
//! the configured fragments (case-insensitive substring match). The detector
//! never inspects the values themselves beyond trimming them.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::{BTreeSet, HashSet};

use crate::config::SensitiveFragments;

/// The distinct, non-blank values found by one detection pass.
///
/// Callers must treat the contents as unordered. `Debug` never prints the
/// values themselves.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SensitiveValueSet {
    values: HashSet<String>,
    matched_keys: BTreeSet<String>,
}

impl SensitiveValueSet {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// An empty set means "nothing found", which is not an error.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Config keys that contributed at least one value, sorted.
    pub fn matched_keys(&self) -> impl Iterator<Item = &str> {
        self.matched_keys.iter().map(String::as_str)
    }
}

impl std::fmt::Debug for SensitiveValueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensitiveValueSet")
            .field("values", &format_args!("<{} hidden>", self.values.len()))
            .field("matched_keys", &self.matched_keys)
            .finish()
    }
}

/// Scans `configs` for keys containing any of `fragments` and collects their
/// trimmed, non-blank values.
///
/// Two keys sharing a value contribute a single entry.
pub fn detect_sensitive_values<I, K, V>(configs: I, fragments: &SensitiveFragments) -> SensitiveValueSet
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut found = SensitiveValueSet::default();
    if fragments.is_empty() {
        debug!("No sensitive fragments configured; skipping detection.");
        return found;
    }

    let mut scanned = 0usize;
    for (key, value) in configs {
        scanned += 1;
        let key = key.as_ref();
        if !fragments.matches_lowercased(&key.to_lowercase()) {
            continue;
        }
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        found.values.insert(value.to_string());
        found.matched_keys.insert(key.to_string());
    }

    debug!(
        "Scanned {} config entries against {} fragments: {} sensitive value(s) from {} key(s).",
        scanned,
        fragments.len(),
        found.values.len(),
        found.matched_keys.len()
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn filters_blank_and_non_matching_keys() {
        let configs = HashMap::from([
            ("db.password", "p@55"),
            ("db.username", ""),
            ("db.name", "prod"),
        ]);
        let fragments = SensitiveFragments::new(["password", "username"]);

        let found = detect_sensitive_values(&configs, &fragments);

        assert_eq!(found.len(), 1);
        assert!(found.contains("p@55"));
        assert_eq!(found.matched_keys().collect::<Vec<_>>(), vec!["db.password"]);
    }

    #[test]
    fn key_match_is_case_insensitive_and_values_are_trimmed() {
        let configs = vec![("Service.API_KEY", "  sk-ABC123 \n"), ("whitespace.token", "   ")];
        let found = detect_sensitive_values(configs, &SensitiveFragments::parse("api_key,TOKEN"));

        assert_eq!(found.iter().collect::<Vec<_>>(), vec!["sk-ABC123"]);
    }

    #[test]
    fn shared_values_are_deduplicated() {
        let configs = vec![
            ("primary.secret", "hunter2"),
            ("replica.secret", "hunter2"),
            ("replica.passwd", "other"),
        ];
        let found = detect_sensitive_values(configs, &SensitiveFragments::default());

        assert_eq!(found.len(), 2);
        assert_eq!(found.matched_keys().count(), 3);
    }

    #[test]
    fn nothing_found_is_empty_not_an_error() {
        let configs = vec![("db.name", "prod"), ("db.host", "localhost")];
        let found = detect_sensitive_values(configs, &SensitiveFragments::parse("password"));
        assert!(found.is_empty());

        let none = detect_sensitive_values(vec![("db.password", "x")], &SensitiveFragments::parse(""));
        assert!(none.is_empty());
    }

    #[test]
    fn debug_output_hides_values() {
        let found = detect_sensitive_values(vec![("password", "topsecret")], &SensitiveFragments::default());
        let rendered = format!("{:?}", found);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("password"));
    }
}
