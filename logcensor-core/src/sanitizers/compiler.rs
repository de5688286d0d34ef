//! compiler.rs - Compiles sensitive values into a single masking matcher.
//!
//! Every value is escaped and joined into one case-insensitive alternation.
//! Values are ordered longest first, so when one secret is a substring of
//! another the longer one is masked as a whole.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;
use std::fmt;

use crate::errors::CensorError;

/// Replacement written in place of every sensitive value.
pub const MASK_TOKEN: &str = "******";

/// Upper bound on the compiled program size (10 MB).
pub(crate) const COMPILED_SIZE_LIMIT: usize = 10 * (1 << 20);

/// An immutable, compiled matcher for a set of literal sensitive values.
///
/// `mask` takes `&self` and touches no shared state, so one matcher can be
/// used from any number of threads at once.
pub struct MaskingMatcher {
    regex: Regex,
    pattern_count: usize,
}

impl MaskingMatcher {
    /// Replaces every non-overlapping occurrence of a sensitive value with
    /// [`MASK_TOKEN`]. Returns the input borrowed when nothing matched.
    pub fn mask<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, NoExpand(MASK_TOKEN))
    }

    /// True if `text` contains at least one sensitive value.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of distinct values in the alternation.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}

// The regex source contains the secrets, so it is never printed.
impl fmt::Debug for MaskingMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingMatcher")
            .field("pattern_count", &self.pattern_count)
            .finish_non_exhaustive()
    }
}

/// Builds the alternation source: escaped values, longest first, ties broken
/// lexicographically so the result does not depend on set iteration order.
fn build_alternation<I, S>(values: I) -> (String, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut literals: Vec<String> = values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    literals.dedup();

    let count = literals.len();
    let alternation = literals
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<String>>()
        .join("|");
    (alternation, count)
}

/// Compiles `values` into a [`MaskingMatcher`].
///
/// Returns `Ok(None)` when there is nothing to mask; an empty alternation
/// would match at every position.
pub fn compile_matcher<I, S>(values: I) -> Result<Option<MaskingMatcher>, CensorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    compile_with_limit(values, COMPILED_SIZE_LIMIT)
}

pub(crate) fn compile_with_limit<I, S>(values: I, size_limit: usize) -> Result<Option<MaskingMatcher>, CensorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (alternation, pattern_count) = build_alternation(values);
    if pattern_count == 0 {
        debug!("No sensitive values to compile; no matcher built.");
        return Ok(None);
    }

    let regex = RegexBuilder::new(&format!("(?:{})", alternation))
        .case_insensitive(true)
        .size_limit(size_limit)
        .build()
        .map_err(|e| CensorError::PatternCompilation(pattern_count, e))?;

    debug!("Compiled masking matcher with {} value(s).", pattern_count);
    Ok(Some(MaskingMatcher { regex, pattern_count }))
}
