//! registry.rs - The active-matcher slot shared by every formatter.
//!
//! A `MatcherRegistry` holds at most one compiled `MaskingMatcher`. Formatters
//! read it on every log record; an administrative path (start-up, config
//! reload) replaces it wholesale. Publication is a single atomic pointer swap,
//! so a reader sees either the old matcher or the new one and never takes a
//! lock.
//!
//! Hosts normally create one registry and hand an `Arc` of it to each
//! formatter. [`MatcherRegistry::global`] exists for hosts that want a single
//! process-wide slot without threading it through their set-up code.
//!
//! License: MIT OR APACHE 2.0

use arc_swap::ArcSwapOption;
use lazy_static::lazy_static;
use log::{info, warn};
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::{FormatterOptions, SensitiveFragments};
use crate::detector::detect_sensitive_values;
use crate::errors::CensorError;
use crate::formatter::CensoringFormatter;
use crate::sanitizers::compiler::{compile_with_limit, MaskingMatcher, COMPILED_SIZE_LIMIT};

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<MatcherRegistry> = Arc::new(MatcherRegistry::new());
}

/// Result of one detection pass.
///
/// None of these are errors from the host's point of view: logging keeps
/// working in every case.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new matcher covering `patterns` values is now active.
    Installed { patterns: usize },
    /// No sensitive values were found; the previous matcher (if any) stays.
    NothingFound,
    /// The matcher could not be built; the previous matcher (if any) stays.
    CompileFailed(CensorError),
}

impl RefreshOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, RefreshOutcome::Installed { .. })
    }
}

/// Holds the currently active masking matcher.
#[derive(Debug)]
pub struct MatcherRegistry {
    slot: ArcSwapOption<MaskingMatcher>,
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherRegistry {
    /// Creates a registry with no active matcher.
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::from(None),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<MatcherRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// A snapshot of the active matcher. Later swaps do not affect it.
    pub fn current(&self) -> Option<Arc<MaskingMatcher>> {
        self.slot.load_full()
    }

    pub fn is_active(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Publishes `matcher`, replacing whatever was active.
    pub fn install(&self, matcher: MaskingMatcher) {
        self.slot.store(Some(Arc::new(matcher)));
    }

    /// Removes the active matcher. Subsequent records pass through unmasked.
    pub fn clear(&self) {
        self.slot.store(None);
    }

    /// Masks `text` with the active matcher, or returns it unchanged.
    pub fn mask<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let guard = self.slot.load();
        match &*guard {
            Some(matcher) => matcher.mask(text),
            None => Cow::Borrowed(text),
        }
    }

    /// Runs a detection pass over `configs` and publishes the result.
    ///
    /// An empty detection or a compile failure leaves the current matcher in
    /// place: refreshing never un-protects secrets found earlier in the
    /// process lifetime. A successful pass replaces the previous matcher
    /// entirely; values from earlier passes are not merged in.
    pub fn refresh<I, K, V>(&self, configs: I, fragments: &SensitiveFragments) -> RefreshOutcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.refresh_with_limit(configs, fragments, COMPILED_SIZE_LIMIT)
    }

    pub(crate) fn refresh_with_limit<I, K, V>(
        &self,
        configs: I,
        fragments: &SensitiveFragments,
        size_limit: usize,
    ) -> RefreshOutcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let found = detect_sensitive_values(configs, fragments);
        if found.is_empty() {
            info!("No sensitive data found in the configs. Keeping the current censoring pattern.");
            return RefreshOutcome::NothingFound;
        }

        match compile_with_limit(found.iter(), size_limit) {
            Ok(Some(matcher)) => {
                let patterns = matcher.pattern_count();
                self.install(matcher);
                info!(
                    "Censoring {} sensitive value(s) from keys: {}",
                    patterns,
                    found.matched_keys().collect::<Vec<_>>().join(", ")
                );
                RefreshOutcome::Installed { patterns }
            }
            // `found` is non-empty, so the compiler always has values here.
            Ok(None) => {
                info!("No sensitive data found in the configs. Keeping the current censoring pattern.");
                RefreshOutcome::NothingFound
            }
            Err(e) => {
                warn!("{}. Keeping the current censoring pattern.", e);
                RefreshOutcome::CompileFailed(e)
            }
        }
    }

    /// Builds a formatter for one sink, bound to this registry.
    pub fn formatter(self: &Arc<Self>, options: FormatterOptions) -> CensoringFormatter {
        CensoringFormatter::new(Arc::clone(self), options)
    }
}
