//! Configuration management for `logcensor-core`.
//!
//! This module owns the three inputs the censor needs from its host:
//!
//! * the list of sensitive key fragments (`SensitiveFragments`),
//! * the raw per-formatter options (`FormatterOptions`),
//! * an optional YAML file bundling both (`CensorConfig`).
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::CensorError;

/// Fragments used when neither the host nor the environment supplies a list.
pub const DEFAULT_SENSITIVE_CONFIGS: &str = "passwd,key,access,secret,apikey,api_key,credential,token,auth,signature,passphrase,client_id,client.id,client_secret,client.secret,authorization,bearer,user_name,username,user,pass,password";

/// Environment variable that overrides the default fragment list (comma separated).
pub const SENSITIVE_CONFIGS_ENV: &str = "LOGCENSOR_SENSITIVE_CONFIGS";

/// The option string that switches a formatter on.
pub const ENABLED_OPTION: &str = "enabled=true";

lazy_static! {
    static ref DEFAULT_FRAGMENTS: SensitiveFragments =
        SensitiveFragments::parse(DEFAULT_SENSITIVE_CONFIGS);
}

/// An ordered, deduplicated list of lowercase key fragments.
///
/// A config key is considered sensitive when its lowercased form contains any
/// of these fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveFragments {
    fragments: Vec<String>,
}

impl SensitiveFragments {
    /// Builds a fragment list from individual entries.
    ///
    /// Entries are trimmed and lowercased; blanks and repeats are dropped while
    /// first-occurrence order is kept.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let fragments = fragments
            .into_iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .filter(|f| seen.insert(f.clone()))
            .collect();
        Self { fragments }
    }

    /// Parses a comma-separated list such as `"password, token,secret"`.
    pub fn parse(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Reads `LOGCENSOR_SENSITIVE_CONFIGS`, falling back to the defaults when
    /// the variable is unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(SENSITIVE_CONFIGS_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                debug!("Using sensitive fragments from {}.", SENSITIVE_CONFIGS_ENV);
                Self::parse(&raw)
            }
            _ => Self::default(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// True if the (already lowercased) key contains any fragment.
    pub(crate) fn matches_lowercased(&self, lowercased_key: &str) -> bool {
        self.fragments.iter().any(|f| lowercased_key.contains(f.as_str()))
    }
}

impl Default for SensitiveFragments {
    fn default() -> Self {
        DEFAULT_FRAGMENTS.clone()
    }
}

impl fmt::Display for SensitiveFragments {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fragments.join(","))
    }
}

/// Options a host passes when it creates a formatter for one sink.
///
/// Only `enabled=true` has meaning today. Matching is looser than an exact
/// string compare: whitespace around the key and value is ignored and both
/// compare without ASCII case, so `" Enabled = TRUE "` also switches masking
/// on. The raw strings are kept so the construction diagnostic can echo
/// exactly what the host supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterOptions {
    pub enabled: bool,
    raw: Option<Vec<String>>,
}

impl FormatterOptions {
    /// Resolves options from the raw strings. `None` means the host supplied
    /// no option array at all, which is reported differently from an empty one.
    pub fn parse<I, S>(raw: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Option<Vec<String>> =
            raw.map(|opts| opts.into_iter().map(|o| o.as_ref().to_string()).collect());
        let enabled = raw
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|opt| is_enabled_option(opt));
        Self { enabled, raw }
    }

    pub fn enabled() -> Self {
        Self::parse(Some([ENABLED_OPTION]))
    }

    pub fn disabled() -> Self {
        Self::parse(Some(["enabled=false"]))
    }

    /// The raw options as `[a, b]`, or `null` when none were given.
    pub fn describe_raw(&self) -> String {
        match &self.raw {
            Some(opts) => format!("[{}]", opts.join(", ")),
            None => "null".to_string(),
        }
    }
}

fn is_enabled_option(opt: &str) -> bool {
    match opt.split_once('=') {
        Some((key, value)) => {
            key.trim().eq_ignore_ascii_case("enabled") && value.trim().eq_ignore_ascii_case("true")
        }
        None => false,
    }
}

/// The fragment list may be written either as a comma-separated string or as
/// a YAML sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FragmentList {
    Csv(String),
    List(Vec<String>),
}

impl FragmentList {
    fn to_fragments(&self) -> SensitiveFragments {
        match self {
            FragmentList::Csv(csv) => SensitiveFragments::parse(csv),
            FragmentList::List(items) => SensitiveFragments::new(items),
        }
    }
}

/// Top-level censor configuration, usually loaded from a small YAML file.
///
/// ```yaml
/// enabled: true
/// sensitive_configs: "password,token"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CensorConfig {
    /// Whether formatters built from this config mask anything.
    pub enabled: bool,
    /// Overrides the environment/default fragment list when present.
    pub sensitive_configs: Option<FragmentList>,
}

impl CensorConfig {
    /// Loads a censor config from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading censor config from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(|e| CensorError::ConfigRead(path.display().to_string(), e))?;
        let config: CensorConfig = serde_yml::from_str(&text)
            .map_err(|e| CensorError::ConfigParse(path.display().to_string(), e))?;

        debug!(
            "Censor config loaded: enabled={}, custom fragments={}",
            config.enabled,
            config.sensitive_configs.is_some()
        );
        Ok(config)
    }

    /// The configured fragments, or the environment/default list.
    pub fn fragments(&self) -> SensitiveFragments {
        match &self.sensitive_configs {
            Some(list) => {
                let fragments = list.to_fragments();
                if fragments.is_empty() {
                    SensitiveFragments::from_env()
                } else {
                    fragments
                }
            }
            None => SensitiveFragments::from_env(),
        }
    }

    /// Raw options equivalent to this config, for building a formatter.
    pub fn formatter_options(&self) -> FormatterOptions {
        FormatterOptions::parse(Some([format!("enabled={}", self.enabled)]))
    }
}
