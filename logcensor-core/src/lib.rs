// logcensor-core/src/lib.rs
//! # logcensor core library
//!
//! `logcensor-core` masks configuration secrets in log output at formatting
//! time. Applications routinely log configuration dumps or request payloads
//! that contain passwords, API keys or tokens; this crate replaces every
//! occurrence of such a value with `******` before the line reaches a sink.
//!
//! ## Modules
//!
//! * `config`: Sensitive key fragments, formatter options and the YAML `CensorConfig`.
//! * `detector`: Finds sensitive values in a key/value configuration snapshot.
//! * `sanitizers`: Compiles the values into a single escaped, case-insensitive matcher.
//! * `registry`: The atomically swappable slot holding the active matcher.
//! * `formatter`: The per-sink hook that censors each rendered message.
//! * `errors`: The crate's error type.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use logcensor_core::{FormatterOptions, MatcherRegistry, SensitiveFragments};
//!
//! let registry = Arc::new(MatcherRegistry::new());
//!
//! // One formatter per sink.
//! let formatter = registry.formatter(FormatterOptions::enabled());
//!
//! // After the application has loaded its configuration.
//! let configs = HashMap::from([("api_key", "sk-ABC123"), ("region", "eu-west-1")]);
//! registry.refresh(&configs, &SensitiveFragments::default());
//!
//! assert_eq!(formatter.format(Some("using token sk-ABC123 now")), "using token ****** now");
//! assert_eq!(formatter.format(Some("nothing sensitive here")), "nothing sensitive here");
//! ```
//!
//! With `env_logger`, install the formatter on the builder instead of calling
//! it by hand:
//!
//! ```rust,no_run
//! use logcensor_core::{FormatterOptions, MatcherRegistry};
//!
//! let mut builder = env_logger::Builder::from_default_env();
//! MatcherRegistry::global()
//!     .formatter(FormatterOptions::enabled())
//!     .install(&mut builder)
//!     .init();
//! ```
//!
//! ## Failure Policy
//!
//! Masking fails open. With no active matcher, or after a refresh whose
//! pattern could not be compiled, messages are written unmodified (in the
//! latter case the previously active matcher keeps being used). Treat the
//! censor as a safety net for accidental leaks, not as a security boundary.
//!
//! Only literal values that appear in the configuration are masked. There is
//! no structural detection of e-mail addresses, card numbers and the like.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod detector;
pub mod errors;
pub mod formatter;
pub mod registry;
pub mod sanitizers;

/// Re-exports the configuration types and defaults.
pub use config::{
    CensorConfig,
    FormatterOptions,
    FragmentList,
    SensitiveFragments,
    DEFAULT_SENSITIVE_CONFIGS,
    ENABLED_OPTION,
    SENSITIVE_CONFIGS_ENV,
};

pub use errors::CensorError;

pub use detector::{detect_sensitive_values, SensitiveValueSet};

pub use sanitizers::compiler::{compile_matcher, MaskingMatcher, MASK_TOKEN};

pub use registry::{MatcherRegistry, RefreshOutcome};

pub use formatter::{diagnostic_line, CensoringFormatter};
