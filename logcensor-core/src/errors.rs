//! errors.rs - Error types for the logcensor-core library.
//!
//! Only the set-up paths (compiling a matcher, loading a config file) can
//! fail. Masking itself never returns an error.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types produced by `logcensor-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CensorError {
    /// The regex engine rejected the combined alternation (usually the size limit).
    #[error("Failed to compile masking pattern for {0} sensitive value(s): {1}")]
    PatternCompilation(usize, regex::Error),

    #[error("Failed to read censor config '{0}': {1}")]
    ConfigRead(String, std::io::Error),

    #[error("Failed to parse censor config '{0}': {1}")]
    ConfigParse(String, serde_yml::Error),
}
