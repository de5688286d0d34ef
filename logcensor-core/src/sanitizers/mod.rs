//! Matcher compilation for logcensor.
//!
//! Turns a set of discovered sensitive values into one escaped,
//! case-insensitive regular expression and applies it to message text.

pub mod compiler;
