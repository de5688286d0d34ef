//! formatter.rs - Per-sink entry point that censors rendered log messages.
//!
//! A host creates one `CensoringFormatter` per output sink and calls it once
//! per record with the fully rendered message. The enable flag is fixed when
//! the formatter is built; the matcher is read from the shared registry on
//! every call, so a refresh takes effect immediately for all sinks.
//!
//! Masking is best-effort. If no matcher is active, or the last refresh failed
//! to compile, messages pass through unmodified. It is not a security
//! boundary.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::Arc;

use log::Record;

use crate::config::FormatterOptions;
use crate::registry::MatcherRegistry;

/// Censors messages for one sink.
#[derive(Debug, Clone)]
pub struct CensoringFormatter {
    enabled: bool,
    registry: Arc<MatcherRegistry>,
}

/// The line written to stderr whenever a formatter is built.
pub fn diagnostic_line(options: &FormatterOptions) -> String {
    format!(
        "LogCensor formatter created. enabled: {}. options are: {}",
        options.enabled,
        options.describe_raw()
    )
}

impl CensoringFormatter {
    /// Builds a formatter bound to `registry`.
    ///
    /// Writes one diagnostic line straight to stderr. It deliberately bypasses
    /// `log` so it is never routed back through a censoring formatter.
    pub fn new(registry: Arc<MatcherRegistry>, options: FormatterOptions) -> Self {
        eprintln!("{}", diagnostic_line(&options));
        Self {
            enabled: options.enabled,
            registry,
        }
    }

    /// Builds a formatter from the raw option strings a host plugin receives,
    /// e.g. `Some(["enabled=true"])`.
    pub fn from_raw_options<I, S>(registry: Arc<MatcherRegistry>, raw: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(registry, FormatterOptions::parse(raw))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Censors `message`, borrowing it when nothing needs to change.
    pub fn censor<'t>(&self, message: &'t str) -> Cow<'t, str> {
        if !self.enabled {
            return Cow::Borrowed(message);
        }
        self.registry.mask(message)
    }

    /// The per-record hook. An absent message renders as an empty string.
    pub fn format(&self, message: Option<&str>) -> String {
        match message {
            Some(message) => self.censor(message).into_owned(),
            None => String::new(),
        }
    }

    /// Writes `[<timestamp> <LEVEL> <target>] <censored message>` for one
    /// `env_logger` record.
    pub fn write_record(&self, buf: &mut env_logger::fmt::Formatter, record: &Record) -> io::Result<()> {
        let rendered = match record.args().as_str() {
            Some(literal) => Cow::Borrowed(literal),
            None => Cow::Owned(record.args().to_string()),
        };
        let timestamp = buf.timestamp();
        writeln!(
            buf,
            "[{} {} {}] {}",
            timestamp,
            record.level(),
            record.target(),
            self.censor(&rendered)
        )
    }

    /// Registers this formatter as `builder`'s format function, so every
    /// record the resulting logger emits is censored.
    pub fn install(self, builder: &mut env_logger::Builder) -> &mut env_logger::Builder {
        builder.format(move |buf, record| self.write_record(buf, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizers::compiler::compile_matcher;

    fn active_registry(values: &[&str]) -> Arc<MatcherRegistry> {
        let registry = Arc::new(MatcherRegistry::new());
        registry.install(compile_matcher(values.iter().copied()).unwrap().unwrap());
        registry
    }

    #[test]
    fn disabled_formatter_passes_through_even_with_matcher() {
        let formatter = active_registry(&["password123"]).formatter(FormatterOptions::disabled());
        assert!(!formatter.is_enabled());
        assert_eq!(formatter.format(Some("hello password123")), "hello password123");
    }

    #[test]
    fn enabled_formatter_without_matcher_passes_through() {
        let formatter = Arc::new(MatcherRegistry::new()).formatter(FormatterOptions::enabled());
        assert_eq!(formatter.format(Some("hello password123")), "hello password123");
    }

    #[test]
    fn enabled_formatter_masks() {
        let formatter = active_registry(&["password123"]).formatter(FormatterOptions::enabled());
        assert_eq!(formatter.format(Some("hello PASSWORD123")), "hello ******");
    }

    #[test]
    fn absent_message_renders_empty() {
        let formatter = active_registry(&["x1"]).formatter(FormatterOptions::enabled());
        assert_eq!(formatter.format(None), "");
        assert_eq!(formatter.format(Some("")), "");
    }

    #[test]
    fn raw_options_resolve_enable_flag_once() {
        let registry = active_registry(&["s3cr3t"]);
        let on = CensoringFormatter::from_raw_options(Arc::clone(&registry), Some(["x=1", "enabled=true"]));
        let off = CensoringFormatter::from_raw_options(Arc::clone(&registry), None::<Vec<String>>);

        assert!(on.is_enabled());
        assert!(!off.is_enabled());
        assert_eq!(on.format(Some("s3cr3t")), "******");
        assert_eq!(off.format(Some("s3cr3t")), "s3cr3t");
    }

    #[test]
    fn formatters_share_registry_updates() {
        let registry = Arc::new(MatcherRegistry::new());
        let first = registry.formatter(FormatterOptions::enabled());
        let second = registry.formatter(FormatterOptions::enabled());

        registry.install(compile_matcher(["tok-9"]).unwrap().unwrap());

        assert_eq!(first.format(Some("tok-9")), "******");
        assert_eq!(second.format(Some("tok-9")), "******");
    }

    #[test]
    fn diagnostic_line_reports_state_and_raw_options() {
        let line = diagnostic_line(&FormatterOptions::parse(Some(["enabled=true"])));
        assert_eq!(line, "LogCensor formatter created. enabled: true. options are: [enabled=true]");

        let line = diagnostic_line(&FormatterOptions::parse(None::<Vec<String>>));
        assert_eq!(line, "LogCensor formatter created. enabled: false. options are: null");
    }
}
