//! Hookwire Logging
//!
//! Installs a `tracing` subscriber configured from `HOOKWIRE_*`
//! environment variables. The library crates only emit events through
//! `tracing`; binaries call [`init`] once at startup.
//!
//! # Usage
//!
//! ```rust,no_run
//! hookwire_log::init();
//! tracing::info!("receiver ready");
//! ```
//!
//! # Environment Variables
//!
//! - `HOOKWIRE_DEBUG=1` - Enable debug logging
//! - `HOOKWIRE_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `HOOKWIRE_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `HOOKWIRE_LOG_COLOR=1|0` - Enable/disable colors
//! - `HOOKWIRE_LOG_TIMESTAMPS=1|0` - Include timestamps
//! - `HOOKWIRE_LOG_MODULE=1|0` - Include the event target
//!
//! `RUST_LOG`, when set, replaces the level with a full filter directive.

use once_cell::sync::OnceCell;
use std::env;
use std::fmt;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level that gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    /// No logging
    Off,
}

impl Level {
    /// Get level from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Filter directive understood by `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    Compact,
    /// One JSON object per event
    Json,
}

impl Format {
    /// Get format from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether colors are enabled
    pub color: bool,
    /// Whether to include timestamps
    pub timestamps: bool,
    /// Whether to include the event target
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Compact,
            color: false,
            timestamps: true,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let debug = flag("HOOKWIRE_DEBUG").unwrap_or(false);

        let level = lookup("HOOKWIRE_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("HOOKWIRE_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Compact);

        let color = flag("HOOKWIRE_LOG_COLOR")
            .unwrap_or_else(|| lookup("NO_COLOR").is_none() && lookup("TERM").is_some());

        Self {
            debug,
            level,
            format,
            color: color && format != Format::Json,
            timestamps: flag("HOOKWIRE_LOG_TIMESTAMPS").unwrap_or(true),
            module_path: flag("HOOKWIRE_LOG_MODULE").unwrap_or(true),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The filter to install: `RUST_LOG` if set, otherwise the level
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.as_directive()))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.module_path);

        match (self.format, self.timestamps) {
            (Format::Pretty, true) => layer
                .pretty()
                .with_ansi(self.color)
                .with_timer(ChronoUtc::rfc_3339())
                .boxed(),
            (Format::Pretty, false) => layer.pretty().with_ansi(self.color).without_time().boxed(),
            #[cfg(feature = "json")]
            (Format::Json, true) => layer
                .json()
                .with_ansi(false)
                .with_timer(ChronoUtc::rfc_3339())
                .boxed(),
            #[cfg(feature = "json")]
            (Format::Json, false) => layer.json().with_ansi(false).without_time().boxed(),
            (_, true) => layer
                .compact()
                .with_ansi(self.color)
                .with_timer(ChronoUtc::rfc_3339())
                .boxed(),
            (_, false) => layer.compact().with_ansi(self.color).without_time().boxed(),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

static INSTALLED: OnceCell<LogConfig> = OnceCell::new();

/// Install the global subscriber from the environment.
///
/// Does nothing if a subscriber is already installed.
pub fn init() {
    let _ = try_init();
}

/// Install the global subscriber from the environment
pub fn try_init() -> Result<(), TryInitError> {
    try_init_with(LogConfig::from_env())
}

/// Install the global subscriber from an explicit configuration
pub fn try_init_with(config: LogConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()?;

    let _ = INSTALLED.set(config);
    Ok(())
}

/// Configuration of the subscriber installed by this crate, if any
pub fn installed() -> Option<&'static LogConfig> {
    INSTALLED.get()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("invalid"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Json"), Some(Format::Json));
        assert_eq!(Format::parse("invalid"), None);
    }

    #[test]
    fn test_defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, Format::Compact);
        assert!(!config.color);
        assert!(config.timestamps);
    }

    #[test]
    fn test_debug_flag_lowers_level() {
        let config = config_from(&[("HOOKWIRE_DEBUG", "true")]);
        assert!(config.debug);
        assert_eq!(config.level, Level::Debug);

        let config = config_from(&[("HOOKWIRE_DEBUG", "1"), ("HOOKWIRE_LOG_LEVEL", "warn")]);
        assert_eq!(config.level, Level::Warn);
    }

    #[test]
    fn test_json_never_colored() {
        let config = config_from(&[
            ("HOOKWIRE_LOG_FORMAT", "json"),
            ("HOOKWIRE_LOG_COLOR", "1"),
        ]);
        assert_eq!(config.format, Format::Json);
        assert!(!config.color);
    }

    #[test]
    fn test_color_follows_terminal() {
        assert!(config_from(&[("TERM", "xterm")]).color);
        assert!(!config_from(&[("TERM", "xterm"), ("NO_COLOR", "1")]).color);
        assert!(!config_from(&[("TERM", "xterm"), ("HOOKWIRE_LOG_COLOR", "0")]).color);
    }

    #[test]
    fn test_builder_overrides() {
        let config = LogConfig::default()
            .with_level(Level::Trace)
            .with_format(Format::Pretty)
            .with_color(true);
        assert_eq!(config.level, Level::Trace);
        assert_eq!(config.format, Format::Pretty);
        assert!(config.color);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::default().with_level(Level::Off);
        let first = try_init_with(config.clone());
        assert!(try_init_with(config).is_err());
        if first.is_ok() {
            assert_eq!(installed().map(|c| c.level), Some(Level::Off));
        }
    }
}
