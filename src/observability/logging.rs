//! Structured logging configuration.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV: &str = "SIGNAL_DEDUP_LOG";

/// Environment variable selecting the output format (`pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "SIGNAL_DEDUP_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Filter directives, e.g. `signal_dedup=debug`.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Builds logging configuration from environment variables.
    ///
    /// `SIGNAL_DEDUP_LOG` wins over `RUST_LOG`. Unparseable directives fall
    /// back to `info`, and an unknown format falls back to pretty output.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds logging configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let directives = lookup(LOG_FILTER_ENV)
            .or_else(|| lookup(EnvFilter::DEFAULT_ENV))
            .filter(|value| !value.trim().is_empty());

        let filter = directives
            .and_then(|value| EnvFilter::try_new(value).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

        let format = lookup(LOG_FORMAT_ENV)
            .and_then(|value| LogFormat::parse(&value))
            .unwrap_or_default();

        Self { filter, format }
    }

    /// Uses the given filter directives.
    ///
    /// Invalid directives are ignored and the current filter is kept.
    #[must_use]
    pub fn with_filter(mut self, directives: &str) -> Self {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            self.filter = filter;
        }
        self
    }

    /// Uses the given output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: EnvFilter::new(DEFAULT_FILTER),
            format: LogFormat::default(),
        }
    }
}
