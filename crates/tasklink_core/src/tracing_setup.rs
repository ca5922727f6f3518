//! Subscriber configuration.
//!
//! [`TracingSetup`] installs a global `tracing` subscriber built from an
//! [`EnvFilter`] and one `fmt` layer. Installation is idempotent: when a
//! global subscriber already exists, [`TracingSetup::init`] leaves it in place
//! and reports `false`.
//!
//! # Filtering
//!
//! The filter is chosen in this order:
//!
//! 1. An explicit [`TracingSetup::with_env_filter`] directive string.
//! 2. The `RUST_LOG` environment variable.
//! 3. The configured maximum [`Level`].
//!
//! An explicit directive string that fails to parse falls back to the level.
//!
//! # Example
//!
//! ```no_run
//! use tasklink_core::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! // Development: pretty output with span enter/exit
//! TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_span_events(true)
//!     .init();
//!
//! // Production: JSON output, chatty targets turned down
//! TracingSetup::new()
//!     .with_format(TracingFormat::Json)
//!     .with_env_filter("tasklink_chain=info,tasklink_hooks=warn")
//!     .init();
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable multi-line output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// The configuration a [`TracingSetup`] applies.
///
/// Callers can keep this around to adapt their own logging, for example to
/// skip building expensive debug payloads when `level` is above `DEBUG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// The configured maximum log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
    /// Whether span enter/exit events are emitted.
    pub span_events: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSetup
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the global `tracing` subscriber.
///
/// Uses the [`tracing`] and [`tracing_subscriber`] crates under the hood.
/// Every `with_*` method consumes and returns the builder.
#[derive(Debug, Clone)]
pub struct TracingSetup {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TracingFormat,
    /// Explicit filter directives (e.g. `"tasklink_chain=debug"`).
    env_filter: Option<String>,
    /// Whether to include span events (enter/exit).
    span_events: bool,
}

impl Default for TracingSetup {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingSetup {
    /// Creates a `TracingSetup` with default settings: `INFO`, pretty output,
    /// no explicit filter and no span events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets explicit filter directives, overriding `RUST_LOG`.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    ///
    /// Each task invocation runs inside a `task` span, so this shows when
    /// every task starts and stops.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configuration this builder applies.
    #[must_use]
    pub fn config(&self) -> TracingConfig {
        TracingConfig {
            level: self.level,
            format: self.format,
            span_events: self.span_events,
        }
    }

    /// Installs the global subscriber.
    ///
    /// Returns `true` if this call installed it and `false` if a global
    /// subscriber was already set, in which case nothing changes.
    pub fn init(&self) -> bool {
        let filter = self.filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            TracingFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
            TracingFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(span_events),
                )
                .try_init()
                .is_ok(),
        };

        if installed {
            tracing::info!(
                level = %self.level,
                format = ?self.format,
                "tracing initialized"
            );
        }
        installed
    }

    fn filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.as_str());
        match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let setup = TracingSetup::default();
        assert_eq!(
            setup.config(),
            TracingConfig {
                level: Level::INFO,
                format: TracingFormat::Pretty,
                span_events: false,
            }
        );
        assert!(setup.env_filter.is_none());
    }

    #[test]
    fn builder_methods_apply() {
        let setup = TracingSetup::new()
            .with_level(Level::TRACE)
            .with_format(TracingFormat::Json)
            .with_env_filter("tasklink_chain=debug")
            .with_span_events(true);

        let config = setup.config();
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, TracingFormat::Json);
        assert!(config.span_events);
        assert_eq!(setup.env_filter.as_deref(), Some("tasklink_chain=debug"));
    }

    #[test]
    fn explicit_filter_is_used() {
        let filter = TracingSetup::new()
            .with_env_filter("tasklink_chain=debug")
            .filter();
        assert!(filter.to_string().contains("tasklink_chain=debug"));
    }

    #[test]
    fn invalid_filter_falls_back_to_level() {
        let filter = TracingSetup::new()
            .with_level(Level::WARN)
            .with_env_filter("tasklink_chain=loud")
            .filter();
        assert!(!filter.to_string().contains("tasklink_chain"));
    }

    #[test]
    fn init_is_idempotent() {
        let setup = TracingSetup::new().with_format(TracingFormat::Compact);
        setup.init();
        assert!(!setup.init());
        tracing::debug!("still routed to the first subscriber");
    }
}
