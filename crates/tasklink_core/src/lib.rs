//! Ambient infrastructure for tasklink applications.
//!
//! The task core only emits `tracing` events and spans; it never installs a
//! subscriber. [`TracingSetup`] is the one place that does, for binaries and
//! tests that want to see those events.
//!
//! # Example
//!
//! ```
//! use tasklink_core::{TracingFormat, TracingSetup};
//! use tracing::Level;
//!
//! let config = TracingSetup::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .config();
//!
//! assert_eq!(config.level, Level::DEBUG);
//! ```

mod tracing_setup;

pub use tracing_setup::{TracingConfig, TracingFormat, TracingSetup};
