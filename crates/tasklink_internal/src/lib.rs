//! # Tasklink Internal Library
//!
//! Re-exports the core tasklink crates for convenience.

/// Per-type lifecycle hook registry and the `#[task_hooks]` macro.
pub use tasklink_hooks;

/// Tasks, chaining, conditional branching and the pipeline driver.
pub use tasklink_chain;

/// Tracing subscriber configuration.
pub use tasklink_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use tasklink_chain::prelude::*;
    pub use tasklink_core::{TracingConfig, TracingFormat, TracingSetup};
    pub use tasklink_hooks::{
        BoxError, HookDeclarations, HookError, HookMixin, HookRegistrationError, HookRegistry,
        HookTable, Hooked, PhaseId, PostTask, PreTask, task_hooks,
    };
}
