//! Per-type lifecycle hooks for tasklink tasks.
//!
//! Every type implementing [`Hooked`] owns one [`HookTable`]: an ordered list
//! of hooks per [`Phase`]. Tables are built once, on first use, by the
//! [`HookRegistry`], and then shared read-only by every instance.
//!
//! - [`phase`] - Phase markers ([`PreTask`], [`PostTask`])
//! - [`declare`] - The [`Hooked`] trait and the declaration builder
//! - [`registry`] - Hook tables and the registry arena
//! - [`macro@task_hooks`] - Attribute macro declaring hooks from tagged methods
//!
//! # Ordering
//!
//! Within a phase, hooks inherited from composed types run first (ancestors
//! before descendants), then mixins, then the type's own hooks in declaration
//! order. A hook reached through two paths runs once.
//!
//! # Example
//!
//! ```
//! use tasklink_hooks::{HookRegistry, PhaseId, PreTask, task_hooks};
//!
//! struct Base;
//!
//! #[task_hooks(input = str)]
//! impl Base {
//!     #[pre_task]
//!     fn announce(&self, _input: &str) {}
//! }
//!
//! struct Derived {
//!     base: Base,
//! }
//!
//! #[task_hooks(inherit = base)]
//! impl Derived {
//!     #[pre_task]
//!     fn validate(&self, input: &str) -> Result<(), String> {
//!         if input.is_empty() {
//!             return Err("empty input".to_string());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let table = HookRegistry::global().hooks_for::<Derived>().unwrap();
//! assert_eq!(
//!     table.hook_names(PhaseId::of::<PreTask>()),
//!     vec!["announce", "validate"]
//! );
//!
//! let derived = Derived { base: Base };
//! assert!(table.fire::<PreTask>(&derived, "job").is_ok());
//! assert!(table.fire::<PreTask>(&derived, "").is_err());
//! ```

// Self-reference so `#[task_hooks]` expansions inside this crate resolve
// `tasklink_hooks::` paths.
extern crate self as tasklink_hooks;

pub mod declare;
pub mod error;
pub mod phase;
pub mod registry;

pub use declare::{HookDeclarations, HookEntry, HookMixin, Hooked};
pub use error::{BoxError, HookError, HookRegistrationError, IntoHookResult};
pub use phase::{IntoPhaseIds, Phase, PhaseId, PostTask, PreTask};
pub use registry::{HookRegistry, HookTable};

/// Re-export the `#[task_hooks]` attribute macro.
pub use tasklink_hook_macros::task_hooks;
