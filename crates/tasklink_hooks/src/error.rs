//! Error types for hook registration and hook execution.

use core::fmt;

use crate::phase::PhaseId;

/// Boxed error raised by hooks and task bodies.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building a type's hook table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookRegistrationError {
    /// A type declared two hooks with the same name on the same phase.
    DuplicateName {
        /// The type declaring the hooks.
        owner: &'static str,
        /// The phase where the duplicate was found.
        phase: PhaseId,
        /// The duplicate hook name.
        name: String,
    },
    /// A type's inheritance reaches back to a type whose table is still
    /// being built.
    CyclicInheritance {
        /// The type encountered a second time.
        owner: &'static str,
    },
}

impl fmt::Display for HookRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookRegistrationError::DuplicateName { owner, phase, name } => {
                write!(
                    f,
                    "hook '{}' already registered for phase '{}' on {}",
                    name, phase, owner
                )
            }
            HookRegistrationError::CyclicInheritance { owner } => {
                write!(f, "cyclic hook inheritance through {owner}")
            }
        }
    }
}

impl core::error::Error for HookRegistrationError {}

/// A hook returned an error while firing.
///
/// Remaining hooks of the same phase were skipped.
#[derive(Debug, thiserror::Error)]
#[error("hook '{hook}' ({phase}) on {owner} failed: {source}")]
pub struct HookError {
    /// The type whose hook table was firing.
    pub owner: &'static str,
    /// The phase being fired.
    pub phase: PhaseId,
    /// Name of the failing hook.
    pub hook: String,
    /// The error the hook returned.
    pub source: BoxError,
}

/// Conversion from a hook method's return value into the registry's
/// hook result.
///
/// Implemented for `()` and for `Result<(), E>` where `E` converts into
/// [`BoxError`], so hook methods may be infallible or fallible.
pub trait IntoHookResult {
    /// Converts the value.
    ///
    /// # Errors
    ///
    /// Returns the hook's own error, boxed.
    fn into_hook_result(self) -> Result<(), BoxError>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> IntoHookResult for Result<(), E> {
    fn into_hook_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}
