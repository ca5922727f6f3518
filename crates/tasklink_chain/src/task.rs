//! The task trait and the call-boundary traits every chain member implements.
//!
//! # Architecture
//!
//! - [`Task`] - What a concrete task supplies: a name and a `run` body
//! - [`Invocable`] - Object-safe call boundary (name + invoke), implemented by
//!   [`TaskNode`](crate::TaskNode), [`ConditionTask`](crate::ConditionTask)
//!   and [`Pipeline`](crate::Pipeline)
//! - [`Linked`] - An [`Invocable`] that also owns a successor slot; only
//!   [`TaskNode`](crate::TaskNode) implements it
//!
//! A type that only implements [`Task`] cannot be invoked or linked on its
//! own: it has to be wrapped in a [`TaskNode`](crate::TaskNode), which
//! fires its lifecycle hooks around `run`.
//!
//! A task declaration without a `run` body is rejected by the compiler:
//!
//! ```compile_fail
//! use tasklink_chain::Task;
//! use tasklink_hooks::Hooked;
//!
//! struct Abstract;
//! impl Hooked for Abstract {
//!     type Input = i64;
//! }
//! impl Task for Abstract {
//!     type Output = i64;
//!     fn name(&self) -> &str {
//!         "abstract-only"
//!     }
//! }
//! ```

use core::fmt;
use std::sync::Arc;

use tasklink_hooks::Hooked;

use crate::error::TaskError;

/// A unit of work with lifecycle hooks.
///
/// Implementors supply the body; hook firing is handled by
/// [`TaskNode::invoke`](crate::TaskNode). The input type is the
/// [`Hooked::Input`] shared with the task's hooks.
///
/// # Example
///
/// ```
/// use tasklink_chain::{Task, TaskError, TaskNode, Invocable};
/// use tasklink_hooks::Hooked;
///
/// struct Double;
///
/// impl Hooked for Double {
///     type Input = i64;
/// }
///
/// impl Task for Double {
///     type Output = i64;
///
///     fn name(&self) -> &str {
///         "double"
///     }
///
///     fn run(&self, input: &i64) -> Result<i64, TaskError> {
///         Ok(input * 2)
///     }
/// }
///
/// let double = TaskNode::new(Double);
/// assert_eq!(double.invoke(&3).unwrap(), 6);
/// ```
pub trait Task: Hooked {
    /// The value `run` produces.
    type Output: 'static;

    /// Returns the task's name. Names need not be unique.
    fn name(&self) -> &str;

    /// Runs the task body.
    ///
    /// # Errors
    ///
    /// Returns the task's own failure, usually [`TaskError::Domain`]. The
    /// error is propagated to the caller unchanged.
    fn run(&self, input: &Self::Input) -> Result<Self::Output, TaskError>;
}

/// Object-safe call boundary shared by everything that can be invoked.
pub trait Invocable<I: ?Sized, O>: Send + Sync {
    /// Returns the name used in logs and errors.
    fn name(&self) -> &str;

    /// Invokes with the given input.
    ///
    /// # Errors
    ///
    /// Returns the failure of the invocation, see [`TaskError`].
    fn invoke(&self, input: &I) -> Result<O, TaskError>;
}

/// An [`Invocable`] that owns a single optional successor link.
///
/// Links are only wiring: invoking a task never invokes its successor.
///
/// A link is a strong reference. Tasks on a cycle keep each other alive
/// after every outside handle is dropped; break the cycle with
/// [`clear_next`](Self::clear_next) to free them.
pub trait Linked<I: ?Sized, O>: Invocable<I, O> {
    /// Returns the current successor.
    fn next(&self) -> Option<TaskRef<I, O>>;

    /// Replaces the successor, returning the previous one.
    ///
    /// The previous successor itself is left untouched.
    fn set_next(&self, next: Option<TaskRef<I, O>>) -> Option<TaskRef<I, O>>;

    /// Removes the successor, returning it.
    fn clear_next(&self) -> Option<TaskRef<I, O>> {
        self.set_next(None)
    }
}

impl<I: ?Sized, O> fmt::Debug for dyn Invocable<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocable").field("name", &self.name()).finish()
    }
}

impl<I: ?Sized, O> fmt::Debug for dyn Linked<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linked")
            .field("name", &self.name())
            .field("next", &self.next().map(|next| next.name().to_string()))
            .finish()
    }
}

/// Shared handle to a linkable task.
pub type TaskRef<I, O> = Arc<dyn Linked<I, O>>;

/// Shared handle to anything invocable, used for condition branches.
pub type Successor<I, O> = Arc<dyn Invocable<I, O>>;
