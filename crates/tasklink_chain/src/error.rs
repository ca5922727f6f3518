//! Errors raised while invoking tasks, conditions and pipelines.

use tasklink_hooks::{BoxError, HookError, HookRegistrationError};

use crate::predicate::Verdict;

/// Errors that can occur when invoking a task.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// The task body failed. Displays as the inner error.
    #[error(transparent)]
    Domain(BoxError),
    /// A lifecycle hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),
    /// The task type's hook table could not be built.
    #[error(transparent)]
    Registration(#[from] HookRegistrationError),
    /// A condition could not select a successor.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// A pipeline was invoked before a root task was registered.
    #[error("pipeline '{pipeline}' has no root task registered")]
    NoRoot {
        /// Name of the pipeline.
        pipeline: String,
    },
}

impl TaskError {
    /// Creates a domain error from a task body failure.
    pub fn domain(err: impl Into<BoxError>) -> Self {
        Self::Domain(err.into())
    }

    /// Returns the task body's error, if this is a domain failure.
    #[must_use]
    pub fn as_domain(&self) -> Option<&(dyn core::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Domain(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Consumes the error, returning the task body's error if this is a
    /// domain failure.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged for non-domain failures.
    pub fn into_domain(self) -> Result<BoxError, Self> {
        match self {
            Self::Domain(err) => Ok(err),
            other => Err(other),
        }
    }
}

/// A condition's predicate failed and no exception branch was set.
#[derive(Debug, thiserror::Error)]
#[error(
    "failed to resolve next task for branch '{branch_name}': predicate {func} raised: {source}"
)]
pub struct ResolutionError {
    /// Name of the condition task that failed to resolve.
    pub branch_name: String,
    /// The verdict that could not be mapped, when one was produced.
    pub value: Option<Verdict>,
    /// Description of the predicate.
    pub func: String,
    /// The predicate's error.
    pub source: BoxError,
}
