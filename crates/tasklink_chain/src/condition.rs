//! Conditional branching between successor tasks.
//!
//! A [`ConditionTask`] evaluates its predicate on every call and maps the
//! outcome to one of up to four successors:
//!
//! | Predicate outcome | Branch taken |
//! |-------------------|--------------|
//! | error | `on_exception` if set, else [`ResolutionError`] |
//! | undetermined | `on_else` if set, else `on_false` |
//! | true | `on_true` |
//! | false | `on_false` |
//!
//! The selected successor is invoked inline with the same input; the
//! condition has no successor link of its own.
//!
//! # Example
//!
//! ```
//! use tasklink_chain::{ConditionTask, Invocable, Predicate, fn_task};
//!
//! let halve = fn_task("halve", |x: &i64| Ok(x / 2));
//! let triple = fn_task("triple", |x: &i64| Ok(x * 3 + 1));
//!
//! let collatz = ConditionTask::new(
//!     "collatz",
//!     Predicate::new(|x: &i64| x % 2 == 0).with_description("is_even"),
//!     halve,
//!     triple,
//! );
//!
//! assert_eq!(collatz.invoke(&10).unwrap(), 5);
//! assert_eq!(collatz.invoke(&5).unwrap(), 16);
//! ```

use core::fmt;

use crate::error::{ResolutionError, TaskError};
use crate::predicate::{BoxedPredicate, ErasedPredicate, Verdict};
use crate::task::{Invocable, Successor};

/// The branch a condition selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// The predicate held.
    True,
    /// The predicate did not hold, or was undetermined without an else
    /// branch.
    False,
    /// The predicate was undetermined and an else branch is set.
    Else,
    /// The predicate failed and an exception branch is set.
    Exception,
}

impl Branch {
    /// Returns the name of the field holding this branch's successor.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "on_true",
            Self::False => "on_false",
            Self::Else => "on_else",
            Self::Exception => "on_exception",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task that picks its successor from a predicate's outcome.
pub struct ConditionTask<I: ?Sized + 'static, O: 'static> {
    name: String,
    predicate: BoxedPredicate<I>,
    on_true: Successor<I, O>,
    on_false: Successor<I, O>,
    on_else: Option<Successor<I, O>>,
    on_exception: Option<Successor<I, O>>,
}

impl<I: ?Sized + 'static, O: 'static> ConditionTask<I, O> {
    /// Creates a condition with mandatory true and false branches.
    pub fn new(
        name: impl Into<String>,
        predicate: impl ErasedPredicate<I> + 'static,
        on_true: Successor<I, O>,
        on_false: Successor<I, O>,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            on_true,
            on_false,
            on_else: None,
            on_exception: None,
        }
    }

    /// Sets the successor for an undetermined predicate outcome.
    #[must_use]
    pub fn with_else(mut self, on_else: Successor<I, O>) -> Self {
        self.on_else = Some(on_else);
        self
    }

    /// Sets the successor for a failing predicate.
    #[must_use]
    pub fn with_exception(mut self, on_exception: Successor<I, O>) -> Self {
        self.on_exception = Some(on_exception);
        self
    }

    /// Returns the predicate's description.
    #[must_use]
    pub fn predicate_description(&self) -> &str {
        self.predicate.description()
    }

    /// Evaluates the predicate and returns the branch it selects.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] when the predicate fails and no
    /// exception branch is set.
    pub fn branch(&self, input: &I) -> Result<Branch, ResolutionError> {
        let verdict = match self.predicate.evaluate(input) {
            Ok(verdict) => verdict,
            Err(source) if self.on_exception.is_some() => {
                tracing::warn!(
                    condition = %self.name,
                    predicate = self.predicate.description(),
                    error = %source,
                    "predicate failed, taking exception branch"
                );
                return Ok(Branch::Exception);
            }
            Err(source) => {
                return Err(ResolutionError {
                    branch_name: self.name.clone(),
                    value: None,
                    func: self.predicate.description().to_string(),
                    source,
                });
            }
        };

        Ok(match verdict {
            Verdict::Undetermined if self.on_else.is_some() => Branch::Else,
            Verdict::True => Branch::True,
            Verdict::False | Verdict::Undetermined => Branch::False,
        })
    }

    /// Evaluates the predicate and returns the selected successor.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] when the predicate fails and no
    /// exception branch is set.
    pub fn resolve(&self, input: &I) -> Result<Successor<I, O>, ResolutionError> {
        let branch = self.branch(input)?;
        tracing::debug!(condition = %self.name, %branch, "branch selected");
        Ok(self.successor(branch).clone())
    }

    fn successor(&self, branch: Branch) -> &Successor<I, O> {
        match branch {
            Branch::True => &self.on_true,
            Branch::Else => self.on_else.as_ref().unwrap_or(&self.on_false),
            Branch::Exception => self.on_exception.as_ref().unwrap_or(&self.on_false),
            Branch::False => &self.on_false,
        }
    }
}

impl<I: ?Sized + 'static, O: 'static> Invocable<I, O> for ConditionTask<I, O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, input: &I) -> Result<O, TaskError> {
        let next = self.resolve(input)?;
        next.invoke(input)
    }
}

impl<I: ?Sized + 'static, O: 'static> fmt::Debug for ConditionTask<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionTask")
            .field("name", &self.name)
            .field("predicate", &self.predicate)
            .field("on_true", &self.on_true.name())
            .field("on_false", &self.on_false.name())
            .field("on_else", &self.on_else.as_ref().map(|task| task.name()))
            .field(
                "on_exception",
                &self.on_exception.as_ref().map(|task| task.name()),
            )
            .finish()
    }
}
