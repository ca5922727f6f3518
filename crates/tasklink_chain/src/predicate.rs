//! Predicates deciding which branch a condition takes.
//!
//! # Architecture
//!
//! Predicates follow the same type erasure pattern as tasks:
//!
//! - [`Predicate<I, F, R>`] - Typed predicate wrapping a closure over `&I`
//! - [`ErasedPredicate`] - Object-safe trait for type-erased storage
//! - [`BoxedPredicate`] - Type alias for boxed predicates
//!
//! A predicate produces a [`Verdict`]. Closures may return `bool`,
//! `Option<bool>` (where `None` is undetermined), a [`Verdict`], or a
//! `Result` of any of these when evaluation can fail.
//!
//! # Example
//!
//! ```
//! use tasklink_chain::predicate::{ErasedPredicate, Predicate, Verdict};
//!
//! let is_even = Predicate::new(|n: &i64| n % 2 == 0).with_description("is_even");
//! assert_eq!(is_even.evaluate(&4).unwrap(), Verdict::True);
//! assert_eq!(is_even.description(), "is_even");
//!
//! let parse = Predicate::new(|s: &str| s.parse::<bool>());
//! assert!(parse.evaluate("maybe").is_err());
//! ```

use core::fmt;
use core::marker::PhantomData;
use std::borrow::Cow;

use tasklink_hooks::BoxError;

/// The outcome of evaluating a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The predicate produced no answer.
    Undetermined,
}

impl Verdict {
    /// Returns `true` only for [`Verdict::True`].
    #[must_use]
    pub fn is_truthy(self) -> bool {
        matches!(self, Self::True)
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Undetermined, Self::from)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Undetermined => f.write_str("undetermined"),
        }
    }
}

/// Conversion from a predicate closure's return value into a verdict.
pub trait IntoVerdict {
    /// Converts the value.
    ///
    /// # Errors
    ///
    /// Returns the predicate's own error, boxed.
    fn into_verdict(self) -> Result<Verdict, BoxError>;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Result<Verdict, BoxError> {
        Ok(self)
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Result<Verdict, BoxError> {
        Ok(self.into())
    }
}

impl IntoVerdict for Option<bool> {
    fn into_verdict(self) -> Result<Verdict, BoxError> {
        Ok(self.into())
    }
}

impl<V: Into<Verdict>, E: Into<BoxError>> IntoVerdict for Result<V, E> {
    fn into_verdict(self) -> Result<Verdict, BoxError> {
        self.map(Into::into).map_err(Into::into)
    }
}

/// Object-safe trait for type-erased predicates.
pub trait ErasedPredicate<I: ?Sized>: Send + Sync {
    /// Evaluates the predicate against the call input.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the wrapped closure.
    fn evaluate(&self, input: &I) -> Result<Verdict, BoxError>;

    /// Returns a human-readable description used in errors and logs.
    fn description(&self) -> &str;
}

impl<I: ?Sized> fmt::Debug for dyn ErasedPredicate<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedPredicate")
            .field("description", &self.description())
            .finish()
    }
}

/// Type alias for boxed predicates stored in condition tasks.
pub type BoxedPredicate<I> = Box<dyn ErasedPredicate<I>>;

/// A typed predicate over the call input.
///
/// # Type Parameters
///
/// - `I`: The call input type
/// - `F`: The predicate closure type
/// - `R`: The closure's return type (inferred)
pub struct Predicate<I: ?Sized, F, R> {
    func: F,
    description: Cow<'static, str>,
    _marker: PhantomData<fn(&I) -> R>,
}

impl<I, F, R> Predicate<I, F, R>
where
    I: ?Sized,
    F: Fn(&I) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    /// Creates a new predicate from a closure.
    ///
    /// The description defaults to the closure's type name.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self {
            func,
            description: Cow::Borrowed(core::any::type_name::<F>()),
            _marker: PhantomData,
        }
    }

    /// Replaces the description reported in errors and logs.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }
}

impl<I, F, R> ErasedPredicate<I> for Predicate<I, F, R>
where
    I: ?Sized,
    F: Fn(&I) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    fn evaluate(&self, input: &I) -> Result<Verdict, BoxError> {
        (self.func)(input).into_verdict()
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl<I: ?Sized, F, R> fmt::Debug for Predicate<I, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .field("input_type", &core::any::type_name::<I>())
            .finish()
    }
}
