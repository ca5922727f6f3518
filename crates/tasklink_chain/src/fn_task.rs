//! Tasks built from plain closures.

use core::fmt;
use core::marker::PhantomData;
use std::sync::Arc;

use tasklink_hooks::{BoxError, Hooked};

use crate::error::TaskError;
use crate::node::TaskNode;
use crate::task::Task;

/// A task whose body is a closure. It declares no hooks.
///
/// # Type Parameters
///
/// - `I`: The input type
/// - `O`: The output type
/// - `F`: The closure type
pub struct FnTask<I: ?Sized, O, F> {
    name: String,
    func: F,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O, F> FnTask<I, O, F>
where
    I: ?Sized + 'static,
    O: 'static,
    F: Fn(&I) -> Result<O, BoxError> + Send + Sync + 'static,
{
    /// Creates a task named `name` running `func`.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _marker: PhantomData,
        }
    }
}

impl<I, O, F> Hooked for FnTask<I, O, F>
where
    I: ?Sized + 'static,
    O: 'static,
    F: Fn(&I) -> Result<O, BoxError> + Send + Sync + 'static,
{
    type Input = I;
}

impl<I, O, F> Task for FnTask<I, O, F>
where
    I: ?Sized + 'static,
    O: 'static,
    F: Fn(&I) -> Result<O, BoxError> + Send + Sync + 'static,
{
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: &I) -> Result<O, TaskError> {
        (self.func)(input).map_err(TaskError::Domain)
    }
}

impl<I: ?Sized, O, F> fmt::Debug for FnTask<I, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("name", &self.name).finish()
    }
}

/// Wraps a closure into a linkable task node.
///
/// # Example
///
/// ```
/// use tasklink_chain::{Invocable, fn_task};
///
/// let double = fn_task("double", |x: &i64| Ok(x * 2));
/// let add5 = fn_task("add5", |x: &i64| Ok(x + 5));
/// double.then(&add5);
///
/// assert_eq!(double.invoke(&3).unwrap(), 6);
/// assert_eq!(add5.invoke(&3).unwrap(), 8);
/// ```
pub fn fn_task<I, O, F>(name: impl Into<String>, func: F) -> Arc<TaskNode<FnTask<I, O, F>>>
where
    I: ?Sized + 'static,
    O: 'static,
    F: Fn(&I) -> Result<O, BoxError> + Send + Sync + 'static,
{
    TaskNode::shared(FnTask::new(name, func))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Invocable;

    #[test]
    fn closure_error_becomes_domain_error() {
        let parse = fn_task("parse", |s: &str| Ok(s.parse::<u8>()?));

        assert_eq!(parse.invoke("42").unwrap(), 42);
        let err = parse.invoke("x").unwrap_err();
        assert!(err.as_domain().is_some());
        assert_eq!(err.to_string(), "invalid digit found in string");
    }

    #[test]
    fn name_is_kept() {
        let task = FnTask::new("noop", |_: &()| Ok(()));
        assert_eq!(task.name(), "noop");
        assert_eq!(format!("{task:?}"), "FnTask { name: \"noop\" }");
    }
}
