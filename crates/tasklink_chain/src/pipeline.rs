//! The pipeline driver.

use core::fmt;
use std::sync::Arc;

use crate::error::TaskError;
use crate::task::{Invocable, Linked, TaskRef};

/// A named driver holding a single root task.
///
/// Invoking the pipeline invokes the root and returns its result
/// unchanged. The root's successors are not walked.
///
/// Only linkable tasks can be roots:
///
/// ```compile_fail
/// use tasklink_chain::{ConditionTask, Pipeline, Predicate, fn_task};
///
/// let route = ConditionTask::new(
///     "route",
///     Predicate::new(|x: &i64| *x > 0),
///     fn_task("up", |x: &i64| Ok(x + 1)),
///     fn_task("down", |x: &i64| Ok(x - 1)),
/// );
/// let mut pipeline = Pipeline::new("p");
/// pipeline.register_root(std::sync::Arc::new(route));
/// ```
pub struct Pipeline<I: ?Sized + 'static, O: 'static> {
    name: String,
    root: Option<TaskRef<I, O>>,
}

impl<I: ?Sized + 'static, O: 'static> Pipeline<I, O> {
    /// Creates a pipeline without a root.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
        }
    }

    /// Sets the root task.
    #[must_use]
    pub fn with_root<R>(mut self, root: Arc<R>) -> Self
    where
        R: Linked<I, O> + 'static,
    {
        self.register_root(root);
        self
    }

    /// Registers the root task, returning the previous root.
    pub fn register_root<R>(&mut self, root: Arc<R>) -> Option<TaskRef<I, O>>
    where
        R: Linked<I, O> + 'static,
    {
        let root: TaskRef<I, O> = root;
        self.root.replace(root)
    }

    /// Returns the root task.
    #[must_use]
    pub fn root(&self) -> Option<&TaskRef<I, O>> {
        self.root.as_ref()
    }

    /// Returns whether a root task is registered.
    #[must_use]
    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Returns the pipeline's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the root task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NoRoot`] when no root is registered, otherwise
    /// whatever the root's invocation returns.
    pub fn invoke(&self, input: &I) -> Result<O, TaskError> {
        let Some(root) = &self.root else {
            return Err(TaskError::NoRoot {
                pipeline: self.name.clone(),
            });
        };

        tracing::info!(pipeline = %self.name, root = root.name(), "pipeline started");
        let result = root.invoke(input);
        match &result {
            Ok(_) => tracing::info!(pipeline = %self.name, "pipeline finished"),
            Err(err) => tracing::info!(pipeline = %self.name, error = %err, "pipeline failed"),
        }
        result
    }
}

impl<I: ?Sized + 'static, O: 'static> Invocable<I, O> for Pipeline<I, O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, input: &I) -> Result<O, TaskError> {
        Pipeline::invoke(self, input)
    }
}

impl<I: ?Sized + 'static, O: 'static> fmt::Debug for Pipeline<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("root", &self.root.as_ref().map(|root| root.name()))
            .finish()
    }
}
