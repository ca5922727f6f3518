//! Linkable task nodes.

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tasklink_hooks::{HookRegistry, PostTask, PreTask};

use crate::chain;
use crate::error::TaskError;
use crate::task::{Invocable, Linked, Task, TaskRef};

/// A [`Task`] together with its successor link.
///
/// Invoking a node fires the task type's PRE hooks, runs the task, then
/// fires its POST hooks with the same input. The hook table comes from the
/// global [`HookRegistry`] and is built on first invocation.
pub struct TaskNode<T: Task> {
    task: T,
    next: RwLock<Option<TaskRef<T::Input, T::Output>>>,
}

impl<T: Task> TaskNode<T> {
    /// Creates an unlinked node.
    #[must_use]
    pub fn new(task: T) -> Self {
        Self {
            task,
            next: RwLock::new(None),
        }
    }

    /// Creates an unlinked node behind an [`Arc`], ready for chaining.
    #[must_use]
    pub fn shared(task: T) -> Arc<Self> {
        Arc::new(Self::new(task))
    }

    /// Returns the wrapped task.
    #[must_use]
    pub fn task(&self) -> &T {
        &self.task
    }

    /// Links `next` after this node and returns `next`.
    ///
    /// Allows `a.then(&b).then(&c)` to build `a -> b -> c`. The link holds
    /// `next` strongly, so linking back into the chain creates a cycle that
    /// outlives its handles until one link is cleared.
    pub fn then<B>(&self, next: &Arc<B>) -> Arc<B>
    where
        B: Linked<T::Input, T::Output> + 'static,
    {
        chain::forward_link(self, next)
    }

    /// Links this node after `prev` and returns this node.
    pub fn preceded_by<A>(self: &Arc<Self>, prev: &A) -> Arc<Self>
    where
        A: Linked<T::Input, T::Output> + ?Sized,
    {
        chain::backward_link(self, prev)
    }
}

impl<T: Task> Invocable<T::Input, T::Output> for TaskNode<T> {
    fn name(&self) -> &str {
        self.task.name()
    }

    fn invoke(&self, input: &T::Input) -> Result<T::Output, TaskError> {
        let hooks = HookRegistry::global().hooks_for::<T>()?;

        let span = tracing::debug_span!("task", name = self.task.name());
        let _enter = span.enter();

        hooks.fire::<PreTask>(&self.task, input)?;
        let output = self.task.run(input).inspect_err(|err| {
            tracing::debug!(error = %err, "task run failed");
        })?;
        hooks.fire::<PostTask>(&self.task, input)?;

        Ok(output)
    }
}

impl<T: Task> Linked<T::Input, T::Output> for TaskNode<T> {
    fn next(&self) -> Option<TaskRef<T::Input, T::Output>> {
        self.next.read().clone()
    }

    fn set_next(
        &self,
        next: Option<TaskRef<T::Input, T::Output>>,
    ) -> Option<TaskRef<T::Input, T::Output>> {
        core::mem::replace(&mut *self.next.write(), next)
    }
}

impl<T: Task + fmt::Debug> fmt::Debug for TaskNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNode")
            .field("task", &self.task)
            .field("next", &self.next.read().as_ref().map(|next| next.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklink_hooks::Hooked;

    #[derive(Debug)]
    struct Square;

    impl Hooked for Square {
        type Input = i64;
    }

    impl Task for Square {
        type Output = i64;

        fn name(&self) -> &str {
            "square"
        }

        fn run(&self, input: &i64) -> Result<i64, TaskError> {
            Ok(input * input)
        }
    }

    #[test]
    fn invoke_runs_task() {
        let node = TaskNode::new(Square);
        assert_eq!(node.invoke(&7).unwrap(), 49);
        assert_eq!(Invocable::name(&node), "square");
    }

    #[test]
    fn new_node_is_unlinked() {
        let node = TaskNode::new(Square);
        assert!(node.next().is_none());
        assert!(node.clear_next().is_none());
    }

    #[test]
    fn set_next_returns_previous_link() {
        let a = TaskNode::shared(Square);
        let b = TaskNode::shared(Square);
        let c = TaskNode::shared(Square);

        assert!(a.set_next(Some(b.clone())).is_none());
        let previous = a.set_next(Some(c.clone())).unwrap();
        let previous_addr = Arc::as_ptr(&previous).cast::<()>();
        assert_eq!(previous_addr, Arc::as_ptr(&b).cast::<()>());

        let current = a.next().unwrap();
        assert_eq!(Arc::as_ptr(&current).cast::<()>(), Arc::as_ptr(&c).cast::<()>());
    }

    #[test]
    fn cycles_live_until_a_link_is_cleared() {
        let a = TaskNode::shared(Square);
        a.then(&a);
        let weak = Arc::downgrade(&a);
        drop(a);

        let a = weak.upgrade().expect("a cycle keeps its tasks alive");
        a.clear_next();
        drop(a);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn debug_shows_successor_name() {
        let a = TaskNode::shared(Square);
        a.then(&TaskNode::shared(Square));
        assert_eq!(
            format!("{a:?}"),
            "TaskNode { task: Square, next: Some(\"square\") }"
        );
    }
}
