//! START/END lifecycle events for any task.

use tasklink_hooks::{HookDeclarations, HookMixin, PostTask, PreTask};

use crate::task::Task;

/// Hook mixin emitting an `info` event when a task starts and ends.
///
/// Mix it into a task type with `#[task_hooks(mixin = LifecycleLog)]` or
/// [`HookDeclarations::mixin`]. Its hooks run before the task's own hooks.
///
/// # Example
///
/// ```
/// use tasklink_chain::{Invocable, LifecycleLog, Task, TaskError, TaskNode};
/// use tasklink_hooks::task_hooks;
///
/// struct Greet;
///
/// #[task_hooks(input = str, mixin = LifecycleLog)]
/// impl Greet {}
///
/// impl Task for Greet {
///     type Output = String;
///
///     fn name(&self) -> &str {
///         "greet"
///     }
///
///     fn run(&self, who: &str) -> Result<String, TaskError> {
///         Ok(format!("hello {who}"))
///     }
/// }
///
/// assert_eq!(TaskNode::new(Greet).invoke("world").unwrap(), "hello world");
/// ```
pub struct LifecycleLog;

impl<T: Task> HookMixin<T> for LifecycleLog {
    fn declare(hooks: &mut HookDeclarations<'_, T>) {
        hooks
            .register::<PreTask, _>("lifecycle_start", |task, _| {
                tracing::info!(task = task.name(), "START");
                Ok(())
            })
            .register::<PostTask, _>("lifecycle_end", |task, _| {
                tracing::info!(task = task.name(), "END");
                Ok(())
            });
    }
}
