//! Linked tasks, conditional branching and the pipeline driver.
//!
//! - [`task`] - The [`Task`] trait and the [`Invocable`] / [`Linked`]
//!   call-boundary traits
//! - [`node`] - [`TaskNode`], which fires lifecycle hooks around `run`
//! - [`chain`] - Forward and backward linking, successor iteration
//! - [`condition`] - [`ConditionTask`], selecting a successor at runtime
//! - [`predicate`] - Predicates and verdicts for conditions
//! - [`pipeline`] - [`Pipeline`], the driver invoking a root task
//! - [`fn_task`](mod@fn_task) - Tasks from plain closures
//! - [`lifecycle`] - The [`LifecycleLog`] hook mixin
//!
//! # Execution Model
//!
//! Everything runs synchronously on the caller's thread. Invoking a task
//! fires its PRE hooks, runs its body, then fires its POST hooks and returns
//! the body's result. Links between tasks are wiring only: neither a task
//! nor the pipeline walks the chain.
//!
//! # Example
//!
//! ```
//! use tasklink_chain::{ConditionTask, Invocable, Pipeline, Predicate, fn_task};
//!
//! let double = fn_task("double", |x: &i64| Ok(x * 2));
//! let add5 = fn_task("add5", |x: &i64| Ok(x + 5));
//! double.then(&add5);
//!
//! let pipeline = Pipeline::new("numbers").with_root(double.clone());
//! assert_eq!(pipeline.invoke(&3).unwrap(), 6);
//!
//! let route = ConditionTask::new(
//!     "route",
//!     Predicate::new(|x: &i64| *x > 10),
//!     add5,
//!     double,
//! );
//! assert_eq!(route.invoke(&20).unwrap(), 25);
//! assert_eq!(route.invoke(&4).unwrap(), 8);
//! ```

pub mod chain;
pub mod condition;
pub mod error;
pub mod fn_task;
pub mod lifecycle;
pub mod node;
pub mod pipeline;
pub mod predicate;
pub mod task;

pub use condition::{Branch, ConditionTask};
pub use error::{ResolutionError, TaskError};
pub use fn_task::{FnTask, fn_task};
pub use lifecycle::LifecycleLog;
pub use node::TaskNode;
pub use pipeline::Pipeline;
pub use predicate::{BoxedPredicate, ErasedPredicate, IntoVerdict, Predicate, Verdict};
pub use task::{Invocable, Linked, Successor, Task, TaskRef};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::chain::{backward_link, forward_link, successors};
    pub use crate::condition::*;
    pub use crate::error::*;
    pub use crate::fn_task::*;
    pub use crate::lifecycle::*;
    pub use crate::node::*;
    pub use crate::pipeline::*;
    pub use crate::predicate::*;
    pub use crate::task::*;
}
