//! Task chains with lifecycle hooks and conditional branching.
//!
//! Tasks declare PRE and POST lifecycle hooks once per type, are linked into
//! chains with [`then`](prelude::TaskNode::then) and
//! [`preceded_by`](prelude::TaskNode::preceded_by), branch at runtime through
//! [`ConditionTask`](prelude::ConditionTask), and are driven from a
//! [`Pipeline`](prelude::Pipeline) root.
//!
//! # Example
//!
//! ```
//! use tasklink::prelude::*;
//!
//! let double = fn_task("double", |x: &i64| Ok(x * 2));
//! let add5 = fn_task("add5", |x: &i64| Ok(x + 5));
//! double.then(&add5);
//!
//! let pipeline = Pipeline::new("numbers").with_root(double);
//! assert_eq!(pipeline.invoke(&3).unwrap(), 6);
//! ```

pub use tasklink_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use tasklink_internal::prelude::*;
}
