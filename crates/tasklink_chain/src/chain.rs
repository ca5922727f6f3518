//! Chain wiring between linkable tasks.
//!
//! Both link operations only set a successor slot; nothing is executed.
//! The [`Pipeline`](crate::Pipeline) driver invokes only its root, so
//! continuing along a chain is up to the caller, for instance through
//! [`successors`].
//!
//! Only linkable tasks can be chain operands. A condition has no successor
//! slot of its own:
//!
//! ```compile_fail
//! use tasklink_chain::{ConditionTask, Predicate, chain, fn_task};
//!
//! let double = fn_task("double", |x: &i64| Ok(x * 2));
//! let negate = fn_task("negate", |x: &i64| Ok(-x));
//! let route = ConditionTask::new(
//!     "route",
//!     Predicate::new(|x: &i64| *x > 0),
//!     double.clone(),
//!     negate.clone(),
//! );
//! chain::forward_link(&route, &double);
//! ```

use std::sync::Arc;

use crate::task::{Linked, TaskRef};

/// Sets `a`'s successor to `b` and returns `b`.
///
/// Only `a`'s link changes; `b`'s own successor is untouched.
pub fn forward_link<I, O, A, B>(a: &A, b: &Arc<B>) -> Arc<B>
where
    I: ?Sized,
    A: Linked<I, O> + ?Sized,
    B: Linked<I, O> + 'static,
{
    let link: TaskRef<I, O> = b.clone();
    a.set_next(Some(link));
    Arc::clone(b)
}

/// Sets `b`'s successor to `a` and returns `a`: `a` is preceded by `b`.
///
/// Only `b`'s link changes; `a`'s own successor is untouched.
pub fn backward_link<I, O, A, B>(a: &Arc<A>, b: &B) -> Arc<A>
where
    I: ?Sized,
    A: Linked<I, O> + 'static,
    B: Linked<I, O> + ?Sized,
{
    let link: TaskRef<I, O> = a.clone();
    b.set_next(Some(link));
    Arc::clone(a)
}

/// Returns an iterator over the successors of `start`, following `next`
/// links.
///
/// `start` itself is not yielded. Iteration ends at a task without a
/// successor, or before any task would be visited a second time.
pub fn successors<I, O, L>(start: &L) -> Successors<I, O>
where
    I: ?Sized,
    L: Linked<I, O> + ?Sized,
{
    Successors {
        next: start.next(),
        visited: vec![address(start)],
    }
}

/// Iterator returned by [`successors`].
pub struct Successors<I: ?Sized, O> {
    next: Option<TaskRef<I, O>>,
    visited: Vec<usize>,
}

impl<I: ?Sized, O> Iterator for Successors<I, O> {
    type Item = TaskRef<I, O>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let addr = address(&*current);
        if self.visited.contains(&addr) {
            return None;
        }
        self.visited.push(addr);
        self.next = current.next();
        Some(current)
    }
}

/// Identity of a task, independent of the handle type it is reached through.
fn address<T: ?Sized>(task: &T) -> usize {
    core::ptr::from_ref(task).cast::<()>().addr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fn_task;

    fn names(start: &dyn Linked<i32, i32>) -> Vec<String> {
        successors(start)
            .map(|task| task.name().to_string())
            .collect()
    }

    #[test]
    fn forward_link_returns_second_operand() {
        let a = fn_task("a", |x: &i32| Ok(*x));
        let b = fn_task("b", |x: &i32| Ok(*x));

        let returned = forward_link(&*a, &b);

        assert!(Arc::ptr_eq(&returned, &b));
        assert_eq!(a.next().map(|next| next.name().to_string()), Some("b".to_string()));
        assert!(b.next().is_none());
    }

    #[test]
    fn backward_link_returns_first_operand() {
        let a = fn_task("a", |x: &i32| Ok(*x));
        let b = fn_task("b", |x: &i32| Ok(*x));

        let returned = backward_link(&a, &*b);

        assert!(Arc::ptr_eq(&returned, &a));
        assert_eq!(b.next().map(|next| next.name().to_string()), Some("a".to_string()));
        assert!(a.next().is_none());
    }

    #[test]
    fn successors_walks_to_end() {
        let a = fn_task("a", |x: &i32| Ok(*x));
        let b = fn_task("b", |x: &i32| Ok(*x));
        let c = fn_task("c", |x: &i32| Ok(*x));
        a.then(&b).then(&c);

        assert_eq!(names(&*a), vec!["b", "c"]);
        assert!(names(&*c).is_empty());
    }

    #[test]
    fn successors_stops_on_cycle() {
        let a = fn_task("a", |x: &i32| Ok(*x));
        let b = fn_task("b", |x: &i32| Ok(*x));
        a.then(&b).then(&a);

        assert_eq!(names(&*a), vec!["b"]);
        assert_eq!(names(&*b), vec!["a"]);

        // Break the cycle so the nodes can be dropped.
        a.clear_next();
    }
}
