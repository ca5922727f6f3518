//! Property tests for hook firing order and short-circuiting.

use core::cell::RefCell;

use proptest::prelude::*;
use tasklink_hooks::{HookRegistry, PhaseId, PostTask, PreTask, task_hooks};

const HOOKS: usize = 5;

/// Input describing which hook fails, plus a trace of hook indices.
struct Plan {
    fail_at: Option<usize>,
    trace: RefCell<Vec<usize>>,
}

impl Plan {
    fn step(&self, index: usize) -> Result<(), String> {
        self.trace.borrow_mut().push(index);
        if self.fail_at == Some(index) {
            return Err(format!("hook {index} failed"));
        }
        Ok(())
    }
}

struct Base;

#[task_hooks]
impl Base {
    #[pre_task]
    fn h0(&self, plan: &Plan) -> Result<(), String> {
        plan.step(0)
    }

    #[pre_task]
    fn h1(&self, plan: &Plan) -> Result<(), String> {
        plan.step(1)
    }
}

struct Stack {
    base: Base,
}

#[task_hooks(inherit = base)]
impl Stack {
    #[pre_task]
    fn h2(&self, plan: &Plan) -> Result<(), String> {
        plan.step(2)
    }

    #[pre_task]
    fn h3(&self, plan: &Plan) -> Result<(), String> {
        plan.step(3)
    }

    #[pre_task]
    #[post_task]
    fn h4(&self, plan: &Plan) -> Result<(), String> {
        plan.step(4)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Hooks run in table order and stop right after the first failure.
    #[test]
    fn firing_stops_at_first_failure(fail_at in proptest::option::of(0..HOOKS + 2)) {
        let registry = HookRegistry::new();
        let table = registry.hooks_for::<Stack>().unwrap();
        let plan = Plan { fail_at, trace: RefCell::new(Vec::new()) };
        let stack = Stack { base: Base };

        let result = table.fire::<PreTask>(&stack, &plan);

        let ran = match fail_at {
            Some(index) if index < HOOKS => index + 1,
            _ => HOOKS,
        };
        prop_assert_eq!(plan.trace.take(), (0..ran).collect::<Vec<_>>());
        match fail_at {
            Some(index) if index < HOOKS => {
                let err = result.unwrap_err();
                prop_assert_eq!(err.hook, format!("h{index}"));
                prop_assert_eq!(err.phase, PhaseId::of::<PreTask>());
            }
            _ => prop_assert!(result.is_ok()),
        }
    }

    /// The post phase holds only the hook tagged for both phases.
    #[test]
    fn post_phase_runs_only_dual_hook(fail_at in proptest::option::of(0..HOOKS)) {
        let table = HookRegistry::new().hooks_for::<Stack>().unwrap();
        let plan = Plan { fail_at, trace: RefCell::new(Vec::new()) };

        let result = table.fire::<PostTask>(&Stack { base: Base }, &plan);

        prop_assert_eq!(plan.trace.take(), vec![4]);
        prop_assert_eq!(result.is_err(), fail_at == Some(4));
    }
}
