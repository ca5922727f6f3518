//! Hook tables and the registry that builds them.
//!
//! The [`HookRegistry`] is an arena of per-type [`HookTable`]s keyed by type
//! identity. A table is built the first time it is requested and never
//! changes afterwards, so every instance of a type shares the same
//! read-only table.
//!
//! # Thread Safety
//!
//! Tables are stored behind a [`RwLock`]. Lookups of an existing table take
//! the read lock only; building happens outside the lock, and if two threads
//! race to build the same table the first stored one wins.

use core::any::{Any, TypeId};
use core::cell::RefCell;
use core::fmt;
use std::sync::{Arc, LazyLock};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::declare::{HookDeclarations, HookEntry, Hooked};
use crate::error::{HookError, HookRegistrationError};
use crate::phase::{Phase, PhaseId};

static GLOBAL: LazyLock<HookRegistry> = LazyLock::new(HookRegistry::new);

thread_local! {
    /// Types whose tables are being built on this thread, innermost last.
    static BUILDING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

// ─────────────────────────────────────────────────────────────────────────────
// HookTable
// ─────────────────────────────────────────────────────────────────────────────

/// The flattened, ordered hooks of one type, per phase.
pub struct HookTable<T: Hooked> {
    phases: HashMap<PhaseId, Vec<HookEntry<T>>>,
}

impl<T: Hooked> HookTable<T> {
    pub(crate) fn new(phases: HashMap<PhaseId, Vec<HookEntry<T>>>) -> Self {
        Self { phases }
    }

    pub(crate) fn phases(&self) -> impl Iterator<Item = (&PhaseId, &Vec<HookEntry<T>>)> {
        self.phases.iter()
    }

    /// Returns the hooks of a phase in firing order.
    #[must_use]
    pub fn hooks(&self, phase: PhaseId) -> &[HookEntry<T>] {
        self.phases.get(&phase).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the number of hooks registered for the phase.
    #[must_use]
    pub fn hook_count(&self, phase: PhaseId) -> usize {
        self.hooks(phase).len()
    }

    /// Returns the hook names of a phase in firing order.
    #[must_use]
    pub fn hook_names(&self, phase: PhaseId) -> Vec<&str> {
        self.hooks(phase).iter().map(HookEntry::name).collect()
    }

    /// Checks if a hook with the given name exists on the phase.
    #[must_use]
    pub fn contains_hook(&self, phase: PhaseId, name: &str) -> bool {
        self.hooks(phase).iter().any(|entry| entry.name() == name)
    }

    /// Fires every hook of phase `P` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing hook and returns its error; later hooks of
    /// the phase do not run.
    pub fn fire<P: Phase>(&self, instance: &T, input: &T::Input) -> Result<(), HookError> {
        self.fire_phase(PhaseId::of::<P>(), instance, input)
    }

    /// Fires every hook of `phase` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing hook and returns its error.
    pub fn fire_phase(
        &self,
        phase: PhaseId,
        instance: &T,
        input: &T::Input,
    ) -> Result<(), HookError> {
        for entry in self.hooks(phase) {
            tracing::trace!(hook = entry.name(), %phase, origin = entry.origin(), "firing hook");
            entry
                .call(instance, input)
                .map_err(|source| HookError {
                    owner: core::any::type_name::<T>(),
                    phase,
                    hook: entry.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl<T: Hooked> fmt::Debug for HookTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (phase, entries) in &self.phases {
            let names: Vec<&str> = entries.iter().map(HookEntry::name).collect();
            map.entry(&phase.name(), &names);
        }
        map.finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistry
// ─────────────────────────────────────────────────────────────────────────────

/// Arena of per-type hook tables.
///
/// Task invocation uses the process-wide [`global`](Self::global) registry.
/// Independent registries can be created for isolated use; each builds its
/// own tables.
#[derive(Default)]
pub struct HookRegistry {
    /// Maps type ID to an `Arc<HookTable<T>>` for that type.
    tables: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl HookRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static HookRegistry {
        &GLOBAL
    }

    /// Returns the hook table of `T`, building it on first request.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` (or a type it inherits from) declares a
    /// duplicate hook name on one phase, or if inheritance is cyclic. Failed
    /// builds are not cached.
    pub fn hooks_for<T: Hooked>(&self) -> Result<Arc<HookTable<T>>, HookRegistrationError> {
        if let Some(table) = self.lookup::<T>() {
            return Ok(table);
        }

        let table = Arc::new(self.build::<T>()?);
        tracing::debug!(
            owner = core::any::type_name::<T>(),
            table = ?table,
            "hook table built"
        );

        let mut tables = self.tables.write();
        let stored = tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::clone(&table) as Arc<dyn Any + Send + Sync>);
        Ok(Arc::clone(stored)
            .downcast::<HookTable<T>>()
            .unwrap_or(table))
    }

    /// Returns whether the table of `T` has been built.
    #[must_use]
    pub fn is_built<T: Hooked>(&self) -> bool {
        self.tables.read().contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of built tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns whether no table has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    fn lookup<T: Hooked>(&self) -> Option<Arc<HookTable<T>>> {
        let tables = self.tables.read();
        let table = tables.get(&TypeId::of::<T>())?;
        Arc::clone(table).downcast::<HookTable<T>>().ok()
    }

    fn build<T: Hooked>(&self) -> Result<HookTable<T>, HookRegistrationError> {
        let _guard = BuildGuard::enter::<T>()?;
        let mut declarations = HookDeclarations::new(self);
        T::declare_hooks(&mut declarations);
        declarations.build()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("tables", &self.len())
            .finish()
    }
}

/// Marks a type as being built on this thread until dropped.
struct BuildGuard(TypeId);

impl BuildGuard {
    fn enter<T: 'static>() -> Result<Self, HookRegistrationError> {
        let id = TypeId::of::<T>();
        BUILDING.with_borrow_mut(|stack| {
            if stack.contains(&id) {
                return Err(HookRegistrationError::CyclicInheritance {
                    owner: core::any::type_name::<T>(),
                });
            }
            stack.push(id);
            Ok(Self(id))
        })
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        BUILDING.with_borrow_mut(|stack| {
            if let Some(pos) = stack.iter().rposition(|id| *id == self.0) {
                stack.remove(pos);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::HookMixin;
    use crate::phase::{PostTask, PreTask};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        log: Log,
    }

    impl Recorder {
        fn push(&self, line: impl Into<String>) {
            self.log.lock().unwrap().push(line.into());
        }
    }

    impl Hooked for Recorder {
        type Input = i32;

        fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
            hooks
                .register::<PreTask, _>("p1", |this, input| {
                    this.push(format!("p1:{input}"));
                    Ok(())
                })
                .register::<PreTask, _>("p2", |this, _| {
                    this.push("p2");
                    Ok(())
                })
                .register::<PostTask, _>("q1", |this, input| {
                    this.push(format!("q1:{input}"));
                    Ok(())
                });
        }
    }

    struct Plain;
    impl Hooked for Plain {
        type Input = i32;
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let registry = HookRegistry::new();
        let table = registry.hooks_for::<Recorder>().unwrap();
        let recorder = Recorder {
            log: Log::default(),
        };

        table.fire::<PreTask>(&recorder, &7).unwrap();
        table.fire::<PostTask>(&recorder, &7).unwrap();

        assert_eq!(*recorder.log.lock().unwrap(), vec!["p1:7", "p2", "q1:7"]);
    }

    #[test]
    fn table_is_built_once_and_shared() {
        let registry = HookRegistry::new();
        assert!(!registry.is_built::<Recorder>());

        let first = registry.hooks_for::<Recorder>().unwrap();
        let second = registry.hooks_for::<Recorder>().unwrap();

        assert!(registry.is_built::<Recorder>());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn type_without_hooks_has_empty_table() {
        let table = HookRegistry::new().hooks_for::<Plain>().unwrap();
        assert_eq!(table.hook_count(PhaseId::of::<PreTask>()), 0);
        assert_eq!(table.hook_count(PhaseId::of::<PostTask>()), 0);
        assert!(table.fire::<PreTask>(&Plain, &1).is_ok());
    }

    #[test]
    fn failing_hook_aborts_remaining_hooks() {
        struct Strict {
            log: Log,
        }
        impl Hooked for Strict {
            type Input = i32;
            fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
                hooks
                    .register::<PreTask, _>("reject", |_, _| Err("rejected".into()))
                    .register::<PreTask, _>("never", |this: &Strict, _| {
                        this.log.lock().unwrap().push("never".to_string());
                        Ok(())
                    });
            }
        }

        let table = HookRegistry::new().hooks_for::<Strict>().unwrap();
        let strict = Strict {
            log: Log::default(),
        };
        let err = table.fire::<PreTask>(&strict, &0).unwrap_err();

        assert_eq!(err.hook, "reject");
        assert_eq!(err.phase, PhaseId::of::<PreTask>());
        assert!(strict.log.lock().unwrap().is_empty());
    }

    #[test]
    fn duplicate_name_on_same_phase_fails_build() {
        struct Dup;
        impl Hooked for Dup {
            type Input = ();
            fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
                hooks
                    .register::<PreTask, _>("same", |_, _| Ok(()))
                    .register::<PreTask, _>("same", |_, _| Ok(()));
            }
        }

        let registry = HookRegistry::new();
        let err = registry.hooks_for::<Dup>().unwrap_err();
        assert!(matches!(
            err,
            HookRegistrationError::DuplicateName { ref name, .. } if name == "same"
        ));
        assert!(!registry.is_built::<Dup>(), "failed builds are not cached");
    }

    #[test]
    fn same_name_on_different_phases_allowed() {
        struct Both;
        impl Hooked for Both {
            type Input = ();
            fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
                hooks.register::<(PreTask, PostTask), _>("trace", |_, _| Ok(()));
            }
        }

        let table = HookRegistry::new().hooks_for::<Both>().unwrap();
        assert!(table.contains_hook(PhaseId::of::<PreTask>(), "trace"));
        assert!(table.contains_hook(PhaseId::of::<PostTask>(), "trace"));
    }

    #[test]
    fn cyclic_inheritance_is_reported() {
        struct Ouroboros {
            tail: Option<Box<Ouroboros>>,
        }
        impl Hooked for Ouroboros {
            type Input = ();
            fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
                hooks.inherit(|this: &Self| this.tail.as_deref().unwrap_or(this));
            }
        }

        let err = HookRegistry::new().hooks_for::<Ouroboros>().unwrap_err();
        assert!(matches!(err, HookRegistrationError::CyclicInheritance { .. }));
        BUILDING.with_borrow(|stack| assert!(stack.is_empty()));
    }

    #[test]
    fn mixin_hooks_precede_own_hooks() {
        struct Banner;
        impl HookMixin<Late> for Banner {
            fn declare(hooks: &mut HookDeclarations<'_, Late>) {
                hooks.register::<PreTask, _>("banner", |_, _| Ok(()));
            }
        }

        struct Late;
        impl Hooked for Late {
            type Input = ();
            fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
                hooks.register::<PreTask, _>("own", |_, _| Ok(()));
                hooks.mixin::<Banner>();
            }
        }

        let table = HookRegistry::new().hooks_for::<Late>().unwrap();
        let phase = PhaseId::of::<PreTask>();
        assert_eq!(table.hook_names(phase), vec!["banner", "own"]);
        assert!(table.hooks(phase)[0].origin().contains("Banner"));
    }
}
