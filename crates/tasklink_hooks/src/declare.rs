//! Hook declarations collected once per type.
//!
//! A type opts into lifecycle hooks by implementing [`Hooked`]. Its
//! [`declare_hooks`](Hooked::declare_hooks) function runs exactly once, when
//! the type's table is first requested from a
//! [`HookRegistry`](crate::HookRegistry), and fills a [`HookDeclarations`]
//! builder:
//!
//! - [`inherit`](HookDeclarations::inherit) pulls in the full hook table of
//!   a type the declaring type is composed from
//! - [`mixin`](HookDeclarations::mixin) pulls in a reusable [`HookMixin`]
//! - [`register`](HookDeclarations::register) adds the type's own hooks
//!
//! Inherited and mixed-in hooks always precede own hooks, whatever order the
//! calls are made in. Entries that arrive twice through different ancestors
//! are kept once.
//!
//! # Example
//!
//! ```
//! use tasklink_hooks::{HookDeclarations, HookRegistry, Hooked, PhaseId, PreTask};
//!
//! struct Audit;
//!
//! impl Hooked for Audit {
//!     type Input = u32;
//!
//!     fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
//!         hooks.register::<PreTask, _>("check_quota", |_audit, amount| {
//!             if *amount > 100 {
//!                 return Err("quota exceeded".into());
//!             }
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let table = HookRegistry::new().hooks_for::<Audit>().unwrap();
//! assert_eq!(table.hook_names(PhaseId::of::<PreTask>()), vec!["check_quota"]);
//! assert!(table.fire::<PreTask>(&Audit, &7).is_ok());
//! assert!(table.fire::<PreTask>(&Audit, &700).is_err());
//! ```

use core::any::TypeId;
use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{BoxError, HookRegistrationError};
use crate::phase::{IntoPhaseIds, PhaseId};
use crate::registry::{HookRegistry, HookTable};

/// A type that carries lifecycle hooks.
///
/// The default declaration registers nothing, so implementing the trait
/// with only `Input` yields an empty table. Prefer the
/// [`task_hooks`](crate::task_hooks) attribute for declaring hooks from
/// tagged methods.
pub trait Hooked: Sized + Send + Sync + 'static {
    /// The call input hooks receive alongside the instance.
    type Input: ?Sized + 'static;

    /// Declares the hooks of this type.
    fn declare_hooks(hooks: &mut HookDeclarations<'_, Self>) {
        let _ = hooks;
    }
}

/// A reusable bundle of hooks that any compatible type can mix in.
pub trait HookMixin<T: Hooked>: 'static {
    /// Declares the mixin's hooks on behalf of `T`.
    fn declare(hooks: &mut HookDeclarations<'_, T>);
}

/// Type-erased hook function for instances of `T`.
pub(crate) type HookFn<T> =
    Arc<dyn Fn(&T, &<T as Hooked>::Input) -> Result<(), BoxError> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// HookEntry
// ─────────────────────────────────────────────────────────────────────────────

/// A registered hook together with where it was declared.
pub struct HookEntry<T: Hooked> {
    /// Type (or mixin) that declared the hook; part of the dedup key.
    origin: TypeId,
    origin_name: &'static str,
    name: Cow<'static, str>,
    hook: HookFn<T>,
}

impl<T: Hooked> HookEntry<T> {
    /// Returns the hook's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the type or mixin that declared the hook.
    #[must_use]
    pub fn origin(&self) -> &'static str {
        self.origin_name
    }

    /// Calls the hook.
    ///
    /// # Errors
    ///
    /// Returns whatever error the hook raises.
    pub fn call(&self, instance: &T, input: &T::Input) -> Result<(), BoxError> {
        (self.hook)(instance, input)
    }

    fn same_declaration(&self, other: &Self) -> bool {
        self.origin == other.origin && self.name == other.name
    }

    fn retagged(mut self, origin: TypeId, origin_name: &'static str) -> Self {
        self.origin = origin;
        self.origin_name = origin_name;
        self
    }
}

impl<T: Hooked> Clone for HookEntry<T> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            origin_name: self.origin_name,
            name: self.name.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<T: Hooked> fmt::Debug for HookEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("name", &self.name)
            .field("origin", &self.origin_name)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookDeclarations
// ─────────────────────────────────────────────────────────────────────────────

/// Builder that collects the hooks of one type.
///
/// Obtained only through [`Hooked::declare_hooks`] and [`HookMixin::declare`].
pub struct HookDeclarations<'r, T: Hooked> {
    registry: &'r HookRegistry,
    inherited: HashMap<PhaseId, Vec<HookEntry<T>>>,
    own: HashMap<PhaseId, Vec<HookEntry<T>>>,
    error: Option<HookRegistrationError>,
}

impl<'r, T: Hooked> HookDeclarations<'r, T> {
    pub(crate) fn new(registry: &'r HookRegistry) -> Self {
        Self {
            registry,
            inherited: HashMap::new(),
            own: HashMap::new(),
            error: None,
        }
    }

    /// Registers one of the type's own hooks on one or more phases.
    ///
    /// # Type Parameters
    ///
    /// * `P` - Phase marker type(s). A single phase or a pair.
    /// * `F` - The hook function type (inferred)
    ///
    /// Registering the same name twice on one phase makes the table build
    /// fail with [`HookRegistrationError::DuplicateName`].
    pub fn register<P, F>(&mut self, name: impl Into<Cow<'static, str>>, hook: F) -> &mut Self
    where
        P: IntoPhaseIds,
        F: Fn(&T, &T::Input) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let name = name.into();
        let hook: HookFn<T> = Arc::new(hook);

        for phase in P::phase_ids() {
            let entries = self.own.entry(phase).or_default();
            if entries.iter().any(|entry| entry.name == name) {
                self.record(HookRegistrationError::DuplicateName {
                    owner: core::any::type_name::<T>(),
                    phase,
                    name: name.to_string(),
                });
                continue;
            }
            entries.push(HookEntry {
                origin: TypeId::of::<T>(),
                origin_name: core::any::type_name::<T>(),
                name: name.clone(),
                hook: Arc::clone(&hook),
            });
        }
        self
    }

    /// Inherits every hook of `P`, reached from an instance of `T` through
    /// `project`.
    ///
    /// `P`'s table is built (once) if it does not exist yet. Its hooks keep
    /// their order and run against the projected value.
    pub fn inherit<P, F>(&mut self, project: F) -> &mut Self
    where
        P: Hooked<Input = T::Input>,
        F: Fn(&T) -> &P + Send + Sync + 'static,
    {
        let parent = match self.registry.hooks_for::<P>() {
            Ok(parent) => parent,
            Err(err) => {
                self.record(err);
                return self;
            }
        };
        let project = Arc::new(project);

        for (phase, entries) in parent.phases() {
            for entry in entries {
                let hook = Arc::clone(&entry.hook);
                let project = Arc::clone(&project);
                let lifted: HookFn<T> =
                    Arc::new(move |this: &T, input: &T::Input| hook(project(this), input));
                self.push_inherited(
                    *phase,
                    HookEntry {
                        origin: entry.origin,
                        origin_name: entry.origin_name,
                        name: entry.name.clone(),
                        hook: lifted,
                    },
                );
            }
        }
        self
    }

    /// Mixes in the hooks of `M`.
    ///
    /// Mixed-in hooks are attributed to `M`, so a mixin reached through
    /// several ancestors runs once.
    pub fn mixin<M: HookMixin<T>>(&mut self) -> &mut Self {
        let mut nested = HookDeclarations::new(self.registry);
        M::declare(&mut nested);

        if let Some(err) = nested.error {
            self.record(err);
        }
        let own_origin = TypeId::of::<T>();
        for (phase, entries) in nested.inherited.into_iter().chain(nested.own) {
            for entry in entries {
                let entry = if entry.origin == own_origin {
                    entry.retagged(TypeId::of::<M>(), core::any::type_name::<M>())
                } else {
                    entry
                };
                self.push_inherited(phase, entry);
            }
        }
        self
    }

    fn push_inherited(&mut self, phase: PhaseId, entry: HookEntry<T>) {
        let entries = self.inherited.entry(phase).or_default();
        if !entries.iter().any(|existing| existing.same_declaration(&entry)) {
            entries.push(entry);
        }
    }

    fn record(&mut self, err: HookRegistrationError) {
        self.error.get_or_insert(err);
    }

    /// Flattens the declarations into a table: inherited hooks first, then
    /// own hooks, per phase.
    pub(crate) fn build(self) -> Result<HookTable<T>, HookRegistrationError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut phases = self.inherited;
        for (phase, own) in self.own {
            let entries = phases.entry(phase).or_default();
            for entry in own {
                if !entries.iter().any(|existing| existing.same_declaration(&entry)) {
                    entries.push(entry);
                }
            }
        }
        Ok(HookTable::new(phases))
    }
}
