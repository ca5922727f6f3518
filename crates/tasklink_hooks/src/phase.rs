//! Lifecycle phase markers.
//!
//! A phase is identified by a marker type implementing [`Phase`], wrapped in a
//! [`PhaseId`] for storage and lookup. Two phases exist: [`PreTask`] fires
//! before a task's `run`, [`PostTask`] after it returns successfully.

use core::any::TypeId;
use core::fmt;

/// Identifier for a lifecycle phase, derived from a marker type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseId {
    type_id: TypeId,
    name: &'static str,
}

impl PhaseId {
    /// Creates a `PhaseId` for the given phase marker type.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklink_hooks::{PhaseId, PreTask};
    ///
    /// let phase = PhaseId::of::<PreTask>();
    /// assert_eq!(phase.name(), "pre_task");
    /// ```
    #[must_use]
    pub fn of<P: Phase>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            name: P::NAME,
        }
    }

    /// Returns the underlying `TypeId`.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the phase name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Phase Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Marker trait for lifecycle phase types.
pub trait Phase: 'static {
    /// Short name of the phase.
    const NAME: &'static str;
}

/// Marker type for hooks fired before a task's `run`.
///
/// Hooks receive the task instance and the call input.
pub struct PreTask;
impl Phase for PreTask {
    const NAME: &'static str = "pre_task";
}

/// Marker type for hooks fired after a task's `run` returns successfully.
///
/// Hooks receive the call input, not the result. When `run` fails these
/// hooks do not fire.
pub struct PostTask;
impl Phase for PostTask {
    const NAME: &'static str = "post_task";
}

// ─────────────────────────────────────────────────────────────────────────────
// IntoPhaseIds Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Types that can be converted into a list of phase IDs.
///
/// Implemented for single phases and for pairs, so one hook can be
/// registered on both phases in a single call.
pub trait IntoPhaseIds {
    /// Returns the phase IDs for this type.
    fn phase_ids() -> Vec<PhaseId>;
}

impl<P: Phase> IntoPhaseIds for P {
    fn phase_ids() -> Vec<PhaseId> {
        vec![PhaseId::of::<P>()]
    }
}

impl<A: Phase, B: Phase> IntoPhaseIds for (A, B) {
    fn phase_ids() -> Vec<PhaseId> {
        vec![PhaseId::of::<A>(), PhaseId::of::<B>()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_id_equality() {
        assert_eq!(PhaseId::of::<PreTask>(), PhaseId::of::<PreTask>());
        assert_ne!(PhaseId::of::<PreTask>(), PhaseId::of::<PostTask>());
    }

    #[test]
    fn phase_id_display_uses_name() {
        assert_eq!(PhaseId::of::<PostTask>().to_string(), "post_task");
    }

    #[test]
    fn phase_id_type_id() {
        assert_eq!(PhaseId::of::<PreTask>().type_id(), TypeId::of::<PreTask>());
    }

    #[test]
    fn into_phase_ids_pair_keeps_order() {
        let ids = <(PreTask, PostTask)>::phase_ids();
        assert_eq!(ids, vec![PhaseId::of::<PreTask>(), PhaseId::of::<PostTask>()]);
    }
}
