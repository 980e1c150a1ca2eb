use std::rc::Weak;

use tracing::trace;

use crate::slot::{SlotKey, SlotState};

/// Removal half of a signal core, type-erased so that one `Connection` type
/// can refer to signals of any payload type.
pub(crate) trait Detach {
    fn detach(&self, key: SlotKey);
}

/// Sentinel core for connections that were never attached.
struct Detached;

impl Detach for Detached {
    fn detach(&self, _key: SlotKey) {}
}

/// A handle for terminating and inspecting exactly one subscription.
///
/// Holding a `Connection` keeps nothing alive: both the slot and the signal
/// core are observed through `Weak` references, upgraded only for the
/// duration of each operation. Once the slot is removed by any path, or the
/// signal is dropped, the connection is permanently terminated and every
/// operation on it degrades to a safe no-op.
#[derive(Clone)]
pub struct Connection {
    pub(crate) slot: Weak<SlotState>,
    pub(crate) core: Weak<dyn Detach>,
}

impl Default for Connection {
    /// The inert connection: already terminated, never attached to a signal.
    fn default() -> Self { Self { slot: Weak::new(), core: Weak::<Detached>::new() } }
}

impl Connection {
    /// Terminates the connection, removing the slot from its signal so it is
    /// never invoked again.
    ///
    /// A no-op if the signal was dropped or the slot has already been removed
    /// by another path. Double termination is legal and silent: the explicit
    /// and the owner-drop paths may both reach the same slot.
    pub fn terminate(&self) {
        if let Some(slot) = self.slot.upgrade() {
            if let Some(core) = self.core.upgrade() {
                trace!("terminating slot {}", slot.key);
                core.detach(slot.key);
            }
        }
    }

    /// Checks whether the slot is still stored inside a living signal.
    pub fn is_terminated(&self) -> bool { self.slot.upgrade().is_none() }

    /// Sets the slot's active flag. A deactivated slot stays subscribed,
    /// still counted and reactivatable, but is skipped during emission.
    /// No-op once terminated.
    pub fn activate(&self, active: bool) {
        if let Some(slot) = self.slot.upgrade() {
            slot.active.set(active);
        }
    }

    /// Checks whether the slot will be invoked when the signal is emitted.
    /// Returns false once terminated.
    pub fn is_active(&self) -> bool {
        match self.slot.upgrade() {
            Some(slot) => slot.active.get(),
            None => false,
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("terminated", &self.is_terminated()).field("active", &self.is_active()).finish()
    }
}
