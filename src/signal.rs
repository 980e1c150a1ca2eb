use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::connection::{Connection, Detach};
use crate::slot::{IntoSlot, Slot, SlotKey, SlotState};
use crate::terminator::{AutoTerminate, AutoTerminator};

/// A typed event source owning its subscriptions.
///
/// `T` is the payload every slot receives by reference; events with several
/// arguments use a tuple. A signal is an identity, not a value, so it does
/// not implement `Clone` - connections and terminators refer to one specific
/// signal's storage.
///
/// Emission is synchronous and runs on the calling thread, in subscription
/// order. Slots may freely re-enter the signal (connect, terminate, emit)
/// from inside a callback; see [`Signal::emit`] for the exact guarantees.
pub struct Signal<T = ()> {
    core: Rc<SignalCore<T>>,
}

/// The signal's internal state, shared weakly with every `Connection`.
pub(crate) struct SignalCore<T> {
    // Slots live here and only here. Each one is its own allocation behind
    // an Rc, so removing an entry never disturbs the identity of the others.
    slots: RefCell<BTreeMap<SlotKey, Slot<T>>>,
    next_key: Cell<usize>,
}

impl<T: 'static> Signal<T> {
    /// Creates a signal with no slots.
    pub fn new() -> Self { Self { core: Rc::new(SignalCore { slots: RefCell::new(BTreeMap::new()), next_key: Cell::new(0) }) } }

    /// Stores `listener` as a new slot at the end of the subscription order
    /// and returns a weakly referencing [`Connection`].
    ///
    /// The subscription is unmanaged: it lives until explicitly terminated or
    /// until the signal is dropped, whichever comes first.
    pub fn connect<L>(&self, listener: L) -> Connection
    where L: IntoSlot<T> {
        let key = self.core.allocate_key();
        let state = Rc::new(SlotState::new(key));
        let core: Rc<dyn Detach> = self.core.clone();
        let connection = Connection { slot: Rc::downgrade(&state), core: Rc::downgrade(&core) };
        self.core.slots.borrow_mut().insert(key, Slot { state, callback: listener.into_slot() });
        trace!("slot {} attached", key);
        connection
    }

    /// As [`Signal::connect`], but also registers the connection with `owner`
    /// so it is terminated automatically when `owner` is dropped.
    pub fn connect_owned<L>(&self, listener: L, owner: &AutoTerminator) -> Connection
    where L: IntoSlot<T> {
        let connection = self.connect(listener);
        owner.add(connection.clone());
        connection
    }

    /// Binds `method` to `owner` and subscribes the bound call, registering
    /// the connection with the owner's terminator.
    ///
    /// The owner is captured weakly: once it is gone the bound call is
    /// silently skipped, independently of the terminator sweep that removes
    /// the slot. An `owner` that has already expired never subscribes at all;
    /// the signal's storage is left untouched and the returned connection is
    /// the inert [`Connection::default`].
    ///
    /// ```
    /// use std::rc::Rc;
    /// use sigslot::{AutoTerminate, AutoTerminator, Signal};
    ///
    /// struct Counter {
    ///     hits: std::cell::Cell<u32>,
    ///     terminator: AutoTerminator,
    /// }
    ///
    /// impl Counter {
    ///     fn bump(&self, _: &u32) { self.hits.set(self.hits.get() + 1); }
    /// }
    ///
    /// impl AutoTerminate for Counter {
    ///     fn terminator(&self) -> &AutoTerminator { &self.terminator }
    /// }
    ///
    /// let sig = Signal::<u32>::new();
    /// let counter = Rc::new(Counter { hits: Default::default(), terminator: AutoTerminator::new() });
    /// sig.connect_method(Counter::bump, &Rc::downgrade(&counter));
    ///
    /// sig.emit(1);
    /// assert_eq!(counter.hits.get(), 1);
    /// ```
    pub fn connect_method<D, F>(&self, method: F, owner: &Weak<D>) -> Connection
    where
        D: AutoTerminate + 'static,
        F: Fn(&D, &T) + 'static,
    {
        let Some(strong) = owner.upgrade() else {
            return Connection::default();
        };
        let weak = owner.clone();
        let connection = self.connect(move |value: &T| {
            // the owner can already be mid-drop when its sweep has not yet
            // reached this slot
            if let Some(owner) = weak.upgrade() {
                method(&owner, value);
            }
        });
        strong.terminator().add(connection.clone());
        connection
    }

    /// Invokes every active slot with a borrow of `value`, in subscription
    /// order, each exactly once.
    ///
    /// Re-entrancy: a slot connected during the emission is not visited until
    /// the next one, and a slot terminated during the emission (including the
    /// executing one, or all of them via [`Signal::terminate_all`]) is not
    /// invoked after its removal.
    pub fn emit(&self, value: T) { self.core.emit(&value) }

    /// Number of currently stored slots. Terminated slots are already
    /// excluded, deactivated ones are included.
    pub fn slot_count(&self) -> usize { self.core.slots.borrow().len() }

    /// Removes every slot. Outstanding connections subsequently report
    /// terminated; the signal itself stays usable.
    pub fn terminate_all(&self) {
        debug!("terminating all {} slots", self.slot_count());
        self.core.clear();
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self { Self::new() }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("slots", &self.core.slots.borrow().len()).finish()
    }
}

impl<T> SignalCore<T> {
    fn allocate_key(&self) -> SlotKey {
        let key = SlotKey(self.next_key.get());
        self.next_key.set(key.0 + 1);
        key
    }

    fn emit(&self, value: &T) {
        // Snapshot the slots so listeners may connect or terminate
        // re-entrantly without corrupting the traversal. Upgrading the state
        // weak right before each call observes removals made mid-emission.
        let snapshot: Vec<_> = {
            let slots = self.slots.borrow();
            slots.values().map(|slot| (Rc::downgrade(&slot.state), slot.callback.clone())).collect()
        };
        trace!("emitting to {} slots", snapshot.len());
        for (state, callback) in snapshot {
            let Some(state) = state.upgrade() else { continue };
            if state.active.get() {
                callback(value);
            }
        }
    }

    fn clear(&self) {
        // End the borrow before the removed slots drop: a dropped callback
        // may own objects whose teardown re-enters this signal.
        let removed = std::mem::take(&mut *self.slots.borrow_mut());
        drop(removed);
    }
}

impl<T: 'static> Detach for SignalCore<T> {
    fn detach(&self, key: SlotKey) {
        let removed = self.slots.borrow_mut().remove(&key);
        if removed.is_some() {
            trace!("slot {} detached", key);
        }
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_slots() {
        let sig = Signal::<()>::new();
        let counter = Rc::new(Cell::new(0));

        // Connect two slots
        let _c1 = {
            let counter = counter.clone();
            sig.connect(move |_: &()| counter.set(counter.get() + 1))
        };
        let c2 = {
            let counter = counter.clone();
            sig.connect(move |_: &()| counter.set(counter.get() + 10))
        };

        // Emit - both slots should be invoked
        sig.emit(());
        assert_eq!(counter.get(), 11); // 1 + 10

        // Terminate one connection
        c2.terminate();

        // Emit again - only the first slot should be invoked
        sig.emit(());
        assert_eq!(counter.get(), 12); // 11 + 1 (only c1)
    }

    #[test]
    fn reentrant_connect_during_emit() {
        let sig = Rc::new(Signal::<()>::new());
        let counter = Rc::new(Cell::new(0));

        // A slot that connects and terminates another slot from inside the
        // callback; the traversal in progress must survive both.
        let sig2 = sig.clone();
        let counter2 = counter.clone();
        let _c = sig.connect(move |_: &()| {
            counter2.set(counter2.get() + 1);

            let fresh = sig2.connect(|_: &()| {});
            fresh.terminate();
        });

        sig.emit(());
        assert_eq!(counter.get(), 1);

        // Emit again to verify the signal is still intact
        sig.emit(());
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn slot_connected_mid_emission_fires_next_time() {
        let sig = Rc::new(Signal::<()>::new());
        let late = Rc::new(Cell::new(0));

        let sig2 = sig.clone();
        let late2 = late.clone();
        let _c = sig.connect(move |_: &()| {
            let late = late2.clone();
            sig2.connect(move |_: &()| late.set(late.get() + 1));
        });

        sig.emit(());
        assert_eq!(late.get(), 0); // not visited in the same emission

        sig.emit(());
        assert_eq!(late.get(), 1);
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn tokio_channel_slot() {
        let sig = Signal::<u32>::new();

        // Subscribe the channel sender - it receives each emitted payload
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u32>();
        let _connection = sig.connect(tx);

        sig.emit(7);
        assert_eq!(rx.try_recv().unwrap(), 7);

        sig.emit(8);
        assert_eq!(rx.try_recv().unwrap(), 8);

        // No more messages should be in the channel
        assert!(rx.try_recv().is_err());
    }
}
