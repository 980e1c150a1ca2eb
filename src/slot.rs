use std::cell::Cell;
use std::rc::Rc;

/// A unique identifier for one stored slot within its signal.
/// Assigned monotonically at connect time, so key order is subscription order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SlotKey(pub(crate) usize);

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// The untyped half of a slot: its identity and activity flag.
///
/// Exclusively owned by the signal core's storage. Connections observe it
/// through `Weak`, so an expired weak is exactly "slot removed".
pub(crate) struct SlotState {
    pub(crate) key: SlotKey,
    pub(crate) active: Cell<bool>,
}

impl SlotState {
    pub(crate) fn new(key: SlotKey) -> Self { Self { key, active: Cell::new(true) } }
}

/// The stored callable form of a slot.
pub type SlotFn<T> = Rc<dyn Fn(&T) + 'static>;

/// One subscription: shared state plus the callable invoked on emission.
pub(crate) struct Slot<T> {
    pub(crate) state: Rc<SlotState>,
    pub(crate) callback: SlotFn<T>,
}

/// Trait for types that can be converted into slot callables.
pub trait IntoSlot<T> {
    /// Convert this type into the callable invoked on each emission.
    fn into_slot(self) -> SlotFn<T>;
}

// Implementation for function types
impl<F, T> IntoSlot<T> for F
where F: Fn(&T) + 'static
{
    fn into_slot(self) -> SlotFn<T> { Rc::new(self) }
}

// Implementation for SlotFn itself
impl<T> IntoSlot<T> for SlotFn<T> {
    fn into_slot(self) -> SlotFn<T> { self }
}

impl<T> IntoSlot<T> for std::sync::mpsc::Sender<T>
where T: Clone + 'static
{
    fn into_slot(self) -> SlotFn<T> {
        Rc::new(move |value: &T| {
            let _ = self.send(value.clone()); // Ignore send errors
        })
    }
}

#[cfg(feature = "tokio")]
impl<T> IntoSlot<T> for tokio::sync::mpsc::UnboundedSender<T>
where T: Clone + 'static
{
    fn into_slot(self) -> SlotFn<T> {
        Rc::new(move |value: &T| {
            let _ = self.send(value.clone()); // Ignore send errors
        })
    }
}
