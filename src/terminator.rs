use std::cell::RefCell;

use tracing::trace;

use crate::connection::Connection;

/// A subscription set that terminates everything it owns when dropped.
///
/// Embed one as a field of any object that should unsubscribe all of its
/// registered connections when it goes away, and hand it to
/// [`Signal::connect_owned`](crate::Signal::connect_owned). Terminating a
/// connection whose slot or signal is already gone is a silent no-op, so the
/// sweep is safe under any drop order between the owner and the signals it
/// subscribed to.
#[derive(Default)]
pub struct AutoTerminator {
    connections: RefCell<Vec<Connection>>,
}

impl AutoTerminator {
    pub fn new() -> Self { Self::default() }

    /// Terminates every owned connection. The connections stay registered;
    /// terminating one twice has the same effect as once.
    pub fn terminate_all(&self) {
        trace!("terminating {} owned connections", self.connection_count());
        for connection in self.connections.borrow().iter() {
            connection.terminate();
        }
    }

    /// Number of registered connections, terminated ones included.
    pub fn connection_count(&self) -> usize { self.connections.borrow().len() }

    pub(crate) fn add(&self, connection: Connection) { self.connections.borrow_mut().push(connection); }
}

impl Drop for AutoTerminator {
    fn drop(&mut self) { self.terminate_all(); }
}

/// Marks an owner type embedding an [`AutoTerminator`], enabling the
/// method-connect form of subscription
/// ([`Signal::connect_method`](crate::Signal::connect_method)).
pub trait AutoTerminate {
    /// The terminator that owns this object's connections.
    fn terminator(&self) -> &AutoTerminator;
}

impl AutoTerminate for AutoTerminator {
    fn terminator(&self) -> &AutoTerminator { self }
}
