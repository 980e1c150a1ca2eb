/*!
Typed signal/slot connections with automatic teardown.

A [`Signal<T>`] is an in-process event channel: slots subscribe through
[`Signal::connect`] and are invoked synchronously, in subscription order,
every time the signal is emitted. The point of the crate is the connection
lifecycle, not the dispatch: a subscription can be torn down from three
independent directions - explicitly through its [`Connection`], automatically
when the subscriber's owning object is dropped ([`AutoTerminator`]), or
implicitly when the signal itself is dropped - and any interleaving of the
three is safe. No callback is ever invoked after its captured context is
gone, and no teardown path ever faults because another one got there first.

# Basic usage

```rust
use sigslot::Signal;

let sig = Signal::<i32>::new();
let connection = sig.connect(|value: &i32| println!("observed {value}"));

sig.emit(1); // prints "observed 1"

connection.terminate();
sig.emit(2); // prints nothing
```

Events with several arguments use a tuple payload; slots receive it by
reference, so payload types do not need to be `Clone`.

# Automatic teardown

Any object can own its subscriptions by embedding an [`AutoTerminator`]:
when the object is dropped, every connection registered with it is
terminated, whether or not the signals are still alive.

```rust
use sigslot::{AutoTerminator, Signal};

struct Widget {
    terminator: AutoTerminator,
}

let focus_in = Signal::<()>::new();
let widget = Widget { terminator: AutoTerminator::new() };

focus_in.connect_owned(|_: &()| println!("focus"), &widget.terminator);
assert_eq!(focus_in.slot_count(), 1);

drop(widget); // the widget's subscriptions die with it
assert_eq!(focus_in.slot_count(), 0);
focus_in.emit(()); // invokes nothing, faults nothing
```

The reverse order is just as safe: drop the signal first and every
outstanding [`Connection`] simply reports terminated.

# Threading

A signal and everything derived from it form a single-threaded group: the
types are neither `Send` nor `Sync`, so the compiler rejects cross-thread use
instead of leaving it as a documented constraint. There is no internal
locking and no scheduling; `emit` runs every slot to completion on the
calling thread, and slots may re-enter the signal freely. To hand payloads to
another thread, subscribe a channel sender (`std::sync::mpsc` always,
`tokio::sync::mpsc` behind the default `tokio` feature):

```rust
use sigslot::Signal;

let sig = Signal::<String>::new();
let (tx, rx) = std::sync::mpsc::channel();
let _connection = sig.connect(tx);

sig.emit("hello".to_string());
assert_eq!(rx.recv().unwrap(), "hello");
```
*/

mod connection;
mod signal;
mod slot;
mod terminator;

pub use connection::*;
pub use signal::*;
pub use slot::*;
pub use terminator::*;
