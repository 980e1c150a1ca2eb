use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// Accumulates everything a slot observes; the returned `check` drains and
/// returns the accumulated values.
#[allow(unused)]
pub fn watcher<T: 'static>() -> (Box<dyn Fn(T)>, Box<dyn Fn() -> Vec<T>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let accumulate = {
        let seen = seen.clone();
        Box::new(move |value: T| {
            seen.borrow_mut().push(value);
        })
    };

    let check = Box::new(move || {
        let seen: Vec<T> = seen.borrow_mut().drain(..).collect();
        seen
    });

    (accumulate, check)
}
