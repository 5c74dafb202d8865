//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Counts `WARN` events seen on the current thread.
pub struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Install a warning counter for the current thread until the guard drops.
pub fn capture_warnings() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
    let warnings = Arc::new(AtomicUsize::new(0));
    let guard = tracing_subscriber::registry()
        .with(WarnCounter {
            warnings: warnings.clone(),
        })
        .set_default();
    (warnings, guard)
}

pub fn warnings(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

/// Shared render counter.
pub fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

pub fn bump(count: &Rc<Cell<usize>>) {
    count.set(count.get() + 1);
}

/// Shared event log.
pub fn log() -> Rc<RefCell<Vec<&'static str>>> {
    Rc::new(RefCell::new(Vec::new()))
}
