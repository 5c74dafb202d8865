//! Render instrumentation for developer tooling.
//!
//! Disabled until [`enable_component_tracking`] is called; there is no way to
//! turn it off again. While enabled, every render of a decorated component
//! publishes a [`ReporterEvent::Render`] and records which instance owns the
//! rendered output, and every unmount publishes a [`ReporterEvent::Destroy`].
//!
//! Render errors are published on a separate stream ([`on_render_error`])
//! whether or not tracking is enabled.
//!
//! # Example
//!
//! ```ignore
//! use spark_observer::devtools;
//!
//! devtools::enable_component_tracking();
//! let unsubscribe = devtools::subscribe(|event| {
//!     if let devtools::ReporterEvent::Render { name, render_time, .. } = event {
//!         tracing::info!(%name, ?render_time, "rendered");
//!     }
//! });
//!
//! // ...
//! unsubscribe();
//! ```

mod reporter;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::component::Instance;
use crate::error::RenderError;
use crate::types::{InstanceId, OutputHandle};

use reporter::EventStream;

/// Instrumentation event.
#[derive(Debug, Clone, PartialEq)]
pub enum ReporterEvent {
    /// A decorated component rendered (first render or update).
    Render {
        component: InstanceId,
        name: String,
        node: OutputHandle,
        /// Duration of this render.
        render_time: Duration,
        /// Time since the instance's very first render started.
        total_time: Duration,
    },
    /// A decorated component was unmounted.
    Destroy {
        component: InstanceId,
        name: String,
        node: OutputHandle,
    },
}

/// A render that failed, published before the error propagates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderErrorEvent {
    pub component: InstanceId,
    pub name: String,
    pub error: RenderError,
}

// =============================================================================
// State
// =============================================================================

thread_local! {
    static ENABLED: Cell<bool> = const { Cell::new(false) };

    /// Output handle → owning instance.
    static COMPONENTS: RefCell<HashMap<OutputHandle, Weak<Instance>>> = RefCell::new(HashMap::new());

    static RENDER_REPORTER: RefCell<EventStream<ReporterEvent>> = RefCell::new(EventStream::new());

    static ERRORS_REPORTER: RefCell<EventStream<RenderErrorEvent>> = RefCell::new(EventStream::new());
}

// =============================================================================
// Public API
// =============================================================================

/// Turn on render instrumentation for this thread. Idempotent.
pub fn enable_component_tracking() {
    if ENABLED.with(|enabled| enabled.replace(true)) {
        return;
    }
    tracing::debug!("component tracking enabled");
}

/// Whether render instrumentation is on.
pub fn is_tracking_components() -> bool {
    ENABLED.with(|enabled| enabled.get())
}

/// Subscribe to render and destroy events. Returns the unsubscribe function.
pub fn subscribe<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&ReporterEvent) + 'static,
{
    let id = RENDER_REPORTER.with(|stream| stream.borrow_mut().subscribe(handler));

    move || {
        RENDER_REPORTER.with(|stream| stream.borrow_mut().unsubscribe(id));
    }
}

/// Subscribe to render errors. Returns the unsubscribe function.
pub fn on_render_error<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&RenderErrorEvent) + 'static,
{
    let id = ERRORS_REPORTER.with(|stream| stream.borrow_mut().subscribe(handler));

    move || {
        ERRORS_REPORTER.with(|stream| stream.borrow_mut().unsubscribe(id));
    }
}

/// Instance that owns the output `handle`, if it is still alive.
pub fn find_component(handle: OutputHandle) -> Option<Rc<Instance>> {
    COMPONENTS.with(|components| components.borrow().get(&handle).and_then(Weak::upgrade))
}

/// Number of recorded output associations.
pub fn tracked_count() -> usize {
    COMPONENTS.with(|components| components.borrow().len())
}

/// Number of render/destroy subscribers.
pub fn subscriber_count() -> usize {
    RENDER_REPORTER.with(|stream| stream.borrow().len())
}

// =============================================================================
// Reporting (called by the binding)
// =============================================================================

pub(crate) fn report_render(instance: &Rc<Instance>) {
    let node = instance.output_handle();
    COMPONENTS.with(|components| {
        components
            .borrow_mut()
            .insert(node, Rc::downgrade(instance));
    });

    let (render_time, total_time) = {
        let scratch = instance.scratch();
        let end = scratch.render_end.unwrap_or_else(Instant::now);
        let render_time = scratch
            .render_start
            .map(|start| end.saturating_duration_since(start))
            .unwrap_or_default();
        let total_time = scratch
            .first_render_start
            .map(|start| end.saturating_duration_since(start))
            .unwrap_or_default();
        (render_time, total_time)
    };

    emit(ReporterEvent::Render {
        component: instance.id(),
        name: instance.name().to_string(),
        node,
        render_time,
        total_time,
    });
}

/// Drop the output association of `instance`.
pub(crate) fn forget_component(instance: &Instance) {
    let node = instance.output_handle();
    COMPONENTS.with(|components| {
        components.borrow_mut().remove(&node);
    });
}

pub(crate) fn report_destroy(instance: &Instance) {
    let node = instance.output_handle();
    forget_component(instance);

    emit(ReporterEvent::Destroy {
        component: instance.id(),
        name: instance.name().to_string(),
        node,
    });
}

pub(crate) fn report_error(instance: &Instance, error: &RenderError) {
    let event = RenderErrorEvent {
        component: instance.id(),
        name: instance.name().to_string(),
        error: error.clone(),
    };
    let handlers = ERRORS_REPORTER.with(|stream| stream.borrow().snapshot());
    for handler in handlers {
        handler(&event);
    }
}

fn emit(event: ReporterEvent) {
    let handlers = RENDER_REPORTER.with(|stream| stream.borrow().snapshot());
    for handler in handlers {
        handler(&event);
    }
}

/// Reset instrumentation state (for testing).
pub fn reset_devtools() {
    ENABLED.with(|enabled| enabled.set(false));
    COMPONENTS.with(|components| components.borrow_mut().clear());
    RENDER_REPORTER.with(|stream| stream.borrow_mut().clear());
    ERRORS_REPORTER.with(|stream| stream.borrow_mut().clear());
}
