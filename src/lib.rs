//! # spark-observer
//!
//! Reactive component binding for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A decorated component's render runs inside a tracked reaction. Every signal
//! the render reads becomes a dependency; when one changes, the component is
//! re-rendered exactly once, without the author declaring any subscription.
//!
//! ```text
//! decorate(def) → normalize → install hooks (WillMount, DidMount, DidUpdate, WillUnmount)
//! mount → reaction created → reactive render (tracked) → output
//! signal.set → reaction queued → tick → WillReact → forced render → output
//! unmount → reaction disposed
//! ```
//!
//! Host-initiated updates go through a shallow props/state gate; tracker-driven
//! updates always render.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Node, Props, PropValue, StateRef, ids)
//! - [`engine`] - Instance registry, lifecycle hooks, update gate
//! - [`component`] - Definitions, instances, normalization
//! - [`tracking`] - Reactions and tracking scopes over spark-signals
//! - [`observer`] - Decoration and the reactive binding
//! - [`devtools`] - Render instrumentation and error reporting
//! - [`pipeline`] - Minimal host runtime (mount, update, unmount)

pub mod component;
pub mod config;
pub mod devtools;
pub mod engine;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod tracking;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ObserverError, RenderError};

pub use config::{is_static_rendering, set_static_rendering, reset_config, ObserverConfig};

pub use component::{
    normalize, ComponentDef, ComponentKind, FunctionRender, Instance, Markers, PropType,
    RenderFn, Scratch, ShouldUpdateFn,
};

pub use engine::{
    gate, is_mounted, is_props_shallow_modified, mounted_count, reset_registry, should_update,
    LifecycleHooks, Phase, Snapshot,
};

pub use observer::{
    decorate, decorate_with, inject, observer, observer_block, ReactiveBinding, StoreNames,
};

pub use devtools::{
    enable_component_tracking, find_component, is_tracking_components, on_render_error,
    reset_devtools, ReporterEvent, RenderErrorEvent,
};

pub use pipeline::{mount, mount_with_context, tick, unmount, MountHandle};

pub use tracking::{act, reset_tracking, run_reactions, Reaction, TrackingScope};

/// Reset all thread-local state of the crate (for testing).
pub fn reset_all() {
    reset_config();
    reset_devtools();
    reset_registry();
    reset_tracking();
}
