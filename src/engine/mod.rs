//! Engine - component-independent building blocks of the binding.
//!
//! - Registry: instance ids, output handles, live instance table
//! - Hooks: ordered lifecycle observers per phase
//! - Gate: shallow should-update decision

mod registry;
pub mod gate;
pub mod hooks;

pub use registry::*;
pub use gate::{gate, is_props_shallow_modified, should_update, Snapshot};
pub use hooks::{Hook, LifecycleHooks, Phase};
