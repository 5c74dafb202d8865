//! Components - definitions, instances and normalization.
//!
//! - [`ComponentDef`] - registered shape (render body, hooks, metadata)
//! - [`Instance`] - a mounted component
//! - [`normalize`] - function → stateful wrapper

mod def;
mod instance;
mod normalize;

pub use def::{ComponentDef, ComponentKind, FunctionRender, Markers, PropType, RenderFn, ShouldUpdateFn};
pub use instance::{Instance, Scratch};
pub use normalize::normalize;
