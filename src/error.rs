//! Error types.
//!
//! Two families:
//! - [`ObserverError`] - usage errors surfaced to the caller of `decorate`/`mount`.
//! - [`RenderError`] - failures produced by a render function. Cloneable so the
//!   errors reporter can observe a failure before it propagates.

use std::fmt;

/// A render function failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The component's render returned an error.
    #[error("render of `{component}` failed: {message}")]
    Failed {
        /// Display name of the failing component.
        component: String,
        /// Human readable cause.
        message: String,
    },

    /// A tracked render never produced an output.
    #[error("tracked render `{reaction}` produced no output")]
    NoOutput {
        /// Name of the reaction that ran the render.
        reaction: String,
    },
}

impl RenderError {
    /// Build a [`RenderError::Failed`] for `component`.
    pub fn failed(component: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Failed {
            component: component.into(),
            message: message.to_string(),
        }
    }
}

/// Usage errors. Never recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    /// `decorate` was called without a component.
    #[error("observer: cannot decorate an absent component")]
    InvalidTarget,

    /// Store names were passed as a single value instead of an ordered list.
    #[error(
        "observer: store names must be an ordered list, got the single value `{0}`; \
         use `[\"{0}\"]` instead"
    )]
    AmbiguousStoreNames(String),

    /// An injected store is not available in the mount context.
    #[error("observer: store `{store}` required by `{component}` is not in the context")]
    MissingStore {
        /// Component requesting the store.
        component: String,
        /// Store name that was not found.
        store: String,
    },

    /// The first render at mount failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
