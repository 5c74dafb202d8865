//! Binding configuration.
//!
//! Two layers:
//! - Process-wide defaults kept in thread-local cells (the UI thread owns them):
//!   static rendering here, component tracking in [`crate::devtools`].
//! - [`ObserverConfig`] - per-binding overrides captured at decoration time. An unset
//!   field defers to the process-wide default at the moment it is read.
//!
//! # Example
//!
//! ```ignore
//! use spark_observer::{set_static_rendering, ObserverConfig};
//!
//! // One-shot rendering for the whole thread
//! set_static_rendering(true);
//!
//! // Or only for one component definition
//! let config = ObserverConfig::new().static_rendering(true);
//! ```

use std::cell::Cell;

use crate::devtools;

thread_local! {
    static STATIC_RENDERING: Cell<bool> = const { Cell::new(false) };
}

/// Enable or disable static rendering for the current thread.
///
/// While enabled, decorated components render once and never subscribe to the
/// signals they read.
pub fn set_static_rendering(enabled: bool) {
    STATIC_RENDERING.with(|flag| flag.set(enabled));
    tracing::debug!(enabled, "static rendering toggled");
}

/// Whether static rendering is active on this thread.
pub fn is_static_rendering() -> bool {
    STATIC_RENDERING.with(|flag| flag.get())
}

/// Per-binding configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Override for static rendering. `None` follows [`is_static_rendering`].
    pub static_rendering: Option<bool>,
    /// Override for render instrumentation. `None` follows
    /// [`devtools::is_tracking_components`].
    pub track_components: Option<bool>,
}

impl ObserverConfig {
    /// Configuration that follows the process-wide defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force static rendering on or off for this binding.
    pub fn static_rendering(mut self, enabled: bool) -> Self {
        self.static_rendering = Some(enabled);
        self
    }

    /// Force render instrumentation on or off for this binding.
    pub fn track_components(mut self, enabled: bool) -> Self {
        self.track_components = Some(enabled);
        self
    }

    /// Resolve static rendering now.
    pub fn is_static(&self) -> bool {
        self.static_rendering.unwrap_or_else(is_static_rendering)
    }

    /// Resolve render instrumentation now.
    pub fn is_tracking(&self) -> bool {
        self.track_components
            .unwrap_or_else(devtools::is_tracking_components)
    }
}

/// Reset static rendering (for testing).
pub fn reset_config() {
    STATIC_RENDERING.with(|flag| flag.set(false));
}
