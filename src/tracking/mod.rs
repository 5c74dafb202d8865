//! Dependency tracking seam.
//!
//! The binding only needs three things from the tracker: begin tracking a
//! computation, dispose it, and be told once when it goes stale. This module
//! provides exactly that on top of spark-signals.
//!
//! - [`Reaction`] - named tracked computation
//! - [`run_reactions`] / [`act`] - deliver queued invalidations
//! - [`TrackingScope`] - guard around the region in which reads are recorded

mod reaction;
mod scope;

pub use reaction::{act, pending_reactions, reset_reactions, run_reactions, Reaction};
pub use scope::{current_reaction, is_tracking, reset_scopes, TrackingScope};

/// Reset all tracking state (for testing).
pub fn reset_tracking() {
    reset_reactions();
    reset_scopes();
}
