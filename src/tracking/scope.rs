//! Tracking scope - the region in which a reaction records dependencies.
//!
//! Entered with [`TrackingScope::enter`] and left when the guard drops, so the
//! region is exited on every path out of a render: normal return, early `?`
//! return, or unwinding.

use std::cell::RefCell;

thread_local! {
    /// Names of the reactions currently tracking, innermost last.
    static ACTIVE: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Guard for an active tracking region.
#[must_use = "the tracking region ends when the guard is dropped"]
pub struct TrackingScope {
    depth: usize,
}

impl TrackingScope {
    /// Enter the tracking region of reaction `name`.
    pub fn enter(name: &str) -> Self {
        let depth = ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            active.push(name.to_string());
            active.len()
        });
        Self { depth }
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            // Also drops inner regions whose guards were leaked
            active.borrow_mut().truncate(self.depth - 1);
        });
    }
}

/// Whether a tracked render is running on this thread.
pub fn is_tracking() -> bool {
    ACTIVE.with(|active| !active.borrow().is_empty())
}

/// Name of the innermost tracking reaction.
pub fn current_reaction() -> Option<String> {
    ACTIVE.with(|active| active.borrow().last().cloned())
}

/// Clear tracking regions (for testing).
pub fn reset_scopes() {
    ACTIVE.with(|active| active.borrow_mut().clear());
}
