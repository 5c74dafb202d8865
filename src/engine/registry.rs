//! Instance Registry - identity allocation for mounted components.
//!
//! Manages:
//! - Instance id allocation (monotonic, never reused)
//! - Output handle allocation
//! - Live instance table (weak, never keeps an instance alive)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::component::Instance;
use crate::types::{InstanceId, OutputHandle};

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Next instance id.
    static NEXT_INSTANCE: RefCell<usize> = const { RefCell::new(0) };

    /// Next output handle.
    static NEXT_OUTPUT: RefCell<usize> = const { RefCell::new(0) };

    /// Currently mounted instances.
    static LIVE: RefCell<HashMap<InstanceId, Weak<Instance>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate a fresh instance id.
pub fn allocate_instance_id() -> InstanceId {
    NEXT_INSTANCE.with(|next| {
        let mut next = next.borrow_mut();
        let id = InstanceId(*next);
        *next += 1;
        id
    })
}

/// Allocate a fresh output handle.
pub fn allocate_output_handle() -> OutputHandle {
    NEXT_OUTPUT.with(|next| {
        let mut next = next.borrow_mut();
        let handle = OutputHandle(*next);
        *next += 1;
        handle
    })
}

/// Record `instance` as mounted.
pub fn register_instance(instance: &Rc<Instance>) {
    LIVE.with(|live| {
        live.borrow_mut()
            .insert(instance.id(), Rc::downgrade(instance));
    });
}

/// Forget a mounted instance.
pub fn release_instance(id: InstanceId) {
    LIVE.with(|live| {
        live.borrow_mut().remove(&id);
    });
}

// =============================================================================
// Lookups
// =============================================================================

/// Check if an instance is currently mounted.
pub fn is_mounted(id: InstanceId) -> bool {
    LIVE.with(|live| live.borrow().contains_key(&id))
}

/// Count of currently mounted instances.
pub fn mounted_count() -> usize {
    LIVE.with(|live| live.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    NEXT_INSTANCE.with(|next| *next.borrow_mut() = 0);
    NEXT_OUTPUT.with(|next| *next.borrow_mut() = 0);
    LIVE.with(|live| live.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_ids() {
        reset_registry();

        assert_eq!(allocate_instance_id(), InstanceId(0));
        assert_eq!(allocate_instance_id(), InstanceId(1));
        assert_eq!(allocate_output_handle(), OutputHandle(0));
        assert_eq!(allocate_output_handle(), OutputHandle(1));
    }

    #[test]
    fn test_register_and_release() {
        use crate::component::{ComponentDef, Instance};
        use crate::types::{Node, Props};

        reset_registry();

        let def = Rc::new(ComponentDef::stateful("Panel", |_| Ok(Node::Empty)));
        let instance = Instance::new(def, Props::new(), Props::new());
        let id = instance.id();

        register_instance(&instance);
        assert!(is_mounted(id));
        assert_eq!(mounted_count(), 1);

        release_instance(id);
        assert!(!is_mounted(id));

        // Releasing twice is harmless
        release_instance(id);
        assert_eq!(mounted_count(), 0);
    }
}
