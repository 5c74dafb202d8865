//! Lifecycle Hooks - ordered observers per lifecycle phase.
//!
//! A component definition carries one [`LifecycleHooks`] table. Patching a phase
//! never replaces what is already there: the new hook is appended, so the
//! component's own hook runs first and the binding's hook after it, both with the
//! same argument.
//!
//! ```ignore
//! let mut hooks = LifecycleHooks::new();
//! hooks.patch(Phase::WillUnmount, |inst| user_cleanup(inst));
//! hooks.patch(Phase::WillUnmount, |inst| dispose_reaction(inst)); // runs second
//! hooks.run(Phase::WillUnmount, &instance);
//! ```

use std::fmt;
use std::rc::Rc;

/// Lifecycle phases, in the order the host visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before the first render.
    WillMount,
    /// After the first render committed.
    DidMount,
    /// A tracked dependency changed; a forced re-render is about to happen.
    WillReact,
    /// After a re-render committed.
    DidUpdate,
    /// Before the instance is torn down.
    WillUnmount,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::WillMount,
        Phase::DidMount,
        Phase::WillReact,
        Phase::DidUpdate,
        Phase::WillUnmount,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// A lifecycle observer.
pub type Hook<T> = Rc<dyn Fn(&T)>;

/// Ordered hook lists, one per [`Phase`].
pub struct LifecycleHooks<T> {
    phases: [Vec<Hook<T>>; 5],
}

impl<T> LifecycleHooks<T> {
    pub fn new() -> Self {
        Self {
            phases: Default::default(),
        }
    }

    /// Install `hook` for `phase`.
    ///
    /// With no existing hook it becomes the only one; otherwise it runs after every
    /// hook already registered for the phase.
    pub fn patch(&mut self, phase: Phase, hook: impl Fn(&T) + 'static) {
        self.phases[phase.slot()].push(Rc::new(hook));
    }

    /// Whether any hook is registered for `phase`.
    pub fn has(&self, phase: Phase) -> bool {
        !self.phases[phase.slot()].is_empty()
    }

    /// Number of hooks registered for `phase`.
    pub fn count(&self, phase: Phase) -> usize {
        self.phases[phase.slot()].len()
    }

    /// Run every hook of `phase` in registration order.
    ///
    /// The list is snapshotted first, so hooks may freely touch the owner.
    pub fn run(&self, phase: Phase, target: &T) {
        let hooks: Vec<Hook<T>> = self.phases[phase.slot()].clone();
        for hook in hooks {
            hook(target);
        }
    }
}

impl<T> Default for LifecycleHooks<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for LifecycleHooks<T> {
    fn clone(&self) -> Self {
        Self {
            phases: self.phases.clone(),
        }
    }
}

impl<T> fmt::Debug for LifecycleHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for phase in Phase::ALL {
            map.entry(&phase, &self.count(phase));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_patch_into_empty_phase() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: LifecycleHooks<u32> = LifecycleHooks::new();
        assert!(!hooks.has(Phase::DidMount));

        let log = calls.clone();
        hooks.patch(Phase::DidMount, move |v| log.borrow_mut().push(format!("mixin:{v}")));

        hooks.run(Phase::DidMount, &7);
        assert_eq!(*calls.borrow(), vec!["mixin:7"]);
    }

    #[test]
    fn test_original_runs_before_patched() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: LifecycleHooks<u32> = LifecycleHooks::new();

        let log = calls.clone();
        hooks.patch(Phase::WillUnmount, move |v| log.borrow_mut().push(format!("user:{v}")));
        let log = calls.clone();
        hooks.patch(Phase::WillUnmount, move |v| log.borrow_mut().push(format!("mixin:{v}")));

        hooks.run(Phase::WillUnmount, &1);
        assert_eq!(*calls.borrow(), vec!["user:1", "mixin:1"]);
    }

    #[test]
    fn test_repeated_patches_keep_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: LifecycleHooks<()> = LifecycleHooks::new();
        for i in 0..4 {
            let log = calls.clone();
            hooks.patch(Phase::DidUpdate, move |_| log.borrow_mut().push(i));
        }

        hooks.run(Phase::DidUpdate, &());
        assert_eq!(*calls.borrow(), vec![0, 1, 2, 3]);
        assert_eq!(hooks.count(Phase::DidUpdate), 4);
    }

    #[test]
    fn test_phases_are_independent() {
        let calls = Rc::new(RefCell::new(0));
        let mut hooks: LifecycleHooks<()> = LifecycleHooks::new();
        let log = calls.clone();
        hooks.patch(Phase::WillMount, move |_| *log.borrow_mut() += 1);

        hooks.run(Phase::DidMount, &());
        assert_eq!(*calls.borrow(), 0);
        hooks.run(Phase::WillMount, &());
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_clone_shares_hooks_but_not_list() {
        let mut hooks: LifecycleHooks<()> = LifecycleHooks::new();
        hooks.patch(Phase::DidMount, |_| {});
        let mut copy = hooks.clone();
        copy.patch(Phase::DidMount, |_| {});

        assert_eq!(hooks.count(Phase::DidMount), 1);
        assert_eq!(copy.count(Phase::DidMount), 2);
    }
}
