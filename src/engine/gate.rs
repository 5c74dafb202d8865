//! Update Gate - shallow "should this component re-render?" check.
//!
//! Used only by the host's own update path (new props or state). Re-renders forced
//! by the tracker never consult it.
//!
//! A render must happen when:
//! 1. the state reference changed
//! 2. the number of prop keys changed
//! 3. any prop value differs (primitives by value, objects by reference)
//! 4. any prop value is a plain object that is not observable, even if its
//!    reference is unchanged: it may have been mutated in place where the
//!    tracker cannot see it

use crate::config::ObserverConfig;
use crate::types::{Props, StateRef};

/// Props and state of one side of the comparison.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub props: &'a Props,
    pub state: &'a StateRef,
}

impl<'a> Snapshot<'a> {
    pub fn new(props: &'a Props, state: &'a StateRef) -> Self {
        Self { props, state }
    }
}

/// True when `next` may render differently from `current`.
pub fn should_update(current: Snapshot<'_>, next: Snapshot<'_>) -> bool {
    if !current.state.same(next.state) {
        return true;
    }
    is_props_shallow_modified(current.props, next.props)
}

/// Shallow comparison of two prop sets. See the module docs for the rules.
pub fn is_props_shallow_modified(current: &Props, next: &Props) -> bool {
    if current.len() != next.len() {
        return true;
    }
    for (key, value) in current.iter() {
        let Some(next_value) = next.get(key) else {
            return true;
        };
        if !next_value.same(value) {
            return true;
        }
        if !next_value.is_primitive() && !next_value.is_observable() {
            return true;
        }
    }
    false
}

/// The gate as installed on a decorated component.
///
/// Same decision as [`should_update`]; additionally warns when static rendering is
/// active, since a one-shot render should never be asked to update.
pub fn gate(config: &ObserverConfig, component: &str, current: Snapshot<'_>, next: Snapshot<'_>) -> bool {
    if config.is_static() {
        tracing::warn!(
            component,
            "a re-render was requested while static rendering is active; \
             static output is rendered once and is not expected to update"
        );
    }
    should_update(current, next)
}
