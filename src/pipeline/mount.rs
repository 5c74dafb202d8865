//! Mount API - minimal host runtime for decorated components.
//!
//! Mounting creates an [`Instance`], runs its lifecycle hooks around the first
//! render and returns a [`MountHandle`] through which the caller updates or
//! unmounts it. There is no tree and no diffing: a mounted instance owns one
//! output [`Node`], replaced on every committed render.
//!
//! # Example
//!
//! ```ignore
//! use spark_observer::pipeline::{mount, tick};
//!
//! let handle = mount(counter, Props::new())?;
//!
//! // Deliver invalidations caused by signal writes
//! count.set(1);
//! tick()?;
//! assert_eq!(handle.output(), Node::text("1"));
//!
//! handle.unmount();
//! ```

use std::rc::Rc;

use crate::component::{ComponentDef, Instance};
use crate::engine::{self, Phase, Snapshot};
use crate::error::{ObserverError, RenderError};
use crate::tracking;
use crate::types::{Context, InstanceId, Node, OutputHandle, Props, StateRef};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Unmounts the instance when dropped.
pub struct MountHandle {
    instance: Rc<Instance>,
}

impl MountHandle {
    pub fn id(&self) -> InstanceId {
        self.instance.id()
    }

    pub fn instance(&self) -> &Rc<Instance> {
        &self.instance
    }

    /// Last committed output.
    pub fn output(&self) -> Node {
        self.instance.output()
    }

    pub fn output_handle(&self) -> OutputHandle {
        self.instance.output_handle()
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_mounted()
    }

    /// Replace the props. Re-renders only if the should-update check allows it.
    ///
    /// Returns whether a render happened.
    pub fn set_props(&self, props: Props) -> Result<bool, ObserverError> {
        let props = resolve_props(self.instance.def(), props, self.instance.context())?;
        let state = self.instance.state();
        Ok(update(&self.instance, props, state)?)
    }

    /// Replace the state reference. Re-renders only if the should-update check
    /// allows it.
    pub fn set_state(&self, state: StateRef) -> Result<bool, RenderError> {
        let props = self.instance.props().clone();
        update(&self.instance, props, state)
    }

    /// Re-render unconditionally, skipping the should-update check.
    pub fn force_update(&self) -> Result<(), RenderError> {
        warn_if_tracking(&self.instance, "force_update");
        force_update(&self.instance)
    }

    /// Unmount the instance.
    pub fn unmount(self) {
        teardown(&self.instance);
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        teardown(&self.instance);
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount `def` with `props` and an empty context.
pub fn mount(def: impl Into<Rc<ComponentDef>>, props: Props) -> Result<MountHandle, ObserverError> {
    mount_with_context(def, props, Context::new())
}

/// Mount `def` with `props` and `context`.
///
/// This:
/// 1. Resolves injected stores from the context into props
/// 2. Applies default props and validates against the declared prop types
/// 3. Registers the instance and runs `WillMount` hooks
/// 4. Renders, commits the output and runs `DidMount` hooks
///
/// A failed first render tears the instance down again before the error is
/// returned.
pub fn mount_with_context(
    def: impl Into<Rc<ComponentDef>>,
    props: Props,
    context: Context,
) -> Result<MountHandle, ObserverError> {
    let def = def.into();
    let props = resolve_props(&def, props, &context)?;

    let instance = Instance::new(def, props, context);
    engine::register_instance(&instance);
    instance.set_mounted(true);
    tracing::debug!(component = %instance.name(), id = %instance.id(), "mounting");

    instance.def().hooks().run(Phase::WillMount, &instance);

    match instance.render() {
        Ok(node) => instance.set_output(node),
        Err(err) => {
            tracing::debug!(component = %instance.name(), error = %err, "first render failed");
            teardown(&instance);
            return Err(err.into());
        }
    }

    instance.def().hooks().run(Phase::DidMount, &instance);
    Ok(MountHandle { instance })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

/// Deliver pending invalidations: every decorated component whose
/// dependencies changed re-renders once.
pub fn tick() -> Result<(), RenderError> {
    tracking::run_reactions()
}

// =============================================================================
// Update Path
// =============================================================================

/// Re-render `instance` without consulting its should-update check.
/// Does nothing once the instance is unmounted.
pub(crate) fn force_update(instance: &Rc<Instance>) -> Result<(), RenderError> {
    if !instance.is_mounted() {
        return Ok(());
    }
    rerender(instance)
}

fn update(instance: &Rc<Instance>, props: Props, state: StateRef) -> Result<bool, RenderError> {
    if !instance.is_mounted() {
        return Ok(false);
    }
    warn_if_tracking(instance, "update");

    let proceed = match instance.def().should_update() {
        Some(check) => {
            let current: &Instance = instance;
            check(current, Snapshot::new(&props, &state))
        }
        None => true,
    };

    instance.set_props(props);
    instance.set_state(state);

    if !proceed {
        tracing::trace!(component = %instance.name(), "update skipped");
        return Ok(false);
    }
    rerender(instance)?;
    Ok(true)
}

fn rerender(instance: &Rc<Instance>) -> Result<(), RenderError> {
    let node = instance.render()?;
    instance.set_output(node);
    instance.def().hooks().run(Phase::DidUpdate, instance);
    Ok(())
}

fn teardown(instance: &Rc<Instance>) {
    if !instance.is_mounted() {
        return;
    }
    instance.def().hooks().run(Phase::WillUnmount, instance);
    instance.set_mounted(false);
    engine::release_instance(instance.id());
    tracing::debug!(component = %instance.name(), id = %instance.id(), "unmounted");
}

fn resolve_props(def: &ComponentDef, mut props: Props, context: &Context) -> Result<Props, ObserverError> {
    for store in def.stores() {
        if props.contains_key(store) {
            continue;
        }
        let value = context
            .get(store)
            .cloned()
            .ok_or_else(|| ObserverError::MissingStore {
                component: def.name().to_string(),
                store: store.clone(),
            })?;
        props.insert(store.clone(), value);
    }

    props.apply_defaults(def.default_props());

    for problem in def.validate(&props, context) {
        tracing::warn!(component = %def.name(), %problem, "invalid props");
    }
    Ok(props)
}

fn warn_if_tracking(instance: &Instance, operation: &str) {
    if let Some(reaction) = tracking::current_reaction() {
        tracing::warn!(
            component = %instance.name(),
            %reaction,
            operation,
            "host update requested from inside a tracked render"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
