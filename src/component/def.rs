//! Component definitions.
//!
//! A [`ComponentDef`] is the registered shape of a component: its render body,
//! lifecycle hooks, optional should-update check, default props and prop
//! validation metadata. The kind ([`ComponentKind`]) is fixed by the constructor
//! used, never inferred from the body.
//!
//! ```ignore
//! let label = ComponentDef::function("Label", |props, _cx| {
//!     Ok(Node::text(props.get("text").and_then(|v| v.as_str()).unwrap_or("")))
//! })
//! .with_default_props(Props::new().with("text", "untitled"));
//!
//! let counter = ComponentDef::stateful("Counter", move |inst| {
//!     Ok(Node::text(format!("{}", count.get())))
//! })
//! .with_hook(Phase::DidMount, |inst| tracing::info!(id = %inst.id(), "mounted"));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::engine::{LifecycleHooks, Phase, Snapshot};
use crate::error::RenderError;
use crate::types::{Context, Node, PropValue, Props};

use super::Instance;

/// Render of a stateful component. Receives the live instance.
pub type RenderFn = Rc<dyn Fn(&Rc<Instance>) -> Result<Node, RenderError>>;

/// Render of a function component. Receives the current props and context.
pub type FunctionRender = Rc<dyn Fn(&Props, &Context) -> Result<Node, RenderError>>;

/// Should-update check: current instance and the proposed next props/state.
pub type ShouldUpdateFn = Rc<dyn Fn(&Instance, Snapshot<'_>) -> bool>;

/// Declared component kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Render-only function, no lifecycle.
    Function,
    /// Full lifecycle shape.
    Stateful,
}

bitflags::bitflags! {
    /// Decorations applied to a definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Markers: u8 {
        /// Render is bound to the dependency tracker.
        const OBSERVER = 1 << 0;
        /// Stores are injected from the mount context.
        const INJECTED = 1 << 1;
        /// Synthesized from a function component.
        const NORMALIZED = 1 << 2;
    }
}

#[derive(Clone)]
pub(crate) enum Body {
    Function(FunctionRender),
    Stateful(RenderFn),
}

// =============================================================================
// PropType - validation metadata
// =============================================================================

/// Validation rule for one prop (or context entry).
#[derive(Clone)]
pub struct PropType {
    name: String,
    required: bool,
    check: Option<Rc<dyn Fn(&PropValue) -> bool>>,
}

impl PropType {
    /// The key must be present.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            check: None,
        }
    }

    /// The key may be absent.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            check: None,
        }
    }

    /// Additional check applied when the key is present.
    pub fn with_check(mut self, check: impl Fn(&PropValue) -> bool + 'static) -> Self {
        self.check = Some(Rc::new(check));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Problem with `values`, if any.
    pub fn validate(&self, values: &Props) -> Option<String> {
        match values.get(&self.name) {
            None if self.required => Some(format!("`{}` is required but missing", self.name)),
            None => None,
            Some(value) => match &self.check {
                Some(check) if !check(value) => {
                    Some(format!("`{}` has an invalid value {:?}", self.name, value))
                }
                _ => None,
            },
        }
    }
}

impl fmt::Debug for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropType")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("check", &self.check.is_some())
            .finish()
    }
}

// =============================================================================
// ComponentDef
// =============================================================================

/// A registered component shape.
#[derive(Clone)]
pub struct ComponentDef {
    pub(crate) name: String,
    pub(crate) body: Body,
    pub(crate) hooks: LifecycleHooks<Rc<Instance>>,
    pub(crate) should_update: Option<ShouldUpdateFn>,
    pub(crate) default_props: Props,
    pub(crate) prop_types: Vec<PropType>,
    pub(crate) context_types: Vec<PropType>,
    pub(crate) stores: Vec<String>,
    pub(crate) markers: Markers,
}

impl ComponentDef {
    fn with_body(name: impl Into<String>, body: Body) -> Self {
        Self {
            name: name.into(),
            body,
            hooks: LifecycleHooks::new(),
            should_update: None,
            default_props: Props::new(),
            prop_types: Vec::new(),
            context_types: Vec::new(),
            stores: Vec::new(),
            markers: Markers::empty(),
        }
    }

    /// Stateful component rendering from the live instance.
    pub fn stateful(
        name: impl Into<String>,
        render: impl Fn(&Rc<Instance>) -> Result<Node, RenderError> + 'static,
    ) -> Self {
        Self::with_body(name, Body::Stateful(Rc::new(render)))
    }

    /// Function component rendering from props and context only.
    pub fn function(
        name: impl Into<String>,
        render: impl Fn(&Props, &Context) -> Result<Node, RenderError> + 'static,
    ) -> Self {
        Self::with_body(name, Body::Function(Rc::new(render)))
    }

    pub fn with_default_props(mut self, defaults: Props) -> Self {
        self.default_props = defaults;
        self
    }

    pub fn with_prop_type(mut self, prop_type: PropType) -> Self {
        self.prop_types.push(prop_type);
        self
    }

    pub fn with_context_type(mut self, context_type: PropType) -> Self {
        self.context_types.push(context_type);
        self
    }

    /// Register a lifecycle hook. Hooks of one phase run in registration order.
    pub fn with_hook(mut self, phase: Phase, hook: impl Fn(&Rc<Instance>) + 'static) -> Self {
        self.hooks.patch(phase, hook);
        self
    }

    /// Custom should-update check. A decorated component keeps a custom check
    /// instead of installing the shallow gate.
    pub fn with_should_update(
        mut self,
        check: impl Fn(&Instance, Snapshot<'_>) -> bool + 'static,
    ) -> Self {
        self.should_update = Some(Rc::new(check));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ComponentKind {
        match self.body {
            Body::Function(_) => ComponentKind::Function,
            Body::Stateful(_) => ComponentKind::Stateful,
        }
    }

    pub fn hooks(&self) -> &LifecycleHooks<Rc<Instance>> {
        &self.hooks
    }

    pub fn should_update(&self) -> Option<&ShouldUpdateFn> {
        self.should_update.as_ref()
    }

    pub fn default_props(&self) -> &Props {
        &self.default_props
    }

    pub fn prop_types(&self) -> &[PropType] {
        &self.prop_types
    }

    pub fn context_types(&self) -> &[PropType] {
        &self.context_types
    }

    /// Store names injected from the mount context.
    pub fn stores(&self) -> &[String] {
        &self.stores
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub fn is_observer(&self) -> bool {
        self.markers.contains(Markers::OBSERVER)
    }

    /// Render as seen by an instance. Function bodies read the instance's
    /// current props and context at call time.
    pub fn base_render(&self) -> RenderFn {
        match &self.body {
            Body::Stateful(render) => render.clone(),
            Body::Function(render) => {
                let render = render.clone();
                Rc::new(move |inst: &Rc<Instance>| {
                    let props = inst.props();
                    render(&*props, inst.context())
                })
            }
        }
    }

    /// Validation problems of `props` and `context` against the declared types.
    pub fn validate(&self, props: &Props, context: &Context) -> Vec<String> {
        let prop_problems = self.prop_types.iter().filter_map(|t| t.validate(props));
        let context_problems = self
            .context_types
            .iter()
            .filter_map(|t| t.validate(context).map(|p| format!("context {p}")));
        prop_problems.chain(context_problems).collect()
    }

    pub(crate) fn patch_hook(&mut self, phase: Phase, hook: impl Fn(&Rc<Instance>) + 'static) {
        self.hooks.patch(phase, hook);
    }
}

impl fmt::Debug for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDef")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("markers", &self.markers)
            .field("hooks", &self.hooks)
            .field("stores", &self.stores)
            .finish()
    }
}
