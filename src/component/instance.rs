//! Component instances.
//!
//! An [`Instance`] is created by the host at mount time and dropped after
//! unmount. The binding only decorates it: it swaps the render function and
//! keeps its own bookkeeping in the instance's [`Scratch`] area.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::engine::{self, Snapshot};
use crate::error::RenderError;
use crate::observer::ReactiveBinding;
use crate::types::{Context, InstanceId, Node, OutputHandle, Props, StateRef};

use super::{ComponentDef, RenderFn};

/// Per-instance scratch area owned by the binding.
#[derive(Default)]
pub struct Scratch {
    /// Start of the latest render (instrumentation only).
    pub render_start: Option<Instant>,
    /// End of the latest render (instrumentation only).
    pub render_end: Option<Instant>,
    /// Start of the very first render (instrumentation only).
    pub first_render_start: Option<Instant>,
    /// Set once the binding has torn down.
    pub disposed: bool,
    pub(crate) binding: Option<Rc<ReactiveBinding>>,
}

/// A mounted component.
pub struct Instance {
    id: InstanceId,
    def: Rc<ComponentDef>,
    props: RefCell<Props>,
    state: RefCell<StateRef>,
    context: Context,
    render: RefCell<RenderFn>,
    output: RefCell<Node>,
    output_handle: OutputHandle,
    mounted: Cell<bool>,
    scratch: RefCell<Scratch>,
}

impl Instance {
    pub(crate) fn new(def: Rc<ComponentDef>, props: Props, context: Context) -> Rc<Self> {
        let render = def.base_render();
        Rc::new(Self {
            id: engine::allocate_instance_id(),
            def,
            props: RefCell::new(props),
            state: RefCell::new(StateRef::none()),
            context,
            render: RefCell::new(render),
            output: RefCell::new(Node::Empty),
            output_handle: engine::allocate_output_handle(),
            mounted: Cell::new(false),
            scratch: RefCell::new(Scratch::default()),
        })
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn def(&self) -> &ComponentDef {
        &self.def
    }

    /// Diagnostic name of the definition.
    pub fn name(&self) -> &str {
        self.def.name()
    }

    pub fn props(&self) -> Ref<'_, Props> {
        self.props.borrow()
    }

    pub fn state(&self) -> StateRef {
        self.state.borrow().clone()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Last committed output.
    pub fn output(&self) -> Node {
        self.output.borrow().clone()
    }

    pub fn output_handle(&self) -> OutputHandle {
        self.output_handle
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Whether a reactive binding was attached to this instance.
    pub fn is_reactive(&self) -> bool {
        self.scratch.borrow().binding.is_some()
    }

    pub fn scratch(&self) -> Ref<'_, Scratch> {
        self.scratch.borrow()
    }

    pub fn scratch_mut(&self) -> RefMut<'_, Scratch> {
        self.scratch.borrow_mut()
    }

    /// Run the current render function.
    pub fn render(self: &Rc<Self>) -> Result<Node, RenderError> {
        let render = self.render_fn();
        render(self)
    }

    /// Current render function.
    pub fn render_fn(&self) -> RenderFn {
        self.render.borrow().clone()
    }

    /// Run `f` with the current props and state as a gate snapshot.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(Snapshot<'_>) -> R) -> R {
        let props = self.props.borrow();
        let state = self.state.borrow();
        f(Snapshot::new(&props, &state))
    }

    pub(crate) fn set_render(&self, render: RenderFn) {
        *self.render.borrow_mut() = render;
    }

    pub(crate) fn set_props(&self, props: Props) {
        *self.props.borrow_mut() = props;
    }

    pub(crate) fn set_state(&self, state: StateRef) {
        *self.state.borrow_mut() = state;
    }

    pub(crate) fn set_output(&self, node: Node) {
        *self.output.borrow_mut() = node;
    }

    pub(crate) fn set_mounted(&self, mounted: bool) {
        self.mounted.set(mounted);
    }

    /// Reactive binding attached at mount, if any.
    pub fn binding(&self) -> Option<Rc<ReactiveBinding>> {
        self.scratch.borrow().binding.clone()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("name", &self.def.name())
            .field("output_handle", &self.output_handle)
            .field("mounted", &self.mounted.get())
            .finish()
    }
}
