//! Reactive binding - ties an instance's render to a tracked reaction.
//!
//! Installed on a definition as ordinary lifecycle hooks:
//!
//! ```text
//! WillMount    create reaction, swap render for the reactive render
//! DidMount     report render (instrumentation)
//! DidUpdate    report render (instrumentation)
//! WillUnmount  dispose reaction, mark unmounted, report destroy
//! ```
//!
//! The reactive render clears the pending flag and runs the original render
//! inside the reaction, so whatever it reads becomes a dependency. When a
//! dependency changes the reaction invalidates once; the binding marks a render
//! pending, runs `WillReact` hooks and forces the host to re-render, which
//! tracks again. Invalidations arriving while a render is pending are dropped.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Instant;

use crate::component::{ComponentDef, Instance, RenderFn, ShouldUpdateFn};
use crate::config::ObserverConfig;
use crate::devtools;
use crate::engine::{self, Phase, Snapshot};
use crate::error::RenderError;
use crate::pipeline;
use crate::tracking::Reaction;
use crate::types::Node;

/// Per-instance binding state.
pub struct ReactiveBinding {
    reaction: Reaction,
    pending: Cell<bool>,
    unmounted: Cell<bool>,
}

impl ReactiveBinding {
    fn attach(instance: &Rc<Instance>, config: ObserverConfig) -> Rc<Self> {
        let name = format!("{}#{}.render()", instance.name(), instance.id());
        let weak_instance = Rc::downgrade(instance);

        let binding = Rc::new_cyclic(|weak_binding: &Weak<ReactiveBinding>| {
            let weak_binding = weak_binding.clone();
            let reaction = Reaction::new(name, move || {
                match (weak_binding.upgrade(), weak_instance.upgrade()) {
                    (Some(binding), Some(instance)) => binding.invalidate(&instance),
                    _ => Ok(()),
                }
            });
            ReactiveBinding {
                reaction,
                pending: Cell::new(false),
                unmounted: Cell::new(false),
            }
        });

        let base = instance.render_fn();
        let reactive: RenderFn = {
            let binding = binding.clone();
            Rc::new(move |inst: &Rc<Instance>| binding.render(inst, &base, config))
        };
        instance.set_render(reactive);
        instance.scratch_mut().binding = Some(binding.clone());

        tracing::debug!(reaction = %binding.reaction.name(), "reactive binding attached");
        binding
    }

    /// The reaction driving this instance.
    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    /// Whether an invalidation is waiting for its render.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.get()
    }

    fn render(
        &self,
        instance: &Rc<Instance>,
        base: &RenderFn,
        config: ObserverConfig,
    ) -> Result<Node, RenderError> {
        self.pending.set(false);

        let instrumented = config.is_tracking();
        if instrumented {
            let now = Instant::now();
            let mut scratch = instance.scratch_mut();
            scratch.render_start = Some(now);
            scratch.first_render_start.get_or_insert(now);
        }

        let result = {
            let base = base.clone();
            let target = instance.clone();
            self.reaction.track(move || base(&target))
        };

        if instrumented {
            instance.scratch_mut().render_end = Some(Instant::now());
        }
        if let Err(err) = &result {
            devtools::report_error(instance, err);
        }
        result
    }

    fn invalidate(&self, instance: &Rc<Instance>) -> Result<(), RenderError> {
        if self.pending.get() {
            return Ok(());
        }
        self.pending.set(true);
        instance.def().hooks().run(Phase::WillReact, instance);

        if self.unmounted.get() {
            return Ok(());
        }

        if let Err(err) = pipeline::force_update(instance) {
            tracing::debug!(reaction = %self.reaction.name(), error = %err, "forced update failed");
            self.reaction.dispose();
            return Err(err);
        }
        Ok(())
    }

    fn detach(&self) {
        self.reaction.dispose();
        self.unmounted.set(true);
    }
}

/// Install the binding's hooks and update gate on `def`.
pub(crate) fn install(def: &mut ComponentDef, config: ObserverConfig) {
    def.patch_hook(Phase::WillMount, move |instance| {
        if config.is_static() {
            return;
        }
        ReactiveBinding::attach(instance, config);
    });

    def.patch_hook(Phase::DidMount, move |instance| report_rendering(instance, config));
    def.patch_hook(Phase::DidUpdate, move |instance| report_rendering(instance, config));

    def.patch_hook(Phase::WillUnmount, move |instance| {
        let Some(binding) = instance.binding() else {
            return;
        };
        binding.detach();
        instance.scratch_mut().disposed = true;

        if !config.is_tracking() {
            return;
        }
        if config.is_static() {
            devtools::forget_component(instance);
        } else {
            devtools::report_destroy(instance);
        }
    });

    if def.should_update.is_none() {
        def.should_update = Some(gated(config));
    }
}

fn report_rendering(instance: &Rc<Instance>, config: ObserverConfig) {
    if config.is_tracking() && instance.is_reactive() {
        devtools::report_render(instance);
    }
}

fn gated(config: ObserverConfig) -> ShouldUpdateFn {
    should_update_fn(move |instance, next| {
        instance.with_snapshot(|current| engine::gate(&config, instance.name(), current, next))
    })
}

fn should_update_fn(check: impl Fn(&Instance, Snapshot<'_>) -> bool + 'static) -> ShouldUpdateFn {
    Rc::new(check)
}
