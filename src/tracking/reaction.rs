//! Reaction - a tracked computation built on spark-signals effects.
//!
//! `track(f)` runs `f` as the first run of a fresh effect, so every signal `f`
//! reads becomes a dependency. When any of them changes, the effect runs again;
//! that second run reads nothing, it only queues the reaction. The queue is
//! drained by [`run_reactions`], which calls each reaction's invalidation
//! handler outside of any effect. The handler is expected to call `track` again
//! (through a re-render), which replaces the spent effect with a new one.
//!
//! ```text
//! track(render) ──► effect run #1: render(), deps recorded
//! signal.set()  ──► effect run #2: queue reaction (no reads, no deps)
//! run_reactions ──► on_invalidate() ──► force update ──► track(render) ...
//! ```
//!
//! A reaction queues at most once per tracked run, so any number of changes
//! before the next drain collapse into a single invalidation. A queued entry
//! belongs to the run that queued it: if the reaction tracks again before the
//! drain, the entry is stale and is dropped.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{effect, flush_sync};

use super::scope::TrackingScope;
use crate::error::RenderError;

type Invalidate = Box<dyn Fn() -> Result<(), RenderError>>;

struct ReactionInner {
    name: String,
    on_invalidate: Invalidate,
    /// Stops the effect of the current tracked run.
    stop: RefCell<Option<Box<dyn FnOnce()>>>,
    /// Sequence number of the current tracked run.
    run: Cell<u64>,
    scheduled: Cell<bool>,
    disposed: Cell<bool>,
}

impl Drop for ReactionInner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.get_mut().take() {
            stop();
        }
    }
}

thread_local! {
    /// Reactions whose dependencies changed, in notification order, with the
    /// run that went stale.
    static PENDING: RefCell<VecDeque<(Weak<ReactionInner>, u64)>> = const { RefCell::new(VecDeque::new()) };

    /// Set while `run_reactions` is draining.
    static RUNNING: Cell<bool> = const { Cell::new(false) };
}

/// A named tracked computation with a disposal capability.
#[derive(Clone)]
pub struct Reaction {
    inner: Rc<ReactionInner>,
}

impl Reaction {
    /// Create a reaction. Nothing is tracked until [`Reaction::track`] runs.
    pub fn new(
        name: impl Into<String>,
        on_invalidate: impl Fn() -> Result<(), RenderError> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ReactionInner {
                name: name.into(),
                on_invalidate: Box::new(on_invalidate),
                stop: RefCell::new(None),
                run: Cell::new(0),
                scheduled: Cell::new(false),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Whether an invalidation is queued and not yet delivered.
    pub fn is_scheduled(&self) -> bool {
        self.inner.scheduled.get()
    }

    /// Run `f`, recording every signal it reads as a dependency of this reaction.
    ///
    /// Dependencies of the previous run are dropped. On a disposed reaction `f`
    /// runs untracked.
    pub fn track<T, F>(&self, f: F) -> Result<T, RenderError>
    where
        T: 'static,
        F: FnOnce() -> Result<T, RenderError> + 'static,
    {
        if self.is_disposed() {
            return f();
        }

        self.stop_current();
        let run = self.inner.run.get() + 1;
        self.inner.run.set(run);
        self.inner.scheduled.set(false);

        let mut task = Some(f);
        let output: Rc<RefCell<Option<Result<T, RenderError>>>> = Rc::new(RefCell::new(None));

        let stop = {
            let output = output.clone();
            let reaction = Rc::downgrade(&self.inner);
            let _scope = TrackingScope::enter(&self.inner.name);

            effect(move || {
                match task.take() {
                    Some(render) => {
                        let result = render();
                        *output.borrow_mut() = Some(result);
                    }
                    None => {
                        if let Some(inner) = reaction.upgrade() {
                            schedule(&inner, run);
                        }
                    }
                }
            })
        };
        *self.inner.stop.borrow_mut() = Some(Box::new(stop));

        // Effects run their first pass on creation
        let result = output.borrow_mut().take();
        result.unwrap_or_else(|| {
            Err(RenderError::NoOutput {
                reaction: self.inner.name.clone(),
            })
        })
    }

    /// Stop tracking for good. Idempotent; a disposed reaction never fires again.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.scheduled.set(false);
        self.stop_current();
        tracing::debug!(reaction = %self.inner.name, "reaction disposed");
    }

    fn stop_current(&self) {
        let stop = self.inner.stop.borrow_mut().take();
        if let Some(stop) = stop {
            stop();
        }
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("name", &self.inner.name)
            .field("scheduled", &self.inner.scheduled.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

fn schedule(inner: &Rc<ReactionInner>, run: u64) {
    if inner.disposed.get() || inner.run.get() != run || inner.scheduled.get() {
        return;
    }
    inner.scheduled.set(true);
    PENDING.with(|pending| pending.borrow_mut().push_back((Rc::downgrade(inner), run)));
    tracing::trace!(reaction = %inner.name, "reaction scheduled");
}

// =============================================================================
// Draining
// =============================================================================

struct RunningGuard;

impl Drop for RunningGuard {
    fn drop(&mut self) {
        RUNNING.with(|running| running.set(false));
    }
}

/// Deliver every queued invalidation.
///
/// Handlers run in notification order; invalidations raised while draining are
/// delivered in the same call. Re-entrant calls return immediately and leave the
/// work to the outer drain. Every handler runs even if an earlier one fails; the
/// first error is returned.
pub fn run_reactions() -> Result<(), RenderError> {
    if RUNNING.with(|running| running.replace(true)) {
        return Ok(());
    }
    let _running = RunningGuard;

    let mut first_error = None;
    loop {
        flush_sync();
        let next = PENDING.with(|pending| pending.borrow_mut().pop_front());
        let Some((next, run)) = next else { break };
        let Some(inner) = next.upgrade() else { continue };

        // Tracked again since it was queued
        if inner.run.get() != run {
            continue;
        }
        inner.scheduled.set(false);
        if inner.disposed.get() {
            continue;
        }
        if let Err(err) = (inner.on_invalidate)() {
            tracing::debug!(reaction = %inner.name, error = %err, "reaction failed");
            first_error.get_or_insert(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Run `f`, then deliver the invalidations it caused.
pub fn act<R>(f: impl FnOnce() -> R) -> Result<R, RenderError> {
    let result = f();
    run_reactions()?;
    Ok(result)
}

/// Number of queued invalidations.
pub fn pending_reactions() -> usize {
    PENDING.with(|pending| pending.borrow().len())
}

/// Drop queued invalidations (for testing).
pub fn reset_reactions() {
    PENDING.with(|pending| pending.borrow_mut().clear());
    RUNNING.with(|running| running.set(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    fn counting_reaction(name: &str) -> (Reaction, Rc<Cell<usize>>) {
        let invalidations = Rc::new(Cell::new(0));
        let count = invalidations.clone();
        let reaction = Reaction::new(name, move || {
            count.set(count.get() + 1);
            Ok(())
        });
        (reaction, invalidations)
    }

    #[test]
    fn test_track_returns_output() {
        reset_reactions();
        let (reaction, _) = counting_reaction("Test#0.render()");

        let value = signal(41);
        let read = value.clone();
        let out = reaction.track(move || Ok(read.get() + 1));

        assert_eq!(out, Ok(42));
    }

    #[test]
    fn test_change_invalidates_once() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let value = signal(0);
        let read = value.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        value.set(1);
        value.set(2);
        value.set(3);
        assert!(reaction.is_scheduled());
        assert_eq!(pending_reactions(), 1);

        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 1);
        assert!(!reaction.is_scheduled());
    }

    #[test]
    fn test_untracked_signal_does_not_invalidate() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let x = signal(0);
        let y = signal(0);
        let read = x.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        y.set(5);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 0);

        x.set(5);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 1);
    }

    #[test]
    fn test_retrack_replaces_dependencies() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let a = signal(0);
        let b = signal(0);
        let read_a = a.clone();
        reaction.track(move || Ok(read_a.get())).unwrap();
        let read_b = b.clone();
        reaction.track(move || Ok(read_b.get())).unwrap();

        a.set(1);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 0);

        b.set(1);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 1);
    }

    #[test]
    fn test_retrack_drops_queued_invalidation() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let value = signal(0);
        let read = value.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        value.set(1);
        assert_eq!(pending_reactions(), 1);

        // Re-rendered before the drain: the new run already saw the change
        let read = value.clone();
        assert_eq!(reaction.track(move || Ok(read.get())), Ok(1));
        assert!(!reaction.is_scheduled());

        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 0);

        // The new run still invalidates normally
        value.set(2);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 1);
    }

    #[test]
    fn test_disposed_reaction_never_fires() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let value = signal(0);
        let read = value.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        reaction.dispose();
        reaction.dispose();
        value.set(1);
        run_reactions().unwrap();

        assert!(reaction.is_disposed());
        assert_eq!(invalidations.get(), 0);
    }

    #[test]
    fn test_dispose_after_schedule_drops_delivery() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let value = signal(0);
        let read = value.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        value.set(1);
        reaction.dispose();
        run_reactions().unwrap();

        assert_eq!(invalidations.get(), 0);
    }

    #[test]
    fn test_disposed_track_runs_untracked() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");
        reaction.dispose();

        let value = signal(7);
        let read = value.clone();
        assert_eq!(reaction.track(move || Ok(read.get())), Ok(7));

        value.set(8);
        run_reactions().unwrap();
        assert_eq!(invalidations.get(), 0);
    }

    #[test]
    fn test_failed_render_leaves_scope() {
        reset_reactions();
        let (reaction, _) = counting_reaction("Broken#0.render()");

        let out: Result<(), RenderError> =
            reaction.track(|| Err(RenderError::failed("Broken", "nope")));

        assert!(out.is_err());
        assert!(!crate::tracking::is_tracking());
    }

    #[test]
    fn test_run_reactions_reports_first_error() {
        reset_reactions();
        let failing = Reaction::new("Failing#0.render()", || Err(RenderError::failed("Failing", "x")));

        let value = signal(0);
        let read = value.clone();
        failing.track(move || Ok(read.get())).unwrap();

        value.set(1);
        assert_eq!(run_reactions(), Err(RenderError::failed("Failing", "x")));
    }

    #[test]
    fn test_act_drains_queue() {
        reset_reactions();
        let (reaction, invalidations) = counting_reaction("Test#0.render()");

        let value = signal(0);
        let read = value.clone();
        reaction.track(move || Ok(read.get())).unwrap();

        act(|| value.set(10)).unwrap();
        assert_eq!(invalidations.get(), 1);
        assert_eq!(pending_reactions(), 0);
    }
}
