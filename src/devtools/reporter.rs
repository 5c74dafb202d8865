//! Event streams with closure-based unsubscription.

use std::rc::Rc;

type Handler<T> = Rc<dyn Fn(&T)>;

/// A list of subscribers for one event type.
pub(crate) struct EventStream<T> {
    handlers: Vec<(usize, Handler<T>)>,
    next_id: usize,
}

impl<T> EventStream<T> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, handler: impl Fn(&T) + 'static) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((id, Rc::new(handler)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: usize) {
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
    }

    /// Handlers at this moment. Emitting from a snapshot lets a handler
    /// unsubscribe itself (or subscribe others) while the event is delivered.
    pub(crate) fn snapshot(&self) -> Vec<Handler<T>> {
        self.handlers.iter().map(|(_, h)| h.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn clear(&mut self) {
        self.handlers.clear();
        self.next_id = 0;
    }
}
