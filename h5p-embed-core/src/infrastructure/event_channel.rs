use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::application::ports::{EventHandler, EventSource, Subscription};
use crate::domain::InteractionEvent;

type Handlers = Rc<RefCell<Vec<(u64, EventHandler)>>>;

/// Synchronous in-process event channel
///
/// Handlers run in subscription order, on the emitting call.
#[derive(Clone, Default)]
pub struct LocalEventChannel {
    handlers: Handlers,
    next_id: Rc<Cell<u64>>,
}

impl LocalEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: &InteractionEvent) {
        // handlers may unsubscribe while we iterate
        let handlers: Vec<EventHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl EventSource for LocalEventChannel {
    fn subscribe(&self, handler: EventHandler) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, handler));

        let handlers = Rc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers.borrow_mut().retain(|(hid, _)| *hid != id);
            }
        })
    }
}
