use std::cell::RefCell;
use std::rc::Rc;

use crate::application::ports::{Collector, EventSource, KeyValueStore, Subscription};
use crate::application::tracker::{ProgressTracker, TrackOutcome};
use crate::domain::InteractionEvent;

type OutcomeListener = Rc<dyn Fn(&TrackOutcome)>;

/// Connects an event source to a progress tracker and optional collector
///
/// Every received statement is forwarded to the collector (best effort)
/// and handed to the tracker; listeners are notified after the tracker has
/// persisted its state.
pub struct EventBridge<S> {
    tracker: Rc<RefCell<ProgressTracker<S>>>,
    collector: Option<Rc<dyn Collector>>,
    listeners: Vec<OutcomeListener>,
}

impl<S: KeyValueStore + 'static> EventBridge<S> {
    pub fn new(tracker: Rc<RefCell<ProgressTracker<S>>>) -> Self {
        Self {
            tracker,
            collector: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_collector(mut self, collector: Rc<dyn Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn on_outcome(mut self, listener: impl Fn(&TrackOutcome) + 'static) -> Self {
        self.listeners.push(Rc::new(listener));
        self
    }

    pub fn tracker(&self) -> &Rc<RefCell<ProgressTracker<S>>> {
        &self.tracker
    }

    pub fn handle(&self, event: &InteractionEvent) -> TrackOutcome {
        if let Some(collector) = &self.collector {
            collector.forward(event);
        }

        let outcome = self.tracker.borrow_mut().handle(event);
        for listener in &self.listeners {
            listener(&outcome);
        }
        outcome
    }

    /// Subscribe to `source` until the returned handle is dropped
    pub fn attach(self, source: &impl EventSource) -> AttachedBridge {
        let bridge = Rc::new(self);
        let handler = bridge.clone();
        let subscription = source.subscribe(Rc::new(move |event: &InteractionEvent| {
            handler.handle(event);
        }));
        tracing::debug!("Event bridge attached");
        AttachedBridge {
            subscription: Some(subscription),
        }
    }
}

/// Live subscription of an [`EventBridge`]
#[derive(Debug)]
pub struct AttachedBridge {
    subscription: Option<Subscription>,
}

impl AttachedBridge {
    pub fn detach(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("Event bridge detached");
        }
    }
}
