//! Seams between the coordination core and the host platform.
//!
//! The browser crate implements these against the DOM, `fetch` and
//! `localStorage`; tests use the in-memory adapters from
//! [`crate::infrastructure`].

use async_trait::async_trait;
use std::rc::Rc;

use crate::application::mount::PlayerOptions;
use crate::domain::InteractionEvent;
use crate::error::{LoadError, MountError, StoreError};

/// Document/global access needed to bring up the player runtime
#[async_trait(?Send)]
pub trait RuntimeHost {
    /// Whether a stylesheet link with this href is already in the document
    fn has_stylesheet(&self, href: &str) -> bool;

    fn inject_stylesheet(&self, href: &str);

    /// Inject a script tag and wait for it to load
    ///
    /// Resolves immediately when a script with the same src already exists.
    async fn load_script(&self, src: &str) -> Result<(), LoadError>;

    /// Whether the runtime's global entry point is reachable
    fn entry_point_available(&self) -> bool;

    async fn sleep(&self, ms: u32);
}

/// Existence check for a content manifest
#[async_trait(?Send)]
pub trait ContentProbe {
    /// `Ok` for a 2xx response, [`MountError::ContentNotFound`] otherwise
    async fn probe(&self, manifest_url: &str) -> Result<(), MountError>;
}

/// The UI container a player is rendered into
pub trait PlayerContainer {
    /// Handle to a constructed player; dropping it releases the player
    type Player: 'static;

    /// Remove all rendered content
    fn clear(&self);

    fn is_empty(&self) -> bool;

    fn construct(&self, options: &PlayerOptions) -> Result<Self::Player, MountError>;

    /// Simpler runtime initialisation used when `construct` fails
    fn fallback_init(&self) -> Result<Self::Player, MountError>;
}

/// Synchronous key-value persistence (`localStorage` semantics)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub type EventHandler = Rc<dyn Fn(&InteractionEvent)>;

/// Channel delivering interaction events in emission order
pub trait EventSource {
    fn subscribe(&self, handler: EventHandler) -> Subscription;
}

/// Best-effort remote sink for raw statements
///
/// Implementations must not block and must swallow (log) their own errors.
pub trait Collector {
    fn forward(&self, event: &InteractionEvent);
}

/// Disposer returned by [`EventSource::subscribe`]
///
/// Unsubscribes when dropped.
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
