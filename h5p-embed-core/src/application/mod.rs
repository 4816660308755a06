pub mod bridge;
pub mod loader;
pub mod mount;
pub mod poll;
pub mod ports;
pub mod tracker;

pub use bridge::{AttachedBridge, EventBridge};
pub use loader::{RuntimeAssets, RuntimeLoader, RuntimeState};
pub use mount::{manifest_url, MountId, MountState, PlayerMount, PlayerOptions};
pub use poll::{poll_until, PollOutcome};
pub use ports::{
    Collector, ContentProbe, EventHandler, EventSource, KeyValueStore, PlayerContainer,
    RuntimeHost, Subscription,
};
pub use tracker::{Clock, ProgressTracker, TrackOutcome, PROGRESS_KEY, RECORDS_KEY, SUMMARY_KEY};
