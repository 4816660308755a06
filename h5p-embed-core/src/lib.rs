//! Coordination core for embedding H5P content: runtime loading, player
//! mount lifecycle and xAPI progress tracking.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod schema;

pub use application::{
    EventBridge, MountState, PlayerMount, ProgressTracker, RuntimeAssets, RuntimeLoader,
    TrackOutcome,
};
pub use config::{EmbedConfig, LoaderConfig, MountConfig};
pub use domain::{
    Activity, ActivityCatalog, EmbedMode, InteractionEvent, ProgressEntry, ProgressRecord,
    ProgressSummary, Statement,
};
pub use error::{ConfigError, LoadError, MountError, StoreError};
