//! # H5P Embed Yew Components
//!
//! Browser adapters and Yew components for embedding H5P activities.

pub mod app;
pub mod components;
pub mod hooks;
pub mod infrastructure;
pub mod pages;
pub mod providers;

// Re-exports for convenience
pub use app::App;
pub use components::{ActivityList, H5PPlayer, ProgressPanel};
pub use hooks::{use_embed, use_player_mount, use_progress, use_runtime_loader, EmbedContext};
pub use pages::ActivityPage;
pub use providers::{EmbedProvider, EmbedProviderProps};
