mod embed_provider;

pub use embed_provider::{EmbedProvider, EmbedProviderProps, WebRuntimeLoader, WebTracker};
