//! In-memory adapters for the application ports

mod event_channel;
mod memory_store;

pub use event_channel::LocalEventChannel;
pub use memory_store::MemoryStore;
