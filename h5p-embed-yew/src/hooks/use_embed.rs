use h5p_embed_core::{ActivityCatalog, EmbedConfig, ProgressRecord, ProgressSummary};
use yew::prelude::*;

use crate::providers::WebRuntimeLoader;

/// Progress snapshot published to components
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub record: ProgressRecord,
    pub summary: ProgressSummary,
}

/// Embedding state accessible via hook
#[derive(Clone)]
pub struct EmbedContext {
    pub config: EmbedConfig,
    pub catalog: ActivityCatalog,

    /// Shared runtime loader; `None` when the configuration is unusable
    pub loader: Option<WebRuntimeLoader>,

    pub progress: Progress,

    /// Forget all tracked progress
    pub reset_progress: Callback<()>,

    /// Drop the raw statement log
    pub clear_records: Callback<()>,
}

impl PartialEq for EmbedContext {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.catalog == other.catalog
            && self.loader == other.loader
            && self.progress == other.progress
    }
}

/// Hook to access embedding state
///
/// # Example
///
/// ```rust,ignore
/// use h5p_embed_yew::use_embed;
///
/// let embed = use_embed();
/// let done = embed.progress.summary.completed_activities;
/// embed.reset_progress.emit(());
/// ```
#[hook]
pub fn use_embed() -> EmbedContext {
    use_context::<EmbedContext>().expect("use_embed must be used within an EmbedProvider")
}

#[hook]
pub fn use_progress() -> Progress {
    use_embed().progress
}

#[hook]
pub fn use_runtime_loader() -> Option<WebRuntimeLoader> {
    use_embed().loader
}
