pub mod activity;
pub mod attribution;
pub mod progress;
pub mod statement;

pub use activity::{Activity, ActivityCatalog, CatalogError, EmbedMode, Slug};
pub use attribution::Attributor;
pub use progress::{ProgressEntry, ProgressRecord, ProgressSummary};
pub use statement::{InteractionEvent, Score, Statement, TrackedVerb, CONTENT_ID_EXTENSION};
