use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::application::ports::KeyValueStore;
use crate::domain::{
    ActivityCatalog, Attributor, InteractionEvent, ProgressEntry, ProgressRecord, ProgressSummary,
    Slug,
};
use crate::error::StoreError;

/// Raw statements, appended in arrival order
pub const RECORDS_KEY: &str = "xapiRecords";
/// Per-activity progress map
pub const PROGRESS_KEY: &str = "h5pProgress";
/// Derived summary
pub const SUMMARY_KEY: &str = "h5pProgressSummary";

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What happened to one interaction event
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// Verb is not tracked
    Ignored,
    /// No activity matched; the event was dropped
    Unattributed,
    /// Progress entry for `slug` was overwritten
    Updated { slug: Slug, entry: ProgressEntry },
}

/// Aggregates xAPI statements into persisted per-activity progress
pub struct ProgressTracker<S> {
    catalog: ActivityCatalog,
    attributor: Attributor,
    store: S,
    record: ProgressRecord,
    summary: ProgressSummary,
    clock: Clock,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Create a tracker, restoring previously persisted progress
    ///
    /// Entries for slugs no longer in the catalog are dropped.
    pub fn new(catalog: ActivityCatalog, store: S) -> Self {
        let mut record = ProgressRecord::new();
        if let Some(stored) = read_json::<ProgressRecord>(&store, PROGRESS_KEY) {
            for (slug, entry) in stored.iter().filter(|(slug, _)| catalog.contains(slug)) {
                record.set(slug.clone(), *entry);
            }
        }

        let last_updated = read_json::<ProgressSummary>(&store, SUMMARY_KEY)
            .map(|s| s.last_updated)
            .unwrap_or_else(Utc::now);
        let summary = ProgressSummary::compute(&record, catalog.len(), last_updated);

        tracing::debug!(
            restored = record.len(),
            total = catalog.len(),
            "Progress tracker initialized"
        );

        Self {
            catalog,
            attributor: Attributor::new(),
            store,
            record,
            summary,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_attributor(mut self, attributor: Attributor) -> Self {
        self.attributor = attributor;
        self
    }

    pub fn attributor_mut(&mut self) -> &mut Attributor {
        &mut self.attributor
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.catalog
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn summary(&self) -> &ProgressSummary {
        &self.summary
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one interaction event
    pub fn handle(&mut self, event: &InteractionEvent) -> TrackOutcome {
        let statement = &event.statement;
        self.append_record(event.raw());

        if statement.tracked_verb().is_none() {
            tracing::trace!(verb = %statement.verb.id, "Ignoring untracked verb");
            return TrackOutcome::Ignored;
        }

        let Some(slug) = self.attributor.resolve(statement, &self.catalog) else {
            tracing::debug!(object_id = %statement.object.id, "No activity matches statement");
            return TrackOutcome::Unattributed;
        };

        let entry = ProgressEntry::new(statement.percent(), statement.success());
        tracing::info!(
            slug = %slug,
            percent = ?entry.percent,
            success = ?entry.success,
            "Progress updated"
        );
        self.record.set(slug.clone(), entry);
        self.refresh();

        TrackOutcome::Updated { slug, entry }
    }

    /// Raw statements recorded so far
    pub fn records(&self) -> Vec<serde_json::Value> {
        read_json(&self.store, RECORDS_KEY).unwrap_or_default()
    }

    pub fn clear_records(&self) {
        if let Err(err) = self.store.remove(RECORDS_KEY) {
            tracing::warn!(error = %err, "Failed to clear xAPI records");
        }
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.record.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.summary = ProgressSummary::compute(&self.record, self.catalog.len(), (self.clock)());
        self.persist();
    }

    fn persist(&self) {
        let results = [
            write_json(&self.store, PROGRESS_KEY, &self.record),
            write_json(&self.store, SUMMARY_KEY, &self.summary),
        ];
        for err in results.into_iter().filter_map(Result::err) {
            tracing::warn!(error = %err, "Failed to persist progress");
        }
    }

    fn append_record(&self, statement: &serde_json::Value) {
        let mut records = self.records();
        records.push(statement.clone());
        if let Err(err) = write_json(&self.store, RECORDS_KEY, &records) {
            tracing::warn!(error = %err, "Failed to persist xAPI record");
        }
    }
}

/// Unreadable or missing values count as absent
fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "Ignoring unreadable stored value");
            None
        }
    }
}

fn write_json<T: Serialize>(store: &impl KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}
