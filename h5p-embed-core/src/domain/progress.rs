use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::activity::Slug;

/// Latest known outcome for one activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressEntry {
    pub percent: Option<f64>,
    pub success: Option<bool>,
}

impl ProgressEntry {
    pub fn new(percent: Option<f64>, success: Option<bool>) -> Self {
        Self { percent, success }
    }
}

/// Per-activity progress, keyed by slug
///
/// Only the latest event per activity is retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProgressRecord {
    entries: BTreeMap<Slug, ProgressEntry>,
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the entry for `slug`
    pub fn set(&mut self, slug: impl Into<Slug>, entry: ProgressEntry) {
        self.entries.insert(slug.into(), entry);
    }

    pub fn get(&self, slug: &str) -> Option<&ProgressEntry> {
        self.entries.get(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Slug, &ProgressEntry)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean of all known percentages, 0 when there are none
    pub fn average_percent(&self) -> f64 {
        let percents: Vec<f64> = self.entries.values().filter_map(|e| e.percent).collect();
        if percents.is_empty() {
            0.0
        } else {
            percents.iter().sum::<f64>() / percents.len() as f64
        }
    }
}

/// Derived aggregate over a [`ProgressRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_activities: usize,
    pub completed_activities: usize,
    pub completion_rate: f64,
    pub average_score_percent: f64,
    pub last_updated: DateTime<Utc>,
}

impl ProgressSummary {
    pub fn compute(record: &ProgressRecord, total_activities: usize, now: DateTime<Utc>) -> Self {
        let completed_activities = record.len();
        let completion_rate = if total_activities == 0 {
            0.0
        } else {
            completed_activities as f64 / total_activities as f64 * 100.0
        };

        Self {
            total_activities,
            completed_activities,
            completion_rate,
            average_score_percent: record.average_percent(),
            last_updated: now,
        }
    }
}
