use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::application::{PROGRESS_KEY, SUMMARY_KEY};
use crate::domain::{ActivityCatalog, ProgressRecord, ProgressSummary};

/// JSON Schemas of the values this crate persists or loads, by name
///
/// # Example
///
/// ```
/// use h5p_embed_core::application::PROGRESS_KEY;
/// use h5p_embed_core::schema::persisted_schemas;
///
/// for (name, schema) in persisted_schemas() {
///     let json = serde_json::to_string_pretty(&schema).unwrap();
///     println!("{name}: {json}");
/// }
/// assert!(persisted_schemas().iter().any(|(name, _)| *name == PROGRESS_KEY));
/// ```
pub fn persisted_schemas() -> Vec<(&'static str, RootSchema)> {
    vec![
        (PROGRESS_KEY, schema_for!(ProgressRecord)),
        (SUMMARY_KEY, schema_for!(ProgressSummary)),
        ("activities", schema_for!(ActivityCatalog)),
    ]
}
