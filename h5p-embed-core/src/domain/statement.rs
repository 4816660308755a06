use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Extension key carrying the local H5P content id
pub const CONTENT_ID_EXTENSION: &str = "http://h5p.org/x-api/h5p-local-content-id";

/// xAPI statement as emitted by the H5P runtime
///
/// Typed view of the fields used for progress tracking. Recording and
/// forwarding use the original JSON held by [`InteractionEvent`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default)]
    pub verb: Verb,

    #[serde(default)]
    pub object: StatementObject,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StatementResult>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verb {
    #[serde(default)]
    pub id: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementObject {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<ObjectDefinition>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extensions: HashMap<String, serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Raw/max score; non-numeric values deserialize as `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default, deserialize_with = "lenient_number")]
    pub raw: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// Verbs that update progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedVerb {
    Answered,
    Completed,
}

impl TrackedVerb {
    /// Classify a verb IRI by its suffix
    pub fn from_id(id: &str) -> Option<Self> {
        if id.ends_with("/answered") {
            Some(TrackedVerb::Answered)
        } else if id.ends_with("/completed") {
            Some(TrackedVerb::Completed)
        } else {
            None
        }
    }
}

impl Statement {
    pub fn tracked_verb(&self) -> Option<TrackedVerb> {
        TrackedVerb::from_id(&self.verb.id)
    }

    /// Local content id from the object definition extensions
    ///
    /// H5P emits numbers or strings here depending on the host.
    pub fn content_id(&self) -> Option<String> {
        let value = self
            .object
            .definition
            .as_ref()?
            .extensions
            .get(CONTENT_ID_EXTENSION)?;

        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<&Score> {
        self.result.as_ref()?.score.as_ref()
    }

    pub fn success(&self) -> Option<bool> {
        self.result.as_ref()?.success
    }

    /// Score as a percentage, `None` unless both values are numeric and `max > 0`
    pub fn percent(&self) -> Option<f64> {
        self.score().and_then(|s| s.percent())
    }
}

impl Score {
    pub fn percent(&self) -> Option<f64> {
        match (self.raw, self.max) {
            (Some(raw), Some(max)) if max > 0.0 => Some(raw / max * 100.0),
            _ => None,
        }
    }
}

/// Interaction event payload: `{ "statement": { ... } }`
///
/// Keeps the statement exactly as received next to its typed view. A
/// statement whose tracked fields do not parse gets an empty typed view and
/// is still recorded and forwarded.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    pub statement: Statement,
    raw: Value,
}

impl InteractionEvent {
    pub fn new(statement: Statement) -> Self {
        let raw = serde_json::to_value(&statement).unwrap_or_default();
        Self { statement, raw }
    }

    /// Wrap a statement as received from the runtime
    pub fn from_statement(raw: Value) -> Self {
        let statement = Statement::deserialize(&raw).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "Statement fields not trackable");
            Statement::default()
        });
        Self { statement, raw }
    }

    /// Parse a `{ "statement": ... }` payload
    pub fn from_json(mut value: Value) -> Result<Self, serde_json::Error> {
        match value.get_mut("statement").map(Value::take) {
            Some(raw) => Ok(Self::from_statement(raw)),
            None => Err(serde::de::Error::missing_field("statement")),
        }
    }

    /// The statement exactly as received
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Body sent to a collector
    pub fn payload(&self) -> Value {
        serde_json::json!({ "statement": self.raw })
    }
}

impl Serialize for InteractionEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InteractionEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}
