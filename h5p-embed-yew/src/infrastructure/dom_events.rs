use gloo::events::EventListener;
use h5p_embed_core::application::{EventHandler, EventSource, Subscription};
use h5p_embed_core::InteractionEvent;
use serde_json::Value;
use wasm_bindgen::JsValue;

use super::describe_js;

/// Event name the H5P runtime dispatches on `document`
pub const XAPI_EVENT: &str = "xAPI";

/// Subscribes to xAPI events dispatched on the page document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentEventSource;

impl DocumentEventSource {
    pub fn new() -> Self {
        Self
    }
}

/// Extract the statement from an event payload
///
/// The H5P runtime puts it under `data.statement`; `CustomEvent`s carry it
/// under `detail.statement`.
pub fn parse_event_payload(payload: &Value) -> Option<InteractionEvent> {
    let statement = ["data", "detail"]
        .iter()
        .find_map(|field| payload.get(*field)?.get("statement"))?;
    Some(InteractionEvent::from_statement(statement.clone()))
}

fn event_to_json(event: &web_sys::Event) -> Option<Value> {
    let mut payload = serde_json::Map::new();
    for field in ["data", "detail"] {
        let value = js_sys::Reflect::get(event, &JsValue::from_str(field)).ok()?;
        if value.is_undefined() || value.is_null() {
            continue;
        }
        let raw = match js_sys::JSON::stringify(&value) {
            Ok(raw) => String::from(raw),
            Err(err) => {
                tracing::debug!(field, error = %describe_js(&err), "Event payload not serializable");
                continue;
            }
        };
        if let Ok(json) = serde_json::from_str(&raw) {
            payload.insert(field.to_string(), json);
        }
    }
    Some(Value::Object(payload))
}

impl EventSource for DocumentEventSource {
    fn subscribe(&self, handler: EventHandler) -> Subscription {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            tracing::warn!("No document; xAPI events will not be observed");
            return Subscription::new(|| {});
        };

        let listener = EventListener::new(&document, XAPI_EVENT, move |event| {
            if let Some(parsed) = event_to_json(event).as_ref().and_then(parse_event_payload) {
                handler(&parsed);
            }
        });
        Subscription::new(move || drop(listener))
    }
}
