//! Browser adapters for the core ports

mod collector;
mod dom_container;
mod dom_events;
mod dom_host;
mod http_probe;
mod local_storage;

pub use collector::HttpCollector;
pub use dom_container::{runtime_constructor, DomContainer, PlayerHandle};
pub use dom_events::{parse_event_payload, DocumentEventSource, XAPI_EVENT};
pub use dom_host::DomRuntimeHost;
pub use http_probe::HttpContentProbe;
pub use local_storage::BrowserStorage;

use wasm_bindgen::JsValue;

/// Best-effort text for a thrown JS value
pub(crate) fn describe_js(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

pub(crate) fn window_property(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}
