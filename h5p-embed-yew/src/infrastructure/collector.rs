use gloo::net::http::Request;
use h5p_embed_core::application::Collector;
use h5p_embed_core::InteractionEvent;
use wasm_bindgen_futures::spawn_local;

/// Posts every statement to a remote endpoint as `{"statement": ...}`
///
/// Delivery is fire-and-forget; failures are logged and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCollector {
    endpoint: String,
}

impl HttpCollector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Collector for HttpCollector {
    fn forward(&self, event: &InteractionEvent) {
        let body = event.payload();
        let endpoint = self.endpoint.clone();

        spawn_local(async move {
            let request = match Request::post(&endpoint).json(&body) {
                Ok(request) => request,
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "Failed to encode statement");
                    return;
                }
            };
            match request.send().await {
                Ok(response) if response.ok() => {
                    tracing::trace!(endpoint = %endpoint, "Statement forwarded");
                }
                Ok(response) => {
                    tracing::warn!(endpoint = %endpoint, status = response.status(), "Collector rejected statement");
                }
                Err(err) => {
                    tracing::warn!(endpoint = %endpoint, error = %err, "Collector unreachable");
                }
            }
        });
    }
}
