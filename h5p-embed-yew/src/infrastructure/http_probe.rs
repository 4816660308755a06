use async_trait::async_trait;
use gloo::net::http::Request;
use h5p_embed_core::application::ContentProbe;
use h5p_embed_core::MountError;

/// Checks that a content manifest answers with a success status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpContentProbe;

#[async_trait(?Send)]
impl ContentProbe for HttpContentProbe {
    async fn probe(&self, manifest_url: &str) -> Result<(), MountError> {
        let response = Request::get(manifest_url).send().await.map_err(|err| {
            tracing::warn!(url = manifest_url, error = %err, "Manifest request failed");
            MountError::ContentNotFound {
                url: manifest_url.to_string(),
                status: None,
            }
        })?;

        if response.ok() {
            Ok(())
        } else {
            Err(MountError::ContentNotFound {
                url: manifest_url.to_string(),
                status: Some(response.status()),
            })
        }
    }
}
