use async_trait::async_trait;
use futures::channel::oneshot;
use gloo::events::EventListener;
use gloo_timers::future::TimeoutFuture;
use h5p_embed_core::application::RuntimeHost;
use h5p_embed_core::LoadError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlLinkElement, HtmlScriptElement};

use super::{describe_js, window_property};

/// [`RuntimeHost`] backed by the page document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomRuntimeHost;

impl DomRuntimeHost {
    pub fn new() -> Self {
        Self
    }
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn has_element(selector: &str) -> bool {
    document()
        .and_then(|doc| doc.query_selector(selector).ok().flatten())
        .is_some()
}

fn script_failed(url: &str, reason: impl Into<String>) -> LoadError {
    LoadError::ScriptFailed {
        url: url.to_string(),
        reason: reason.into(),
    }
}

#[async_trait(?Send)]
impl RuntimeHost for DomRuntimeHost {
    fn has_stylesheet(&self, href: &str) -> bool {
        has_element(&format!("link[rel=\"stylesheet\"][href=\"{}\"]", href))
    }

    fn inject_stylesheet(&self, href: &str) {
        let Some(doc) = document() else {
            tracing::warn!("No document to inject stylesheet into");
            return;
        };
        let link = match doc
            .create_element("link")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok())
        {
            Some(link) => link,
            None => {
                tracing::warn!(href, "Failed to create stylesheet link");
                return;
            }
        };
        link.set_rel("stylesheet");
        link.set_href(href);
        if let Some(head) = doc.head() {
            if let Err(err) = head.append_child(&link) {
                tracing::warn!(href, error = %describe_js(&err), "Failed to inject stylesheet");
            }
        }
    }

    async fn load_script(&self, src: &str) -> Result<(), LoadError> {
        // A tag from an earlier page or another loader counts as loaded
        if has_element(&format!("script[src=\"{}\"]", src)) {
            return Ok(());
        }

        let doc = document().ok_or_else(|| script_failed(src, "no document"))?;
        let head = doc.head().ok_or_else(|| script_failed(src, "no document head"))?;
        let script: HtmlScriptElement = doc
            .create_element("script")
            .map_err(|e| script_failed(src, describe_js(&e)))?
            .dyn_into()
            .map_err(|_| script_failed(src, "not a script element"))?;
        script.set_src(src);
        script.set_async(true);

        let (tx, rx) = oneshot::channel::<Result<(), String>>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let settle = move |tx: &Rc<RefCell<Option<oneshot::Sender<Result<(), String>>>>>, result| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        };

        let on_load = {
            let tx = tx.clone();
            EventListener::once(&script, "load", move |_| settle(&tx, Ok(())))
        };
        let on_error = {
            let tx = tx.clone();
            EventListener::once(&script, "error", move |_| {
                settle(&tx, Err("script error event".to_string()))
            })
        };

        head.append_child(&script)
            .map_err(|e| script_failed(src, describe_js(&e)))?;
        tracing::debug!(src, "Script tag inserted");

        let result = rx
            .await
            .unwrap_or_else(|_| Err("script listener dropped".to_string()));
        drop((on_load, on_error));
        result.map_err(|reason| script_failed(src, reason))
    }

    fn entry_point_available(&self) -> bool {
        window_property("H5PStandalone").is_some() || window_property("H5P").is_some()
    }

    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}
