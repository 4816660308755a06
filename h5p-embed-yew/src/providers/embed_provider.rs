use h5p_embed_core::application::TrackOutcome;
use h5p_embed_core::{ActivityCatalog, EmbedConfig, EventBridge, ProgressTracker, RuntimeLoader};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

use crate::hooks::{EmbedContext, Progress};
use crate::infrastructure::{BrowserStorage, DocumentEventSource, DomRuntimeHost, HttpCollector};

pub type WebRuntimeLoader = RuntimeLoader<DomRuntimeHost>;
pub type WebTracker = ProgressTracker<BrowserStorage>;

#[derive(Properties, PartialEq)]
pub struct EmbedProviderProps {
    pub config: EmbedConfig,
    pub catalog: ActivityCatalog,
    pub children: Children,
}

fn snapshot(tracker: &RefCell<WebTracker>) -> Progress {
    let tracker = tracker.borrow();
    Progress {
        record: tracker.record().clone(),
        summary: tracker.summary().clone(),
    }
}

/// Owns the shared runtime loader and the progress tracker for its subtree
///
/// xAPI events dispatched on the document are tracked for as long as the
/// provider is mounted.
#[function_component(EmbedProvider)]
pub fn embed_provider(props: &EmbedProviderProps) -> Html {
    let loader = use_memo(props.config.clone(), |config| {
        match RuntimeLoader::new(DomRuntimeHost::new(), config.loader_config()) {
            Ok(loader) => Some(loader),
            Err(err) => {
                tracing::error!(error = %err, "Invalid runtime configuration; players disabled");
                None
            }
        }
    });

    let tracker = use_memo(props.catalog.clone(), |catalog| {
        RefCell::new(ProgressTracker::new(catalog.clone(), BrowserStorage::new()))
    });

    let progress = {
        let tracker = tracker.clone();
        use_state(move || snapshot(&tracker))
    };

    {
        let tracker = tracker.clone();
        let progress = progress.clone();
        let collector_url = props.config.collector_url.clone();

        use_effect_with((props.catalog.clone(), collector_url), move |(_, collector_url)| {
            progress.set(snapshot(&tracker));

            let mut bridge = EventBridge::new(tracker.clone());
            if let Some(url) = collector_url {
                tracing::info!(endpoint = %url, "Forwarding statements to collector");
                bridge = bridge.with_collector(Rc::new(HttpCollector::new(url.clone())));
            }

            let listener = tracker.clone();
            let attached = bridge
                .on_outcome(move |outcome| {
                    if matches!(outcome, TrackOutcome::Updated { .. }) {
                        progress.set(snapshot(&listener));
                    }
                })
                .attach(&DocumentEventSource::new());

            move || attached.detach()
        });
    }

    let reset_progress = {
        let tracker = tracker.clone();
        let progress = progress.clone();
        Callback::from(move |_: ()| {
            tracing::info!("Resetting progress");
            tracker.borrow_mut().reset();
            progress.set(snapshot(&tracker));
        })
    };

    let clear_records = {
        let tracker = tracker.clone();
        Callback::from(move |_: ()| {
            tracing::info!("Clearing xAPI records");
            tracker.borrow().clear_records();
        })
    };

    let context = EmbedContext {
        config: props.config.clone(),
        catalog: props.catalog.clone(),
        loader: (*loader).clone(),
        progress: (*progress).clone(),
        reset_progress,
        clear_records,
    };

    html! {
        <ContextProvider<EmbedContext> {context}>
            {props.children.clone()}
        </ContextProvider<EmbedContext>>
    }
}
