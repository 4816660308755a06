use h5p_embed_core::{ActivityCatalog, EmbedConfig};
use yew::prelude::*;

use crate::pages::ActivityPage;
use crate::providers::EmbedProvider;

/// Demo site: the bundled catalog with configuration from the build environment
#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| {
        let config = EmbedConfig::from_env();
        if let Err(err) = config.validate() {
            tracing::error!(error = %err, "Embed configuration is invalid");
        }
        config
    });
    let catalog = use_memo((), |_| ActivityCatalog::demo());

    html! {
        <EmbedProvider config={(*config).clone()} catalog={(*catalog).clone()}>
            <ActivityPage />
        </EmbedProvider>
    }
}
