use h5p_embed_core::ActivityCatalog;
use yew::prelude::*;

use crate::components::{ActivityList, H5PPlayer, ProgressPanel};
use crate::hooks::use_embed;

/// Slug requested via `?activity=`, if it names a known activity
fn requested_slug(catalog: &ActivityCatalog) -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    let slug = url.search_params().get("activity")?;
    if catalog.contains(&slug) {
        tracing::info!(slug = %slug, "Opening activity from URL");
        Some(slug)
    } else {
        tracing::warn!(slug = %slug, "Unknown activity requested in URL");
        None
    }
}

#[function_component(ActivityPage)]
pub fn activity_page() -> Html {
    let embed = use_embed();
    let selected = {
        let catalog = embed.catalog.clone();
        use_state(move || {
            requested_slug(&catalog).or_else(|| catalog.first().map(|a| a.slug.clone()))
        })
    };

    let on_select = {
        let selected = selected.clone();
        Callback::from(move |slug: String| {
            tracing::debug!(slug = %slug, "Activity selected");
            selected.set(Some(slug));
        })
    };

    let activity = selected
        .as_deref()
        .and_then(|slug| embed.catalog.get(slug))
        .cloned();

    html! {
        <div class="h5p-page">
            <header class="h5p-page__header">
                <h1>{"Learning activities"}</h1>
            </header>
            <div class="h5p-page__body">
                <aside class="h5p-page__sidebar">
                    <ActivityList
                        catalog={embed.catalog.clone()}
                        record={embed.progress.record.clone()}
                        selected={(*selected).clone().map(AttrValue::from)}
                        {on_select}
                    />
                    <ProgressPanel
                        summary={embed.progress.summary.clone()}
                        on_reset={embed.reset_progress.clone()}
                        on_clear_records={embed.clear_records.clone()}
                    />
                </aside>
                <main class="h5p-page__main">
                    {match activity {
                        Some(activity) => html! {
                            <section class="h5p-page__activity">
                                <h2>{&activity.title}</h2>
                                <p class="h5p-page__summary">{&activity.summary}</p>
                                <H5PPlayer activity={activity.clone()} />
                            </section>
                        },
                        None => html! {
                            <p class="h5p-page__empty">{"Select an activity to begin"}</p>
                        },
                    }}
                </main>
            </div>
        </div>
    }
}
