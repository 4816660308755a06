use h5p_embed_core::{ActivityCatalog, ProgressRecord};
use yew::prelude::*;

use super::format_percent;

#[derive(Properties, PartialEq)]
pub struct ActivityListProps {
    pub catalog: ActivityCatalog,
    pub record: ProgressRecord,
    #[prop_or_default]
    pub selected: Option<AttrValue>,
    pub on_select: Callback<String>,
}

/// Selectable list of activities with their tracked progress
#[function_component(ActivityList)]
pub fn activity_list(props: &ActivityListProps) -> Html {
    html! {
        <div class="h5p-activity-list">
            <h3 class="h5p-activity-list__title">{"Activities"}</h3>
            {if props.catalog.is_empty() {
                html! {
                    <p class="h5p-activity-list__empty">{"No activities yet"}</p>
                }
            } else {
                html! {
                    <ul class="h5p-activity-list__items">
                        {for props.catalog.iter().map(|activity| {
                            let entry = props.record.get(&activity.slug);
                            let is_selected = props.selected.as_deref() == Some(activity.slug.as_str());

                            let status_class = match entry {
                                Some(e) if e.success == Some(true) => "passed",
                                Some(_) => "attempted",
                                None => "untouched",
                            };

                            let onclick = {
                                let on_select = props.on_select.clone();
                                let slug = activity.slug.clone();
                                Callback::from(move |_: MouseEvent| on_select.emit(slug.clone()))
                            };

                            html! {
                                <li
                                    class={classes!(
                                        "h5p-activity-list__item",
                                        status_class,
                                        is_selected.then_some("selected")
                                    )}
                                    {onclick}
                                >
                                    <span class="h5p-activity-list__name">{&activity.title}</span>
                                    <span class="h5p-activity-list__score">
                                        {entry.map(|e| format_percent(e.percent)).unwrap_or_default()}
                                    </span>
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </div>
    }
}
