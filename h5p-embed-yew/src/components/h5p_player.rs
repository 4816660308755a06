use h5p_embed_core::application::MountState;
use h5p_embed_core::Activity;
use yew::prelude::*;

use crate::hooks::{use_embed, use_player_mount};

#[derive(Properties, PartialEq)]
pub struct H5PPlayerProps {
    pub activity: Activity,
}

fn state_class(state: &MountState) -> &'static str {
    match state {
        MountState::Idle => "idle",
        MountState::ProbingContent | MountState::LoadingRuntime | MountState::Constructing => "loading",
        MountState::Ready => "ready",
        MountState::Failed(_) => "failed",
        MountState::Disposed => "disposed",
    }
}

/// Renders one H5P activity into a container owned by the runtime
#[function_component(H5PPlayer)]
pub fn h5p_player(props: &H5PPlayerProps) -> Html {
    let embed = use_embed();
    let container = use_node_ref();
    let content_path = AttrValue::from(props.activity.content_path(&embed.config.content_base));

    let state = use_player_mount(container.clone(), content_path.clone(), props.activity.embed_mode);

    {
        let debug = props.activity.debug;
        let slug = props.activity.slug.clone();
        use_effect_with(state.clone(), move |state| {
            if debug {
                tracing::info!(slug = %slug, state = %state, "Player state changed");
            }
        });
    }

    html! {
        <div class={classes!("h5p-player", state_class(&state))} data-slug={props.activity.slug.clone()}>
            <div ref={container} class="h5p-player__container"></div>
            {if props.activity.debug {
                html! {
                    <pre class="h5p-player__debug">
                        {format!("{} ({}) - {}", content_path, props.activity.embed_mode, state)}
                    </pre>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
