use h5p_embed_core::application::MountState;
use h5p_embed_core::{EmbedMode, MountConfig, PlayerMount};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::hooks::use_embed;
use crate::infrastructure::{DomContainer, DomRuntimeHost, HttpContentProbe};
use crate::providers::WebRuntimeLoader;

pub type WebPlayerMount = PlayerMount<DomContainer, HttpContentProbe, DomRuntimeHost>;

type MountSlot = Rc<RefCell<Option<(EmbedMode, Rc<WebPlayerMount>)>>>;

/// Reuse the mount for this container unless the embed mode changed
fn mount_for(
    slot: &MountSlot,
    container: &NodeRef,
    loader: WebRuntimeLoader,
    embed_mode: EmbedMode,
    config: MountConfig,
) -> Option<Rc<WebPlayerMount>> {
    let mut slot = slot.borrow_mut();
    if let Some((mode, mount)) = slot.as_ref() {
        if *mode == embed_mode {
            return Some(mount.clone());
        }
    }

    let element = container.cast::<Element>()?;
    let mount = Rc::new(
        PlayerMount::new(DomContainer::new(element), HttpContentProbe, loader)
            .with_embed_mode(embed_mode)
            .with_config(config),
    );
    *slot = Some((embed_mode, mount.clone()));
    Some(mount)
}

/// Mount the content at `content_path` into `container`
///
/// Changing the path tears the previous player down before the new one
/// starts; unmounting the component disposes the player.
#[hook]
pub fn use_player_mount(container: NodeRef, content_path: AttrValue, embed_mode: EmbedMode) -> MountState {
    let embed = use_embed();
    let state = use_state(|| MountState::Idle);
    let slot: MountSlot = use_mut_ref(|| None);

    {
        let state = state.clone();
        let loader = embed.loader.clone();
        let config = embed.config.mount_config();

        use_effect_with((content_path, embed_mode), move |(content_path, embed_mode)| {
            let mount = loader.and_then(|loader| mount_for(&slot, &container, loader, *embed_mode, config));

            match &mount {
                Some(mount) => {
                    let run = mount.load(content_path.to_string());
                    state.set(MountState::ProbingContent);
                    spawn_local(async move {
                        let outcome = run.await;
                        if outcome != MountState::Disposed {
                            state.set(outcome);
                        }
                    });
                }
                None => tracing::warn!(content = %content_path, "No runtime loader or container; skipping mount"),
            }

            move || {
                if let Some(mount) = mount {
                    mount.dispose();
                }
            }
        });
    }

    (*state).clone()
}
