use h5p_embed_core::application::{PlayerContainer, PlayerOptions};
use h5p_embed_core::MountError;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::Element;

use super::{describe_js, window_property};

/// Live player instance; dropping it releases the reference
#[derive(Debug)]
pub struct PlayerHandle {
    _instance: JsValue,
}

/// The standalone player constructor, `H5PStandalone.H5P` or a global `H5P`
pub fn runtime_constructor() -> Option<Function> {
    let standalone = window_property("H5PStandalone")
        .and_then(|ns| Reflect::get(&ns, &JsValue::from_str("H5P")).ok())
        .and_then(|ctor| ctor.dyn_into::<Function>().ok());
    standalone.or_else(|| window_property("H5P").and_then(|ctor| ctor.dyn_into::<Function>().ok()))
}

fn construction(reason: impl Into<String>) -> MountError {
    MountError::Construction(reason.into())
}

fn set(target: &Object, key: &str, value: &str) -> Result<(), MountError> {
    Reflect::set(target, &JsValue::from_str(key), &JsValue::from_str(value))
        .map(|_| ())
        .map_err(|e| construction(describe_js(&e)))
}

/// [`PlayerContainer`] over a DOM element
#[derive(Debug, Clone, PartialEq)]
pub struct DomContainer {
    element: Element,
}

impl DomContainer {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl PlayerContainer for DomContainer {
    type Player = PlayerHandle;

    fn clear(&self) {
        self.element.set_inner_html("");
    }

    fn is_empty(&self) -> bool {
        self.element.child_element_count() == 0
    }

    fn construct(&self, options: &PlayerOptions) -> Result<PlayerHandle, MountError> {
        let ctor = runtime_constructor().ok_or_else(|| construction("player constructor not available"))?;

        let js_options = Object::new();
        set(&js_options, "h5pJsonPath", &options.h5p_json_path)?;
        set(&js_options, "frameJs", &options.frame_js)?;
        set(&js_options, "frameCss", &options.frame_css)?;
        set(&js_options, "embedType", options.embed_mode.as_str())?;

        let args = Array::of2(self.element.as_ref(), &js_options);
        let instance = Reflect::construct(&ctor, &args).map_err(|e| construction(describe_js(&e)))?;

        // The standalone player resolves asynchronously; rejections only get logged
        if let Some(promise) = instance.dyn_ref::<Promise>() {
            let pending = JsFuture::from(promise.clone());
            let path = options.h5p_json_path.clone();
            spawn_local(async move {
                if let Err(err) = pending.await {
                    tracing::error!(content = %path, error = %describe_js(&err), "Player initialization rejected");
                }
            });
        }

        Ok(PlayerHandle { _instance: instance })
    }

    fn fallback_init(&self) -> Result<PlayerHandle, MountError> {
        let h5p = window_property("H5P").ok_or_else(|| construction("no H5P global"))?;
        let init = Reflect::get(&h5p, &JsValue::from_str("init"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| construction("H5P.init not available"))?;
        init.call1(&h5p, self.element.as_ref())
            .map_err(|e| construction(describe_js(&e)))?;
        Ok(PlayerHandle { _instance: h5p })
    }
}
