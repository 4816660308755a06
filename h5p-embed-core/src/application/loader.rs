use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::application::poll::{poll_until, PollOutcome};
use crate::application::ports::RuntimeHost;
use crate::config::LoaderConfig;
use crate::error::{ConfigError, LoadError};

type SharedLoad<T> = Shared<LocalBoxFuture<'static, Result<T, LoadError>>>;

/// Frame assets handed to every player instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAssets {
    pub frame_js: String,
    pub frame_css: String,
}

/// Lifecycle of the page-wide player runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

/// Deduplicates script loads by URL
///
/// Concurrent callers for the same URL share one in-flight load. Failed
/// loads are forgotten so a later call can try again.
struct ScriptCache<H> {
    host: Rc<H>,
    loads: Rc<RefCell<HashMap<String, SharedLoad<()>>>>,
}

impl<H> Clone for ScriptCache<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            loads: self.loads.clone(),
        }
    }
}

impl<H: RuntimeHost + 'static> ScriptCache<H> {
    fn new(host: Rc<H>) -> Self {
        Self {
            host,
            loads: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    async fn load_once(&self, src: &str) -> Result<(), LoadError> {
        let load = {
            let mut loads = self.loads.borrow_mut();
            loads
                .entry(src.to_string())
                .or_insert_with(|| {
                    tracing::debug!(url = %src, "Loading script");
                    let host = self.host.clone();
                    let src = src.to_string();
                    async move { host.load_script(&src).await }
                        .boxed_local()
                        .shared()
                })
                .clone()
        };

        let result = load.clone().await;
        if result.is_err() {
            let mut loads = self.loads.borrow_mut();
            if loads.get(src).is_some_and(|l| l.ptr_eq(&load)) {
                loads.remove(src);
            }
        }
        result
    }
}

struct LoaderInner<H> {
    host: Rc<H>,
    config: LoaderConfig,
    scripts: ScriptCache<H>,
    state: Rc<Cell<RuntimeState>>,
    runtime: RefCell<Option<SharedLoad<RuntimeAssets>>>,
}

/// Single-flight loader for the H5P player runtime
///
/// One loader is shared by all player mounts on a page. The first call to
/// [`RuntimeLoader::ensure_ready`] injects the stylesheet, loads the main
/// bundle and polls for the runtime entry point; every other caller awaits
/// the same operation. Only success is memoized.
pub struct RuntimeLoader<H> {
    inner: Rc<LoaderInner<H>>,
}

impl<H> Clone for RuntimeLoader<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H> PartialEq for RuntimeLoader<H> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<H: RuntimeHost + 'static> RuntimeLoader<H> {
    pub fn new(host: H, config: LoaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let host = Rc::new(host);
        Ok(Self {
            inner: Rc::new(LoaderInner {
                scripts: ScriptCache::new(host.clone()),
                host,
                config,
                state: Rc::new(Cell::new(RuntimeState::Unloaded)),
                runtime: RefCell::new(None),
            }),
        })
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    pub fn state(&self) -> RuntimeState {
        self.inner.state.get()
    }

    /// Make sure the runtime is loaded, loading it on first use
    pub async fn ensure_ready(&self) -> Result<RuntimeAssets, LoadError> {
        let load = self.shared_load();
        let result = load.clone().await;

        if let Err(err) = &result {
            let mut runtime = self.inner.runtime.borrow_mut();
            if runtime.as_ref().is_some_and(|r| r.ptr_eq(&load)) {
                tracing::warn!(error = %err, "Runtime load failed, next request will retry");
                *runtime = None;
            }
        }
        result
    }

    fn shared_load(&self) -> SharedLoad<RuntimeAssets> {
        let mut runtime = self.inner.runtime.borrow_mut();
        if let Some(load) = runtime.as_ref() {
            return load.clone();
        }

        let load = Self::load_runtime(
            self.inner.host.clone(),
            self.inner.scripts.clone(),
            self.inner.config.clone(),
            self.inner.state.clone(),
        )
        .boxed_local()
        .shared();

        *runtime = Some(load.clone());
        load
    }

    async fn load_runtime(
        host: Rc<H>,
        scripts: ScriptCache<H>,
        config: LoaderConfig,
        state: Rc<Cell<RuntimeState>>,
    ) -> Result<RuntimeAssets, LoadError> {
        state.set(RuntimeState::Loading);

        let frame_css = config.stylesheet_url();
        if host.has_stylesheet(&frame_css) {
            tracing::debug!(url = %frame_css, "Stylesheet already present");
        } else {
            host.inject_stylesheet(&frame_css);
        }

        if let Err(err) = scripts.load_once(&config.main_bundle_url()).await {
            state.set(RuntimeState::Failed);
            return Err(err);
        }

        let outcome = poll_until(
            config.retry_count,
            config.retry_interval_ms,
            || host.entry_point_available(),
            |ms| host.sleep(ms),
        )
        .await;

        match outcome {
            PollOutcome::Ready { waits } => {
                tracing::info!(waits, "H5P runtime ready");
                state.set(RuntimeState::Ready);
                Ok(RuntimeAssets {
                    frame_js: config.frame_bundle_url(),
                    frame_css,
                })
            }
            PollOutcome::Exhausted { waits } => {
                state.set(RuntimeState::Failed);
                Err(LoadError::EntryPointTimeout { attempts: waits })
            }
        }
    }
}
