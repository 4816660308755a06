use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::application::loader::RuntimeLoader;
use crate::application::ports::{ContentProbe, PlayerContainer, RuntimeHost};
use crate::config::MountConfig;
use crate::domain::EmbedMode;
use crate::error::MountError;

pub type MountId = Uuid;

/// Options passed to the player constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    pub h5p_json_path: String,
    pub frame_js: String,
    pub frame_css: String,
    pub embed_mode: EmbedMode,
}

/// Player mount lifecycle
///
/// `Idle -> ProbingContent -> LoadingRuntime -> Constructing -> Ready`,
/// `Failed` from any non-terminal state, `Disposed` from any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountState {
    Idle,
    ProbingContent,
    LoadingRuntime,
    Constructing,
    Ready,
    Failed(MountError),
    Disposed,
}

impl MountState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MountState::Ready | MountState::Failed(_) | MountState::Disposed)
    }
}

impl fmt::Display for MountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountState::Idle => write!(f, "idle"),
            MountState::ProbingContent => write!(f, "probing content"),
            MountState::LoadingRuntime => write!(f, "loading runtime"),
            MountState::Constructing => write!(f, "constructing"),
            MountState::Ready => write!(f, "ready"),
            MountState::Failed(err) => write!(f, "failed: {}", err),
            MountState::Disposed => write!(f, "disposed"),
        }
    }
}

/// Manifest URL probed before mounting, cache-busted with `cb`
pub fn manifest_url(content_path: &str, cache_buster: i64) -> String {
    format!(
        "{}/h5p.json?cb={}",
        content_path.trim_end_matches('/'),
        cache_buster
    )
}

struct MountInner<P> {
    state: MountState,
    content_path: Option<String>,
    generation: u64,
    abort: Option<AbortHandle>,
    player: Option<P>,
}

impl<P> MountInner<P> {
    /// Abort the current run and release its player
    fn teardown(&mut self) -> bool {
        let had_run = self.abort.is_some() || self.player.is_some();
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
        self.player = None;
        self.generation += 1;
        had_run
    }
}

/// Guards the side effects of one run against disposal and remounts
struct RunGuard<P> {
    id: MountId,
    inner: Rc<RefCell<MountInner<P>>>,
    generation: u64,
}

impl<P> RunGuard<P> {
    fn is_current(&self) -> bool {
        let inner = self.inner.borrow();
        inner.generation == self.generation && inner.state != MountState::Disposed
    }

    fn transition(&self, next: MountState) -> bool {
        if !self.is_current() {
            return false;
        }
        tracing::debug!(mount_id = %self.id, state = %next, "Mount transition");
        self.inner.borrow_mut().state = next;
        true
    }

    fn fail(&self, err: MountError) -> MountState {
        if !self.is_current() {
            return MountState::Disposed;
        }
        tracing::error!(mount_id = %self.id, error = %err, "Player mount failed");
        let state = MountState::Failed(err);
        self.inner.borrow_mut().state = state.clone();
        state
    }

    /// Store the player; hands it back when the run is stale
    fn install(&self, player: P) -> Result<(), P> {
        if !self.is_current() {
            return Err(player);
        }
        let mut inner = self.inner.borrow_mut();
        inner.player = Some(player);
        inner.state = MountState::Ready;
        inner.abort = None;
        Ok(())
    }
}

/// Mounts one H5P player into a container
///
/// Each call to [`PlayerMount::load`] tears down the previous run, clears
/// the container and starts a new lifecycle. The returned future drives the
/// lifecycle and must be spawned or awaited; [`PlayerMount::dispose`] (or
/// dropping the mount) aborts it.
pub struct PlayerMount<C: PlayerContainer, Q, H> {
    id: MountId,
    container: Rc<C>,
    probe: Rc<Q>,
    loader: RuntimeLoader<H>,
    embed_mode: EmbedMode,
    config: MountConfig,
    inner: Rc<RefCell<MountInner<C::Player>>>,
}

impl<C, Q, H> PlayerMount<C, Q, H>
where
    C: PlayerContainer + 'static,
    Q: ContentProbe + 'static,
    H: RuntimeHost + 'static,
{
    pub fn new(container: C, probe: Q, loader: RuntimeLoader<H>) -> Self {
        Self {
            id: Uuid::new_v4(),
            container: Rc::new(container),
            probe: Rc::new(probe),
            loader,
            embed_mode: EmbedMode::default(),
            config: MountConfig::default(),
            inner: Rc::new(RefCell::new(MountInner {
                state: MountState::Idle,
                content_path: None,
                generation: 0,
                abort: None,
                player: None,
            })),
        }
    }

    pub fn with_embed_mode(mut self, embed_mode: EmbedMode) -> Self {
        self.embed_mode = embed_mode;
        self
    }

    pub fn with_config(mut self, config: MountConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn state(&self) -> MountState {
        self.inner.borrow().state.clone()
    }

    pub fn content_path(&self) -> Option<String> {
        self.inner.borrow().content_path.clone()
    }

    pub fn has_player(&self) -> bool {
        self.inner.borrow().player.is_some()
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn loader(&self) -> &RuntimeLoader<H> {
        &self.loader
    }

    /// Start mounting `content_path`, replacing whatever was mounted before
    ///
    /// The container is emptied before this returns.
    pub fn load(&self, content_path: impl Into<String>) -> LocalBoxFuture<'static, MountState> {
        let content_path = content_path.into();
        let (abort, registration) = AbortHandle::new_pair();

        let generation = {
            let mut inner = self.inner.borrow_mut();
            if inner.teardown() {
                tracing::debug!(mount_id = %self.id, "Tore down previous player before remount");
            }
            inner.state = MountState::Idle;
            inner.content_path = Some(content_path.clone());
            inner.abort = Some(abort);
            inner.generation
        };
        self.container.clear();

        let guard = RunGuard {
            id: self.id,
            inner: self.inner.clone(),
            generation,
        };
        let run = Self::run(
            guard,
            self.container.clone(),
            self.probe.clone(),
            self.loader.clone(),
            self.embed_mode,
            self.config,
            content_path,
        );

        Abortable::new(run, registration)
            .map(|result| result.unwrap_or(MountState::Disposed))
            .boxed_local()
    }

    /// Abort any pending run and release the player
    pub fn dispose(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == MountState::Disposed {
            return;
        }
        inner.teardown();
        inner.state = MountState::Disposed;
        tracing::debug!(mount_id = %self.id, "Player mount disposed");
    }

    async fn run(
        guard: RunGuard<C::Player>,
        container: Rc<C>,
        probe: Rc<Q>,
        loader: RuntimeLoader<H>,
        embed_mode: EmbedMode,
        config: MountConfig,
        content_path: String,
    ) -> MountState {
        if !guard.transition(MountState::ProbingContent) {
            return MountState::Disposed;
        }
        let manifest = manifest_url(&content_path, chrono::Utc::now().timestamp_millis());
        if let Err(err) = probe.probe(&manifest).await {
            return guard.fail(err);
        }

        if !guard.transition(MountState::LoadingRuntime) {
            return MountState::Disposed;
        }
        let assets = match loader.ensure_ready().await {
            Ok(assets) => assets,
            Err(err) => return guard.fail(err.into()),
        };

        if !guard.transition(MountState::Constructing) {
            return MountState::Disposed;
        }
        let options = PlayerOptions {
            h5p_json_path: content_path.clone(),
            frame_js: assets.frame_js,
            frame_css: assets.frame_css,
            embed_mode,
        };
        let player = match container.construct(&options) {
            Ok(player) => player,
            Err(err) => {
                tracing::warn!(mount_id = %guard.id, error = %err, "Constructor failed, trying fallback init");
                match container.fallback_init() {
                    Ok(player) => player,
                    Err(fallback) => {
                        return guard.fail(MountError::Construction(format!(
                            "{}; fallback: {}",
                            err, fallback
                        )))
                    }
                }
            }
        };

        if guard.install(player).is_err() {
            return MountState::Disposed;
        }
        tracing::info!(mount_id = %guard.id, path = %content_path, "H5P player initialized");

        loader.host().sleep(config.settle_delay_ms).await;
        if guard.is_current() && container.is_empty() {
            tracing::warn!(
                mount_id = %guard.id,
                path = %content_path,
                "Container still empty after settle delay"
            );
        }
        MountState::Ready
    }
}

impl<C: PlayerContainer, Q, H> Drop for PlayerMount<C, Q, H> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.teardown();
        inner.state = MountState::Disposed;
    }
}
