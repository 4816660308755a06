use async_trait::async_trait;
use cucumber::World;
use futures::future::poll_fn;
use h5p_embed_core::application::{
    Clock, ContentProbe, MountState, PlayerContainer, PlayerOptions, RuntimeHost, TrackOutcome,
};
use h5p_embed_core::infrastructure::MemoryStore;
use h5p_embed_core::{
    ActivityCatalog, LoadError, LoaderConfig, MountError, ProgressTracker, RuntimeAssets,
    RuntimeLoader,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::task::{Poll, Waker};

/// Yields to the executor once before completing
pub async fn yield_now() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

/// Everything a scripted host observed
#[derive(Debug, Default, Clone)]
pub struct HostLog {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub checks: u32,
    pub sleeps: u32,
}

/// How a scripted host behaves
#[derive(Debug, Default, Clone)]
pub struct HostScript {
    /// Entry point appears after this many failed checks (None = never)
    pub ready_after: Option<u32>,
    /// Number of script loads that fail before loads succeed
    pub script_failures: u32,
    /// Sleeps stay pending until released
    pub hold_sleeps: bool,
}

/// In-memory [`RuntimeHost`] driven by a [`HostScript`]
pub struct ScriptedHost {
    script: HostScript,
    log: Arc<Mutex<HostLog>>,
    failures_left: Cell<u32>,
    holding: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

impl ScriptedHost {
    pub fn new(script: HostScript, log: Arc<Mutex<HostLog>>) -> Self {
        Self {
            failures_left: Cell::new(script.script_failures),
            holding: Cell::new(script.hold_sleeps),
            script,
            log,
            wakers: RefCell::new(Vec::new()),
        }
    }

    pub fn release_sleeps(&self) {
        self.holding.set(false);
        for waker in self.wakers.borrow_mut().drain(..) {
            waker.wake();
        }
    }

    fn with_log<T>(&self, f: impl FnOnce(&mut HostLog) -> T) -> T {
        let mut log = self.log.lock().unwrap();
        f(&mut log)
    }
}

#[async_trait(?Send)]
impl RuntimeHost for ScriptedHost {
    fn has_stylesheet(&self, href: &str) -> bool {
        self.with_log(|log| log.stylesheets.iter().any(|s| s == href))
    }

    fn inject_stylesheet(&self, href: &str) {
        self.with_log(|log| log.stylesheets.push(href.to_string()));
    }

    async fn load_script(&self, src: &str) -> Result<(), LoadError> {
        self.with_log(|log| log.scripts.push(src.to_string()));
        yield_now().await;
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(LoadError::ScriptFailed {
                url: src.to_string(),
                reason: "network".to_string(),
            });
        }
        Ok(())
    }

    fn entry_point_available(&self) -> bool {
        let checks = self.with_log(|log| {
            log.checks += 1;
            log.checks
        });
        self.script.ready_after.is_some_and(|after| checks > after)
    }

    async fn sleep(&self, _ms: u32) {
        self.with_log(|log| log.sleeps += 1);
        if !self.holding.get() {
            return yield_now().await;
        }
        poll_fn(|cx| {
            if self.holding.get() {
                self.wakers.borrow_mut().push(cx.waker().clone());
                Poll::Pending
            } else {
                Poll::Ready(())
            }
        })
        .await
    }
}

/// Everything a recording container observed
#[derive(Debug, Default, Clone)]
pub struct ContainerLog {
    pub clears: u32,
    pub constructed: Vec<PlayerOptions>,
    pub fallback_inits: u32,
    pub released: u32,
}

/// Player handed out by [`RecordingContainer`]
pub struct RecordedPlayer {
    log: Arc<Mutex<ContainerLog>>,
}

impl Drop for RecordedPlayer {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.released += 1;
        }
    }
}

/// In-memory [`PlayerContainer`]
pub struct RecordingContainer {
    log: Arc<Mutex<ContainerLog>>,
    constructor_available: bool,
    has_content: Cell<bool>,
}

impl RecordingContainer {
    pub fn new(log: Arc<Mutex<ContainerLog>>, constructor_available: bool) -> Self {
        Self {
            log,
            constructor_available,
            has_content: Cell::new(false),
        }
    }

    fn player(&self) -> RecordedPlayer {
        self.has_content.set(true);
        RecordedPlayer {
            log: self.log.clone(),
        }
    }
}

impl PlayerContainer for RecordingContainer {
    type Player = RecordedPlayer;

    fn clear(&self) {
        self.has_content.set(false);
        self.log.lock().unwrap().clears += 1;
    }

    fn is_empty(&self) -> bool {
        !self.has_content.get()
    }

    fn construct(&self, options: &PlayerOptions) -> Result<RecordedPlayer, MountError> {
        if !self.constructor_available {
            return Err(MountError::Construction("constructor missing".to_string()));
        }
        self.log.lock().unwrap().constructed.push(options.clone());
        Ok(self.player())
    }

    fn fallback_init(&self) -> Result<RecordedPlayer, MountError> {
        self.log.lock().unwrap().fallback_inits += 1;
        Ok(self.player())
    }
}

/// [`ContentProbe`] over a fixed set of content paths
pub struct FixedProbe {
    existing: HashSet<String>,
    probes: Arc<Mutex<Vec<String>>>,
}

impl FixedProbe {
    pub fn new(existing: HashSet<String>, probes: Arc<Mutex<Vec<String>>>) -> Self {
        Self { existing, probes }
    }
}

#[async_trait(?Send)]
impl ContentProbe for FixedProbe {
    async fn probe(&self, manifest_url: &str) -> Result<(), MountError> {
        self.probes.lock().unwrap().push(manifest_url.to_string());
        yield_now().await;
        let path = manifest_url.split("/h5p.json").next().unwrap_or_default();
        if self.existing.contains(path) {
            Ok(())
        } else {
            Err(MountError::ContentNotFound {
                url: manifest_url.to_string(),
                status: Some(404),
            })
        }
    }
}

#[derive(World, Default)]
pub struct EmbedWorld {
    // Runtime loading
    pub host_script: HostScript,
    pub host_log: Arc<Mutex<HostLog>>,
    pub retry_count: Option<u32>,
    pub asset_version: Option<String>,
    pub load_results: Vec<Result<RuntimeAssets, LoadError>>,

    // Player mount
    pub existing_content: HashSet<String>,
    pub constructor_missing: bool,
    pub container_log: Arc<Mutex<ContainerLog>>,
    pub probes: Arc<Mutex<Vec<String>>>,
    pub mount_outcomes: Vec<(String, MountState)>,
    pub final_state: Option<MountState>,

    // Progress tracking
    pub catalog: ActivityCatalog,
    pub store: MemoryStore,
    pub tracker: Option<ProgressTracker<MemoryStore>>,
    pub last_outcome: Option<TrackOutcome>,
    pub last_statement: Option<serde_json::Value>,
}

impl fmt::Debug for EmbedWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedWorld")
            .field("host_script", &self.host_script)
            .field("load_results", &self.load_results)
            .field("mount_outcomes", &self.mount_outcomes)
            .field("catalog", &self.catalog)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}

impl EmbedWorld {
    pub fn loader_config(&self) -> LoaderConfig {
        let defaults = LoaderConfig::default();
        LoaderConfig {
            player_base: "/assets/h5p-player".to_string(),
            asset_version: self.asset_version.clone(),
            retry_count: self.retry_count.unwrap_or(defaults.retry_count),
            retry_interval_ms: defaults.retry_interval_ms,
        }
    }

    /// Fresh loader over a host following the current script
    pub fn loader(&self) -> RuntimeLoader<ScriptedHost> {
        let host = ScriptedHost::new(self.host_script.clone(), self.host_log.clone());
        RuntimeLoader::new(host, self.loader_config()).expect("valid loader config")
    }

    pub fn container(&self) -> RecordingContainer {
        RecordingContainer::new(self.container_log.clone(), !self.constructor_missing)
    }

    pub fn probe(&self) -> FixedProbe {
        FixedProbe::new(self.existing_content.clone(), self.probes.clone())
    }

    pub fn host_log(&self) -> HostLog {
        self.host_log.lock().unwrap().clone()
    }

    pub fn container_log(&self) -> ContainerLog {
        self.container_log.lock().unwrap().clone()
    }

    pub fn outcome_for(&self, path: &str) -> Option<&MountState> {
        self.mount_outcomes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, state)| state)
    }

    pub fn tracker(&mut self) -> &mut ProgressTracker<MemoryStore> {
        let catalog = self.catalog.clone();
        let store = self.store.clone();
        self.tracker
            .get_or_insert_with(|| ProgressTracker::new(catalog, store).with_clock(fixed_clock()))
    }

    /// Simulate a page reload: drop the tracker, keep the store
    pub fn reload(&mut self) {
        self.tracker = None;
    }
}

/// Clock pinned to 2024-05-01T12:00:00Z
pub fn fixed_clock() -> Clock {
    use chrono::TimeZone;
    Arc::new(|| {
        chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    })
}
