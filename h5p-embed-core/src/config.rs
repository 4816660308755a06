use crate::error::ConfigError;

pub const DEFAULT_PLAYER_BASE: &str = "/assets/h5p-player";
pub const DEFAULT_CONTENT_BASE: &str = "/h5p";

/// Site-wide embedding configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Base path serving `main.bundle.js`, `frame.bundle.js` and `styles/h5p.css`
    pub player_base: String,

    /// Base path under which each activity's content folder lives
    pub content_base: String,

    /// Cache-busting version appended as `?v=...` to runtime assets
    pub asset_version: Option<String>,

    /// Optional xAPI collector endpoint
    pub collector_url: Option<String>,

    /// Polls for the runtime entry point after the script loaded
    pub retry_count: u32,

    /// Delay between polls in milliseconds
    pub retry_interval_ms: u32,

    /// Delay before the post-mount container check in milliseconds
    pub settle_delay_ms: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            player_base: DEFAULT_PLAYER_BASE.to_string(),
            content_base: DEFAULT_CONTENT_BASE.to_string(),
            asset_version: None,
            collector_url: None,
            retry_count: 40,
            retry_interval_ms: 200,
            settle_delay_ms: 1500,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lookup(name: &str, compiled: Option<&'static str>) -> Option<String> {
    non_empty(std::env::var(name).ok()).or_else(|| non_empty(compiled.map(str::to_string)))
}

impl EmbedConfig {
    /// Read configuration from the environment
    ///
    /// Values baked in at compile time (`H5P_PLAYER_BASE`, `H5P_CONTENT_BASE`,
    /// `H5P_ASSET_VERSION`, `H5P_COLLECTOR_URL`) are used unless overridden at
    /// runtime. In the browser only compile-time values exist.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            player_base: lookup("H5P_PLAYER_BASE", option_env!("H5P_PLAYER_BASE"))
                .unwrap_or(defaults.player_base),
            content_base: lookup("H5P_CONTENT_BASE", option_env!("H5P_CONTENT_BASE"))
                .unwrap_or(defaults.content_base),
            asset_version: lookup("H5P_ASSET_VERSION", option_env!("H5P_ASSET_VERSION")),
            collector_url: lookup("H5P_COLLECTOR_URL", option_env!("H5P_COLLECTOR_URL")),
            ..defaults
        }
    }

    pub fn with_player_base(mut self, player_base: impl Into<String>) -> Self {
        self.player_base = player_base.into();
        self
    }

    pub fn with_content_base(mut self, content_base: impl Into<String>) -> Self {
        self.content_base = content_base.into();
        self
    }

    pub fn with_asset_version(mut self, version: impl Into<String>) -> Self {
        self.asset_version = Some(version.into());
        self
    }

    pub fn with_collector_url(mut self, url: impl Into<String>) -> Self {
        self.collector_url = Some(url.into());
        self
    }

    pub fn with_retry(mut self, count: u32, interval_ms: u32) -> Self {
        self.retry_count = count;
        self.retry_interval_ms = interval_ms;
        self
    }

    pub fn with_settle_delay(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.loader_config().validate()?;
        if self.content_base.trim().is_empty() {
            return Err(ConfigError::Invalid("content_base must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            player_base: self.player_base.trim_end_matches('/').to_string(),
            asset_version: self.asset_version.clone(),
            retry_count: self.retry_count,
            retry_interval_ms: self.retry_interval_ms,
        }
    }

    pub fn mount_config(&self) -> MountConfig {
        MountConfig {
            settle_delay_ms: self.settle_delay_ms,
        }
    }
}

/// Inputs of the runtime loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub player_base: String,
    pub asset_version: Option<String>,
    pub retry_count: u32,
    pub retry_interval_ms: u32,
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_base.trim().is_empty() {
            return Err(ConfigError::Invalid("player_base must not be empty".to_string()));
        }
        if self.retry_count == 0 {
            return Err(ConfigError::Invalid("retry_count must be > 0".to_string()));
        }
        if self.retry_interval_ms == 0 {
            return Err(ConfigError::Invalid("retry_interval_ms must be > 0".to_string()));
        }
        Ok(())
    }

    fn version_suffix(&self) -> String {
        match &self.asset_version {
            Some(v) => format!("?v={}", v),
            None => String::new(),
        }
    }

    pub fn stylesheet_url(&self) -> String {
        format!("{}/styles/h5p.css{}", self.player_base, self.version_suffix())
    }

    pub fn main_bundle_url(&self) -> String {
        format!("{}/main.bundle.js{}", self.player_base, self.version_suffix())
    }

    pub fn frame_bundle_url(&self) -> String {
        format!("{}/frame.bundle.js{}", self.player_base, self.version_suffix())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        EmbedConfig::default().loader_config()
    }
}

/// Per-mount settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountConfig {
    pub settle_delay_ms: u32,
}

impl Default for MountConfig {
    fn default() -> Self {
        EmbedConfig::default().mount_config()
    }
}
