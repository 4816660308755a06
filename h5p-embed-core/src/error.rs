/// Runtime (player library) loading errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load script {url}: {reason}")]
    ScriptFailed { url: String, reason: String },

    #[error("H5P runtime entry point not available after {attempts} attempts")]
    EntryPointTimeout { attempts: u32 },
}

/// Player mount lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
    #[error("Content not found at {url}{}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    ContentNotFound { url: String, status: Option<u16> },

    #[error("Runtime load failed: {0}")]
    RuntimeLoad(#[from] LoadError),

    #[error("Player construction failed: {0}")]
    Construction(String),
}

/// Key-value persistence errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Failed to serialize value for {key}: {reason}")]
    Serialization { key: String, reason: String },
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T, E = MountError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_not_found_message() {
        let err = MountError::ContentNotFound {
            url: "/h5p/x/h5p.json".to_string(),
            status: Some(404),
        };
        assert_eq!(err.to_string(), "Content not found at /h5p/x/h5p.json (HTTP 404)");

        let err = MountError::ContentNotFound {
            url: "/h5p/x/h5p.json".to_string(),
            status: None,
        };
        assert_eq!(err.to_string(), "Content not found at /h5p/x/h5p.json");
    }

    #[test]
    fn test_load_error_converts() {
        let err: MountError = LoadError::EntryPointTimeout { attempts: 40 }.into();
        assert!(matches!(err, MountError::RuntimeLoad(_)));
        assert!(err.to_string().contains("40 attempts"));
    }
}
