//! Configuration for the token relay service.

use std::path::PathBuf;
use std::time::Duration;

use crate::store::StorageKind;

/// Default settings.
pub mod defaults {
    use std::time::Duration;

    /// HTTP listen port.
    pub const PORT: u16 = 8000;

    /// Directory served for unmatched paths (the login frontend).
    pub const STATIC_DIR: &str = "public";

    /// Flat-file backend path.
    pub const FILE_PATH: &str = "data/tokens.json";

    /// Key-value backend connection URL.
    pub const REDIS_URL: &str = "redis://127.0.0.1:6379";

    /// Channel recorded when the request omits one.
    pub const CHANNEL: &str = "unknown";

    /// Paste backend request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Paste backend connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Service configuration.
///
/// The backend is selected explicitly here; there is no runtime probing of
/// what happens to be reachable. The one exception is the redis backend,
/// which falls back to in-memory storage when the server cannot be reached
/// at startup (see [`crate::store::connect`]).
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend to use.
    pub backend: StorageKind,

    /// HTTP listen port.
    pub port: u16,

    /// Static file directory for unmatched paths.
    pub static_dir: PathBuf,

    /// JSON file path (file backend).
    pub file_path: PathBuf,

    /// Redis connection URL (redis backend).
    pub redis_url: String,

    /// Paste service API endpoint (paste backend).
    pub paste_api_url: Option<String>,

    /// Paste service API token (paste backend).
    pub paste_api_token: Option<String>,

    /// Request timeout for the paste backend.
    pub request_timeout: Duration,

    /// Connection timeout for the paste backend.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration for the given backend with default settings.
    #[must_use]
    pub fn new(backend: StorageKind) -> Self {
        Self {
            backend,
            port: defaults::PORT,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            file_path: PathBuf::from(defaults::FILE_PATH),
            redis_url: defaults::REDIS_URL.to_string(),
            paste_api_url: None,
            paste_api_token: None,
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration with short timeouts.
    #[must_use]
    pub fn for_testing(backend: StorageKind) -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Self::new(backend)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(StorageKind::Memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_backend() {
        let config = Config::default();
        assert_eq!(config.backend, StorageKind::Memory);
        assert_eq!(config.port, defaults::PORT);
    }

    #[test]
    fn test_for_testing_shortens_timeouts() {
        let config = Config::for_testing(StorageKind::Paste);
        assert!(config.request_timeout < defaults::REQUEST_TIMEOUT);
        assert_eq!(config.backend, StorageKind::Paste);
    }
}
