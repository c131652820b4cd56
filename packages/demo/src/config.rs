//! Service configuration, populated from environment variables.

use std::net::SocketAddr;
use std::sync::Arc;

use apishape::ApiConfig;
use thiserror::Error;

/// Projects per page on `GET /v1/projects`.
pub const PER_PAGE: u64 = 25;

/// Runtime configuration for the demo service.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `APISHAPE_BIND` | `0.0.0.0:3000` | TCP socket address to listen on |
/// | `APISHAPE_BASE_URL` | derived from `APISHAPE_BIND` | Origin used in pagination links |
/// | `APISHAPE_CONFIG` | (absent = defaults) | Path to the response-shaping config JSON |
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Origin prefixed to pagination links, without trailing slash.
    /// Example: `"https://api.example.com"`.
    pub base_url: String,

    /// Response-shaping configuration shared with every request.
    pub api: Arc<ApiConfig>,

    pub per_page: u64,
}

#[derive(Debug, Error)]
pub enum DemoConfigError {
    #[error("APISHAPE_BIND must be a socket address (e.g. 0.0.0.0:3000), got {value:?}")]
    Bind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Api(#[from] apishape::ConfigError),
}

impl DemoConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, DemoConfigError> {
        let raw = std::env::var("APISHAPE_BIND").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let bind_addr: SocketAddr = raw
            .parse()
            .map_err(|source| DemoConfigError::Bind { value: raw.clone(), source })?;

        let base_url = std::env::var("APISHAPE_BASE_URL")
            .unwrap_or_else(|_| format!("http://{bind_addr}"));

        Ok(Self::new(bind_addr, base_url, ApiConfig::from_env()?))
    }

    pub fn new(bind_addr: SocketAddr, base_url: impl Into<String>, api: ApiConfig) -> Self {
        Self {
            bind_addr,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api: Arc::new(api),
            per_page: PER_PAGE,
        }
    }

    /// URL of a path on this service.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
