//! Deployment configuration, read once at startup and shared read-only.
//!
//! Configuration is a JSON document. Every key is optional; missing keys
//! take the defaults below.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `pattern` | `v1/*` | Path glob identifying API routes |
//! | `domain` | `api.example.com` | Host that identifies API requests |
//! | `serializer` | `array` | Envelope strategy: `array` or `data_array` |
//! | `defaultHeaders` | `{}` | Headers added to every response |
//! | `successFormat` | `{"success": {"code": ":code", "message": ":message"}}` | Success envelope template |
//! | `errorFormat` | `{"error": {"code": ":code", "message": ":message"}}` | Error envelope template |
//! | `timestamps` | `iso8601` | Timestamp rendering: `iso8601` or `unix` |
//!
//! [`ApiConfig::from_env`] reads the file named by `APISHAPE_CONFIG`, if set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::attr::{object, AttributeMap, TimestampFormat};
use crate::serializer::{ArraySerializer, DataArraySerializer, ResourceSerializer};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "APISHAPE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must not be empty")]
    EmptyTemplate(&'static str),

    #[error("pattern {pattern:?} is not a valid glob: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which [`ResourceSerializer`] wraps transformed data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializerKind {
    #[default]
    Array,
    DataArray,
}

impl SerializerKind {
    pub fn serializer(self) -> &'static dyn ResourceSerializer {
        match self {
            SerializerKind::Array => &ArraySerializer,
            SerializerKind::DataArray => &DataArraySerializer,
        }
    }
}

/// Response formatting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub pattern: String,
    pub domain: Option<String>,
    pub serializer: SerializerKind,
    pub default_headers: BTreeMap<String, String>,
    pub success_format: AttributeMap,
    pub error_format: AttributeMap,
    pub timestamps: TimestampFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            pattern: "v1/*".into(),
            domain: Some("api.example.com".into()),
            serializer: SerializerKind::Array,
            default_headers: BTreeMap::new(),
            success_format: object(json!({
                "success": {"code": ":code", "message": ":message"}
            })),
            error_format: object(json!({
                "error": {"code": ":code", "message": ":message"}
            })),
            timestamps: TimestampFormat::Iso8601,
        }
    }
}

impl ApiConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Load from the file named by `APISHAPE_CONFIG`, or use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => {
                tracing::info!("config: loading {path}");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.success_format.is_empty() {
            return Err(ConfigError::EmptyTemplate("successFormat"));
        }
        if self.error_format.is_empty() {
            return Err(ConfigError::EmptyTemplate("errorFormat"));
        }
        self.pattern_regex()?;
        Ok(())
    }

    pub fn resource_serializer(&self) -> &'static dyn ResourceSerializer {
        self.serializer.serializer()
    }

    /// Whether a request targets the API: its path matches `pattern` or its
    /// host equals `domain`.
    pub fn is_api_request(&self, path: &str, host: Option<&str>) -> bool {
        if let (Some(domain), Some(host)) = (self.domain.as_deref(), host) {
            let host = host.split(':').next().unwrap_or(host);
            if !domain.is_empty() && host.eq_ignore_ascii_case(domain) {
                return true;
            }
        }
        match self.pattern_regex() {
            Ok(re) => re.is_match(path.trim_start_matches('/')),
            Err(e) => {
                tracing::warn!("config: {e}");
                false
            }
        }
    }

    /// `*` matches any run of characters, `/` included; the match is anchored.
    fn pattern_regex(&self) -> Result<Regex, ConfigError> {
        let body = regex::escape(self.pattern.trim_start_matches('/')).replace(r"\*", ".*");
        Regex::new(&format!("^{body}$")).map_err(|source| ConfigError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })
    }
}
