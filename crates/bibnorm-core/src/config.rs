//! Configuration for bibnorm-core
//!
//! Request settings are passed explicitly to the HTTP client and the DBLP
//! source; nothing here is process-wide state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::FieldSchema;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Per-request HTTP settings
    pub http: HttpConfig,
    /// DBLP endpoints and search limits
    pub dblp: DblpConfig,
    /// Allowed fields and venue field per entry type
    pub schema: FieldSchema,
}

/// HTTP request settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Extra attempts after a transport failure (0 = fail on first error)
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            accept_invalid_certs: false,
            max_retries: 0,
            user_agent: concat!("bibnorm/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// DBLP endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DblpConfig {
    pub publication_search_url: String,
    pub venue_search_url: String,
    /// Prefix of canonical venue URLs, e.g. `https://dblp.org/db/`
    pub db_base_url: String,
    /// Maximum hits requested per title search
    pub max_hits: u32,
}

impl Default for DblpConfig {
    fn default() -> Self {
        Self {
            publication_search_url: "https://dblp.org/search/publ/api".to_string(),
            venue_search_url: "https://dblp.org/search/venue/api".to_string(),
            db_base_url: "https://dblp.org/db/".to_string(),
            max_hits: 1000,
        }
    }
}

impl ReconcileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Read and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/bibnorm/config.toml`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bibnorm").join("config.toml"))
    }

    /// Load from the default path when the file exists, defaults otherwise
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "http.timeout_secs must be positive".to_string(),
            ));
        }

        if self.dblp.max_hits == 0 {
            return Err(ConfigError::OutOfRange(
                "dblp.max_hits must be positive".to_string(),
            ));
        }

        for (name, url) in [
            ("dblp.publication_search_url", &self.dblp.publication_search_url),
            ("dblp.venue_search_url", &self.dblp.venue_search_url),
            ("dblp.db_base_url", &self.dblp.db_base_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }

        self.schema.validate()
    }
}

/// Configuration loading or validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Could not serialize config: {0}")]
    Serialize(String),
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UnconfiguredPolicy;
    use bibnorm_bibtex::EntryType;

    #[test]
    fn test_default_config() {
        let config = ReconcileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.dblp.max_hits, 1000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ReconcileConfig::from_toml(
            r#"
[http]
timeout_secs = 5
accept_invalid_certs = true

[schema]
unconfigured = "pass-through"
"#,
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 5);
        assert!(config.http.accept_invalid_certs);
        assert_eq!(config.dblp, DblpConfig::default());
        assert_eq!(config.schema.unconfigured, UnconfiguredPolicy::PassThrough);
        assert!(config.schema.allowed_fields(&EntryType::Article).is_some());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReconcileConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = ReconcileConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_config() {
        let config = ReconcileConfig::from_json(r#"{"dblp": {"max_hits": 50}}"#).unwrap();
        assert_eq!(config.dblp.max_hits, 50);
        assert_eq!(config.dblp.db_base_url, "https://dblp.org/db/");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ReconcileConfig::default();
        config.http.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut config = ReconcileConfig::default();
        config.dblp.venue_search_url = " ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = ReconcileConfig::load(Path::new("/nonexistent/bibnorm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
