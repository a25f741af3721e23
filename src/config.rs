//! Settings for the pagewalk CLI
//!
//! Settings come from, in increasing precedence:
//! built-in defaults, a YAML settings file, `PAGEWALK_*` environment
//! variables, and finally CLI flags (applied by the runner).
//!
//! ```yaml
//! endpoint: https://billingconductor.us-east-1.amazonaws.com
//! iteration_mode: default   # or "legacy"
//! timeout_secs: 30
//! headers:
//!   x-custom: value
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::pagination::IterationMode;
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable naming a settings file
pub const ENV_CONFIG: &str = "PAGEWALK_CONFIG";

/// Environment variable overriding the iteration mode
pub const ENV_ITERATION_MODE: &str = "PAGEWALK_ITERATION_MODE";

/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "PAGEWALK_ENDPOINT";

/// Resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service endpoint (falls back to the catalog's endpoint)
    pub endpoint: Option<String>,

    /// Global paging behavior
    pub iteration_mode: IterationMode,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent override
    pub user_agent: Option<String>,

    /// Headers added to every request
    pub headers: StringMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            iteration_mode: IterationMode::Default,
            timeout_secs: 30,
            user_agent: None,
            headers: StringMap::new(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        debug!(path = %path.display(), "loaded settings file");
        Self::from_yaml_str(&content)
    }

    /// Resolve defaults, settings file and environment.
    ///
    /// `path` wins over `PAGEWALK_CONFIG`.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok();

        let settings = match path {
            Some(p) => Self::load(p)?,
            None => match env(ENV_CONFIG).filter(|p| !p.is_empty()) {
                Some(p) => Self::load(p)?,
                None => Self::default(),
            },
        };

        settings.apply_env(env)
    }

    /// Apply `PAGEWALK_*` overrides from an environment lookup
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_ITERATION_MODE).filter(|v| !v.is_empty()) {
            self.iteration_mode = mode.parse()?;
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| Error::invalid_value("endpoint", format!("{endpoint}: {e}")))?;
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// HTTP client configuration, using `fallback_endpoint` when no
    /// endpoint is set
    pub fn http_config(&self, fallback_endpoint: Option<&str>) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_secs));

        if let Some(endpoint) = self.endpoint.as_deref().or(fallback_endpoint) {
            builder = builder.base_url(endpoint);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}
