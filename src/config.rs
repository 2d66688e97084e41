//! Run configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional YAML file,
//! environment variables, then explicit command-line values (applied by the
//! binary). [`BenchConfig::validate`] runs before anything is dispatched.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_ENDPOINT: &str = "https://api.cerebras.ai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";
pub const DEFAULT_OUTPUT_FILE: &str = "throughput_stats.json";
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "AI_BENCH_API_KEY";

/// HTTP client knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds; 0 disables it
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub proxy_url: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            pool_max_idle_per_host: 32,
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub input_file: Option<PathBuf>,
    pub output_file: PathBuf,
    pub concurrent_requests: usize,
    pub http: HttpSettings,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            input_file: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            concurrent_requests: DEFAULT_CONCURRENCY,
            http: HttpSettings::default(),
        }
    }
}

impl BenchConfig {
    /// Load a YAML config file; missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| {
            Error::configuration_with_context(
                e.to_string(),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup (the process environment in production).
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(v) = lookup("AI_HTTP_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => self.http.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid AI_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = lookup("AI_HTTP_POOL_MAX_IDLE_PER_HOST") {
            match v.parse() {
                Ok(n) => self.http.pool_max_idle_per_host = n,
                Err(_) => {
                    tracing::warn!(value = %v, "ignoring invalid AI_HTTP_POOL_MAX_IDLE_PER_HOST")
                }
            }
        }
        if let Some(proxy) = lookup("AI_PROXY_URL").filter(|p| !p.is_empty()) {
            self.http.proxy_url = Some(proxy);
        }
    }

    /// Reject configurations that must not reach dispatch.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(config_error(
                "API key is required",
                "api_key",
                format!("pass --api-key or set {}", ENV_API_KEY),
            ));
        }
        if self.input_file.is_none() {
            return Err(config_error(
                "input file is required",
                "input_file",
                "pass --input-file",
            ));
        }
        if self.concurrent_requests == 0 {
            return Err(config_error(
                "concurrency must be at least 1",
                "concurrent_requests",
                "got 0",
            ));
        }
        if self.model.trim().is_empty() {
            return Err(config_error("model name is empty", "model", "pass --model"));
        }
        match url::Url::parse(&self.api_endpoint) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(u) => {
                return Err(invalid_endpoint(
                    "API endpoint must be http or https",
                    format!("scheme {}", u.scheme()),
                ))
            }
            Err(e) => {
                return Err(invalid_endpoint(
                    "API endpoint is not a valid URL",
                    e.to_string(),
                ))
            }
        }
        Ok(())
    }
}

fn config_error(message: &str, field: &str, details: impl Into<String>) -> Error {
    Error::configuration_with_context(
        message,
        ErrorContext::new()
            .with_field_path(field)
            .with_details(details)
            .with_source("config"),
    )
}

fn invalid_endpoint(message: &str, details: impl Into<String>) -> Error {
    Error::validation_with_context(
        message,
        ErrorContext::new()
            .with_field_path("api_endpoint")
            .with_details(details)
            .with_source("config"),
    )
}
