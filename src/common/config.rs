//! Configuration for the bucketprops client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::common::{Error, Result};

/// Prefix for environment overrides, e.g. `BUCKETPROPS_REST_URL`
pub const ENV_PREFIX: &str = "BUCKETPROPS";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST interface
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Address of the compact (protocol buffers) interface
    #[serde(default = "default_pbc_addr")]
    pub pbc_addr: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest compact frame accepted from the server
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rest_url() -> String {
    "http://127.0.0.1:8098".to_string()
}
fn default_pbc_addr() -> String {
    "127.0.0.1:8087".to_string()
}
fn default_request_timeout() -> u64 {
    5_000
}
fn default_max_frame_size() -> usize {
    16 * 1024 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            pbc_addr: default_pbc_addr(),
            request_timeout_ms: default_request_timeout(),
            max_frame_size: default_max_frame_size(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration: defaults, then the TOML file (if given and
    /// present), then `BUCKETPROPS_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        let config: ClientConfig = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rest_url.trim().is_empty() {
            return Err(Error::InvalidConfig("rest_url is empty".into()));
        }
        if self.pbc_addr.trim().is_empty() {
            return Err(Error::InvalidConfig("pbc_addr is empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "request_timeout_ms must be positive".into(),
            ));
        }
        if self.max_frame_size == 0 {
            return Err(Error::InvalidConfig("max_frame_size must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
