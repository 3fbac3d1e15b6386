/*
[INPUT]:  Optional YAML config file, TASKDECK_* environment, CLI overrides
[OUTPUT]: ConsoleConfig with server endpoint and polling cadence
[POS]:    Configuration layer - console startup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use taskdeck_adapter::ClientConfig;
use taskdeck_adapter::http::client::DEFAULT_BASE_URL;

use crate::view::DEFAULT_PAGE_SIZE;

const ENV_PREFIX: &str = "TASKDECK";

/// Top-level console configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Base URL of the task service
    #[serde(default = "default_server_endpoint")]
    pub server_endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Polling cadence; fixed, never read from file or environment
    #[serde(skip)]
    pub sync: SyncSettings,
}

/// Cadence and paging defaults for the console engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub counts_interval: Duration,
    pub list_interval: Duration,
    pub page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            counts_interval: Duration::from_secs(5),
            list_interval: Duration::from_secs(10),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server_endpoint: default_server_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            sync: SyncSettings::default(),
        }
    }
}

fn default_server_endpoint() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ConsoleConfig {
    /// Load from the default config file (if present) and the process environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env));

        let settings = builder.build().context("read configuration sources")?;
        let config: Self = settings
            .try_deserialize()
            .context("parse console configuration")?;
        Ok(config)
    }

    /// Apply a `--server` style override
    pub fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(server) = server.filter(|value| !value.trim().is_empty()) {
            self.server_endpoint = server;
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..ClientConfig::default()
        }
    }
}

/// `<config dir>/taskdeck/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.yaml"))
}
