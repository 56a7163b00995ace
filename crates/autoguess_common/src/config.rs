//! Configuration management for autoguessd.
//!
//! Loads settings from a TOML file or uses defaults. Every field has a
//! default, so a partial file only needs the keys it overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::protocol::DEFAULT_MAXIMUM_STRIKES;

/// System-wide config file path
pub const CONFIG_PATH: &str = "/etc/autoguess/config.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "AUTOGUESS_CONFIG";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Upper bound on start and health requests. Guesses are not covered:
    /// they may queue behind other guesses on the same round, and each judge
    /// call is already capped by `judge.timeout_secs`.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Browser front-ends are served from a different origin
    #[serde(default = "default_cors_allow_any_origin")]
    pub cors_allow_any_origin: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_cors_allow_any_origin() -> bool {
    true
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout(),
            cors_allow_any_origin: default_cors_allow_any_origin(),
        }
    }
}

/// Suggestion source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_suggest_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_suggest_timeout")]
    pub timeout_secs: u64,
}

fn default_suggest_endpoint() -> String {
    "https://api.bilibili.com/x/web-interface/suggest".to_string()
}

fn default_suggest_timeout() -> u64 {
    10
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            endpoint: default_suggest_endpoint(),
            timeout_secs: default_suggest_timeout(),
        }
    }
}

/// LLM judge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Ollama generate endpoint
    #[serde(default = "default_judge_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_judge_model")]
    pub model: String,

    /// Inference is slow; keep this generous
    #[serde(default = "default_judge_timeout")]
    pub timeout_secs: u64,
}

fn default_judge_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_judge_model() -> String {
    "autocomplete_judge".to_string()
}

fn default_judge_timeout() -> u64 {
    30
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_judge_endpoint(),
            model: default_judge_model(),
            timeout_secs: default_judge_timeout(),
        }
    }
}

/// Round lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundsConfig {
    #[serde(default = "default_maximum_strikes")]
    pub default_maximum_strikes: u32,

    /// Idle rounds older than this are dropped. Unset keeps rounds forever.
    #[serde(default)]
    pub ttl_secs: Option<u64>,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_maximum_strikes() -> u32 {
    DEFAULT_MAXIMUM_STRIKES
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            default_maximum_strikes: default_maximum_strikes(),
            ttl_secs: None,
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub suggest: SuggestConfig,

    #[serde(default)]
    pub judge: JudgeConfig,

    #[serde(default)]
    pub rounds: RoundsConfig,
}

impl Config {
    /// Load config, preferring an explicit path, then `$AUTOGUESS_CONFIG`,
    /// then the system path. A missing implicit file yields defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH));

        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        Self::load_from_path(&path)
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn suggest_timeout(&self) -> Duration {
        Duration::from_secs(self.suggest.timeout_secs)
    }

    pub fn judge_timeout(&self) -> Duration {
        Duration::from_secs(self.judge.timeout_secs)
    }

    pub fn round_ttl(&self) -> Option<Duration> {
        self.rounds.ttl_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rounds.sweep_interval_secs.max(1))
    }
}
