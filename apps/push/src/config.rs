//! Uploader configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/vaultml/push.toml`
//! - Windows: `%APPDATA%/vaultml/push.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Registry API base URL.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Bearer token for the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_chunk_size_mib")]
    pub chunk_size_mib: u64,

    /// Chunks in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-chunk deadline in seconds. Unset waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_timeout_secs: Option<u64>,
}

fn default_server_url() -> String {
    "http://localhost:8000/api".into()
}

fn default_chunk_size_mib() -> u64 {
    vaultml_transfer::DEFAULT_CHUNK_SIZE / MIB
}

fn default_concurrency() -> usize {
    vaultml_upload::DEFAULT_CONCURRENCY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            token: None,
            chunk_size_mib: default_chunk_size_mib(),
            concurrency: default_concurrency(),
            chunk_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or the platform default location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to `path`, or the platform default location.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        // The file may hold a token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(path)
    }

    pub fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size_mib.saturating_mul(MIB)
    }

    pub fn chunk_timeout(&self) -> Option<Duration> {
        self.chunk_timeout_secs.map(Duration::from_secs)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("vaultml").join("push.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("vaultml")
            .join("push.toml")
    }
}
