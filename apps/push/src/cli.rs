//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::Config;

/// Upload a model artifact to a VaultML registry in chunks.
#[derive(Debug, Parser)]
#[command(name = "vaultml-push", version, about)]
pub struct Cli {
    /// Target model name.
    pub model: String,

    /// File to upload.
    pub file: PathBuf,

    /// File name reported to the registry (defaults to the file's own name).
    #[arg(long)]
    pub filename: Option<String>,

    /// Declared content type (guessed from the extension when omitted).
    #[arg(long)]
    pub content_type: Option<String>,

    #[arg(long)]
    pub chunk_size_mib: Option<u64>,

    /// Chunks in flight at once.
    #[arg(long, short = 'j')]
    pub concurrency: Option<usize>,

    /// Give up on a chunk after this many seconds.
    #[arg(long)]
    pub chunk_timeout_secs: Option<u64>,

    /// Registry API base URL.
    #[arg(long, env = "VAULTML_SERVER_URL")]
    pub server_url: Option<String>,

    /// Registry bearer token.
    #[arg(long, env = "VAULTML_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (defaults to the platform location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective settings back to the configuration file.
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Overrides file values with any flags given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(size) = self.chunk_size_mib {
            config.chunk_size_mib = size;
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        if let Some(secs) = self.chunk_timeout_secs {
            config.chunk_timeout_secs = Some(secs);
        }
    }

    /// Name reported to the registry.
    pub fn upload_filename(&self) -> Option<String> {
        self.filename.clone().or_else(|| {
            self.file
                .file_name()
                .and_then(|n| n.to_str())
                .map(String::from)
        })
    }

    /// Declared content type, falling back to an extension-based guess.
    pub fn upload_content_type(&self, filename: &str) -> String {
        self.content_type
            .clone()
            .or_else(|| detect_content_type(filename).map(String::from))
            .unwrap_or_else(|| vaultml_protocol::DEFAULT_CONTENT_TYPE.into())
    }
}

/// Guesses a content type from common model artifact extensions.
pub fn detect_content_type(path: &str) -> Option<&'static str> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("json") => Some("application/json"),
        Some("zip") => Some("application/zip"),
        Some("gz" | "tgz") => Some("application/gzip"),
        Some("tar") => Some("application/x-tar"),
        Some("h5" | "hdf5") => Some("application/x-hdf5"),
        Some("onnx") => Some("application/onnx"),
        Some("pkl" | "pickle") => Some("application/x-pickle"),
        _ => None,
    }
}
