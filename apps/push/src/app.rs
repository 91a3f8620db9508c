//! Upload run loop.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use vaultml_protocol::ProgressSnapshot;
use vaultml_transfer::{ChunkSource, format_duration, format_file_size, format_speed};
use vaultml_upload::{ChunkedUpload, HttpStore, UploadOptions};

use crate::cli::Cli;
use crate::config::Config;

/// Uploads `cli.file` and returns the registry's completion payload.
///
/// Ctrl+C aborts the upload and releases the server-side session.
pub async fn run(cli: &Cli, config: &Config) -> anyhow::Result<serde_json::Value> {
    let source = ChunkSource::from_path(&cli.file)
        .await
        .with_context(|| format!("cannot open {}", cli.file.display()))?;
    let filename = cli
        .upload_filename()
        .context("cannot derive a file name, pass --filename")?;
    let content_type = cli.upload_content_type(&filename);

    info!(
        server = %config.server_url,
        model = %cli.model,
        file = %filename,
        content_type = %content_type,
        size = %format_file_size(source.len() as f64),
        "starting upload"
    );

    let store = Arc::new(HttpStore::new(&config.server_url, config.token.as_deref())?);
    let mut options = UploadOptions::new(cli.model.clone(), filename, source)
        .content_type(content_type)
        .chunk_size(config.chunk_size_bytes())
        .concurrency(config.concurrency)
        .on_progress(log_progress);
    if let Some(timeout) = config.chunk_timeout() {
        options = options.chunk_timeout(timeout);
    }
    let upload = Arc::new(ChunkedUpload::new(store, options));

    let interrupt = {
        let upload = upload.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, aborting upload");
                upload.abort().await;
            }
        })
    };

    let result = upload.start().await;
    interrupt.abort();

    let payload = result?;
    if let Some(version) = upload.session_token() {
        info!(model = %cli.model, version = %version, "upload finished");
    }
    Ok(payload)
}

fn log_progress(p: ProgressSnapshot) {
    info!(
        part = %format!("{}/{}", p.current_part, p.total_parts),
        percent = %format!("{:.1}", p.percentage),
        uploaded = %format_file_size(p.uploaded_bytes as f64),
        speed = %format_speed(p.speed),
        eta = %format_duration(p.remaining_time),
        "progress"
    );
    if p.is_done() {
        info!("all chunks uploaded, finalizing");
    }
}
