//! Chunked upload orchestrator.
//!
//! Drives one upload session through initiate, batched chunk transfer and
//! complete, and rolls the server-side session back on failure or abort.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use vaultml_protocol::{InitiateRequest, UploadState};
use vaultml_transfer::{ChunkResult, compute_progress, plan_chunks};

use crate::error::UploadError;
use crate::remote::RemoteStore;
use crate::types::UploadOptions;
use crate::worker::{ChunkContext, transfer_chunk};

struct Session {
    state: UploadState,
    version: Option<String>,
    started: bool,
}

/// One chunked upload session.
///
/// Share it behind an [`Arc`] to call [`pause`](Self::pause),
/// [`resume`](Self::resume) or [`abort`](Self::abort) while
/// [`start`](Self::start) is running.
pub struct ChunkedUpload {
    store: Arc<dyn RemoteStore>,
    options: UploadOptions,
    session: Mutex<Session>,
    cancel: CancellationToken,
    paused: watch::Sender<bool>,
}

impl ChunkedUpload {
    pub fn new(store: Arc<dyn RemoteStore>, options: UploadOptions) -> Self {
        Self {
            store,
            options,
            session: Mutex::new(Session {
                state: UploadState::NotStarted,
                version: None,
                started: false,
            }),
            cancel: CancellationToken::new(),
            paused: watch::Sender::new(false),
        }
    }

    /// Runs the upload to completion.
    ///
    /// Returns the registry's completion payload, or the error that ended the
    /// session. [`UploadError::Aborted`] means [`abort`](Self::abort) was
    /// called; it is never passed to the error callback.
    pub async fn start(&self) -> Result<serde_json::Value, UploadError> {
        {
            let mut session = self.lock();
            if session.started || session.state != UploadState::NotStarted {
                return Err(UploadError::InvalidState {
                    action: "start",
                    state: session.state,
                });
            }
            session.started = true;
        }

        let opts = &self.options;
        if let Err(e) = opts.validate() {
            return Err(self.fail(e).await);
        }

        let total_bytes = opts.source.len();
        let plan = match plan_chunks(total_bytes, opts.chunk_size) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(UploadError::InvalidOptions(e.to_string())).await),
        };
        let total_parts = plan.len() as u32;

        info!(
            model = %opts.model_name,
            filename = %opts.filename,
            bytes = total_bytes,
            chunks = total_parts,
            "initiating chunked upload"
        );
        let request = InitiateRequest {
            filename: opts.filename.clone(),
            content_type: opts.content_type.clone(),
        };
        let version = match self.store.initiate(&opts.model_name, &request).await {
            Ok(resp) => resp.version,
            Err(e) => return Err(self.fail(UploadError::Initiate(e)).await),
        };

        let aborted_during_initiate = {
            let mut session = self.lock();
            session.version = Some(version.clone());
            if session.state == UploadState::Aborted {
                true
            } else {
                session.state = if *self.paused.borrow() {
                    UploadState::Paused
                } else {
                    UploadState::Active
                };
                false
            }
        };
        if aborted_during_initiate {
            self.notify_abort(&version).await;
            return Err(UploadError::Aborted);
        }
        info!(model = %opts.model_name, version = %version, "upload session opened");

        let ctx = ChunkContext {
            store: self.store.as_ref(),
            model: &opts.model_name,
            version: &version,
            source: &opts.source,
            cancel: &self.cancel,
            timeout: opts.chunk_timeout,
            last_ordinal: total_parts,
        };
        let started_at = Instant::now();
        let mut results: Vec<ChunkResult> = Vec::with_capacity(plan.len());

        for batch in plan.chunks(opts.concurrency) {
            if !self.wait_while_paused().await {
                break;
            }

            let mut in_flight: FuturesUnordered<_> =
                batch.iter().map(|chunk| transfer_chunk(&ctx, chunk)).collect();
            let mut failure = None;

            // The whole batch settles before the next one is formed. A failure
            // takes the error path at once; later results are dropped.
            while let Some(outcome) = in_flight.next().await {
                match outcome {
                    Ok(Some(result)) => {
                        if self.is_halted() {
                            debug!(chunk = result.ordinal, "discarding result after session ended");
                            continue;
                        }
                        results.push(result);
                        let snapshot =
                            compute_progress(&results, total_bytes, started_at, total_parts);
                        debug!(
                            chunk = result.ordinal,
                            uploaded = snapshot.uploaded_bytes,
                            percentage = snapshot.percentage,
                            "chunk uploaded"
                        );
                        if let Some(on_progress) = &opts.on_progress {
                            on_progress(snapshot);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        if failure.is_none() {
                            failure = Some(self.fail(e).await);
                        } else {
                            debug!(error = %e, "additional chunk failure in batch");
                        }
                    }
                }
            }

            if let Some(e) = failure {
                return Err(e);
            }
        }

        if self.cancel.is_cancelled() {
            return Err(UploadError::Aborted);
        }

        match self.store.complete(&opts.model_name, &version).await {
            Ok(payload) => {
                {
                    let mut session = self.lock();
                    if session.state.is_terminal() {
                        return Err(UploadError::Aborted);
                    }
                    session.state = UploadState::Completed;
                }
                info!(model = %opts.model_name, version = %version, "upload completed");
                if let Some(on_complete) = &opts.on_complete {
                    on_complete(&payload);
                }
                Ok(payload)
            }
            Err(e) => Err(self.fail(UploadError::Complete(e)).await),
        }
    }

    /// Holds further batches until [`resume`](Self::resume). Chunks already
    /// in flight finish normally.
    pub fn pause(&self) {
        let mut session = self.lock();
        if session.state.is_terminal() {
            return;
        }
        self.paused.send_replace(true);
        if session.state == UploadState::Active {
            session.state = UploadState::Paused;
            info!("upload paused");
        }
    }

    pub fn resume(&self) {
        let mut session = self.lock();
        if session.state.is_terminal() {
            return;
        }
        self.paused.send_replace(false);
        if session.state == UploadState::Paused {
            session.state = UploadState::Active;
            info!("upload resumed");
        }
    }

    /// Stops the upload and releases the server-side session.
    ///
    /// Idempotent; has no effect once the session has ended. A failed
    /// remote abort is logged and otherwise ignored.
    pub async fn abort(&self) {
        let version = {
            let mut session = self.lock();
            if session.state.is_terminal() {
                return;
            }
            session.state = UploadState::Aborted;
            self.cancel.cancel();
            session.version.clone()
        };
        info!(model = %self.options.model_name, "upload aborted");

        if let Some(version) = version {
            self.notify_abort(&version).await;
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.state() == UploadState::Aborted
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.borrow() && !self.state().is_terminal()
    }

    pub fn state(&self) -> UploadState {
        self.lock().state
    }

    /// Server-assigned session token, once initiate has succeeded.
    pub fn session_token(&self) -> Option<String> {
        self.lock().version.clone()
    }

    /// True once the session was cancelled or reached a terminal state.
    fn is_halted(&self) -> bool {
        self.cancel.is_cancelled() || self.lock().state.is_terminal()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `false` if the session was cancelled instead of resumed.
    async fn wait_while_paused(&self) -> bool {
        let mut rx = self.paused.subscribe();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {}
            res = rx.wait_for(|paused| !*paused) => {
                if res.is_err() {
                    return false;
                }
            }
        }
        !self.cancel.is_cancelled()
    }

    /// Error path: report once, stop dispatch, settle in `failed`, then
    /// release the server-side session.
    async fn fail(&self, err: UploadError) -> UploadError {
        let version = {
            let mut session = self.lock();
            if session.state.is_terminal() {
                return UploadError::Aborted;
            }
            session.state = UploadState::Failed;
            self.cancel.cancel();
            session.version.clone()
        };

        error!(model = %self.options.model_name, error = %err, "upload failed");
        if let Some(on_error) = &self.options.on_error {
            on_error(&err);
        }

        if let Some(version) = version {
            self.notify_abort(&version).await;
        }
        err
    }

    async fn notify_abort(&self, version: &str) {
        if let Err(e) = self.store.abort(&self.options.model_name, version).await {
            let err = UploadError::AbortNotification(e);
            warn!(error = %err, "could not release server-side upload");
        }
    }
}
