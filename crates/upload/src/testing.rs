//! Scripted [`RemoteStore`] for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use tokio::sync::watch;
use vaultml_protocol::{ChunkUploadResponse, InitiateRequest, InitiateResponse};

use crate::error::RemoteError;
use crate::remote::{RemoteFuture, RemoteStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Initiate,
    Chunk(u32),
    Complete,
    Abort,
}

fn server_error(body: &str) -> RemoteError {
    RemoteError::Api {
        status: 500,
        body: body.into(),
    }
}

pub(crate) struct ScriptedStore {
    calls: Mutex<Vec<Call>>,
    received: Mutex<HashMap<u32, Bytes>>,
    fail_initiate: bool,
    fail_chunk: Option<u32>,
    fail_complete: bool,
    fail_abort: bool,
    short_confirm: Option<u32>,
    release: Option<watch::Sender<bool>>,
    release_initiate: Option<watch::Sender<bool>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            received: Mutex::new(HashMap::new()),
            fail_initiate: false,
            fail_chunk: None,
            fail_complete: false,
            fail_abort: false,
            short_confirm: None,
            release: None,
            release_initiate: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
        }
    }

    pub fn fail_initiate(mut self) -> Self {
        self.fail_initiate = true;
        self
    }

    pub fn fail_chunk(mut self, ordinal: u32) -> Self {
        self.fail_chunk = Some(ordinal);
        self
    }

    pub fn fail_complete(mut self) -> Self {
        self.fail_complete = true;
        self
    }

    pub fn fail_abort(mut self) -> Self {
        self.fail_abort = true;
        self
    }

    /// Confirms one byte less than was sent for `ordinal`.
    pub fn short_confirm(mut self, ordinal: u32) -> Self {
        self.short_confirm = Some(ordinal);
        self
    }

    /// Chunk uploads block until [`release`](Self::release) is called.
    pub fn hold_chunks(mut self) -> Self {
        self.release = Some(watch::channel(false).0);
        self
    }

    pub fn release(&self) {
        if let Some(tx) = &self.release {
            tx.send_replace(true);
        }
    }

    /// Initiate blocks until [`release_initiate`](Self::release_initiate).
    pub fn hold_initiate(mut self) -> Self {
        self.release_initiate = Some(watch::channel(false).0);
        self
    }

    pub fn release_initiate(&self) {
        if let Some(tx) = &self.release_initiate {
            tx.send_replace(true);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn chunk_calls(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Chunk(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn received(&self, ordinal: u32) -> Option<Bytes> {
        self.received.lock().unwrap().get(&ordinal).cloned()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of chunk requests that have begun.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl RemoteStore for ScriptedStore {
    fn initiate<'a>(
        &'a self,
        _model: &'a str,
        _request: &'a InitiateRequest,
    ) -> RemoteFuture<'a, InitiateResponse> {
        Box::pin(async move {
            self.record(Call::Initiate);
            if let Some(tx) = &self.release_initiate {
                let mut rx = tx.subscribe();
                let _ = rx.wait_for(|released| *released).await;
            }
            if self.fail_initiate {
                return Err(server_error("initiate refused"));
            }
            Ok(InitiateResponse {
                version: "7".into(),
            })
        })
    }

    fn upload_chunk<'a>(
        &'a self,
        _model: &'a str,
        _version: &'a str,
        ordinal: u32,
        data: Bytes,
    ) -> RemoteFuture<'a, ChunkUploadResponse> {
        Box::pin(async move {
            self.record(Call::Chunk(ordinal));
            self.started.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            // A failing chunk is rejected without waiting for a release.
            if self.fail_chunk == Some(ordinal) {
                tokio::task::yield_now().await;
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                return Err(server_error("chunk rejected"));
            }

            if let Some(tx) = &self.release {
                let mut rx = tx.subscribe();
                let _ = rx.wait_for(|released| *released).await;
            } else {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let mut size = data.len() as u64;
            if self.short_confirm == Some(ordinal) {
                size -= 1;
            }
            self.received.lock().unwrap().insert(ordinal, data);
            Ok(ChunkUploadResponse {
                size,
                chunk_number: Some(ordinal),
                message: String::new(),
            })
        })
    }

    fn complete<'a>(
        &'a self,
        _model: &'a str,
        _version: &'a str,
    ) -> RemoteFuture<'a, serde_json::Value> {
        Box::pin(async move {
            self.record(Call::Complete);
            if self.fail_complete {
                return Err(server_error("assembly failed"));
            }
            Ok(serde_json::json!({ "version": 7, "status": "ready" }))
        })
    }

    fn abort<'a>(&'a self, _model: &'a str, _version: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Abort);
            if self.fail_abort {
                return Err(server_error("abort failed"));
            }
            Ok(())
        })
    }
}
