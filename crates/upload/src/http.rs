//! Registry client over HTTP.
//!
//! Async client using `reqwest` with optional Bearer token authentication.

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::trace;
use vaultml_protocol::{
    CHUNK_FIELD, ChunkUploadResponse, DEFAULT_CONTENT_TYPE, InitiateRequest, InitiateResponse,
    endpoints,
};

use crate::error::RemoteError;
use crate::remote::{RemoteFuture, RemoteStore};

/// [`RemoteStore`] backed by the registry's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Creates a store for the registry at `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| RemoteError::InvalidToken)?,
            );
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(http, base_url))
    }

    /// Uses a preconfigured client.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Bytes, RemoteError> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?)
    }
}

impl RemoteStore for HttpStore {
    fn initiate<'a>(
        &'a self,
        model: &'a str,
        request: &'a InitiateRequest,
    ) -> RemoteFuture<'a, InitiateResponse> {
        Box::pin(async move {
            let url = self.url(&endpoints::initiate(model));
            trace!(%url, "initiate");
            let body = self.send(self.http.post(&url).json(request)).await?;
            Ok(serde_json::from_slice(&body)?)
        })
    }

    fn upload_chunk<'a>(
        &'a self,
        model: &'a str,
        version: &'a str,
        ordinal: u32,
        data: Bytes,
    ) -> RemoteFuture<'a, ChunkUploadResponse> {
        Box::pin(async move {
            let url = self.url(&endpoints::chunk(model, version, ordinal));
            let len = data.len() as u64;
            trace!(%url, bytes = len, "upload chunk");
            let part = Part::stream_with_length(data, len)
                .file_name(endpoints::chunk_file_name(ordinal))
                .mime_str(DEFAULT_CONTENT_TYPE)?;
            let form = Form::new().part(CHUNK_FIELD, part);
            let body = self.send(self.http.put(&url).multipart(form)).await?;
            Ok(serde_json::from_slice(&body)?)
        })
    }

    fn complete<'a>(
        &'a self,
        model: &'a str,
        version: &'a str,
    ) -> RemoteFuture<'a, serde_json::Value> {
        Box::pin(async move {
            let url = self.url(&endpoints::complete(model, version));
            trace!(%url, "complete");
            let body = self.send(self.http.post(&url)).await?;
            if body.is_empty() {
                return Ok(serde_json::Value::Null);
            }
            Ok(serde_json::from_slice(&body)?)
        })
    }

    fn abort<'a>(&'a self, model: &'a str, version: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let url = self.url(&endpoints::abort(model, version));
            trace!(%url, "abort");
            self.send(self.http.delete(&url)).await?;
            Ok(())
        })
    }
}
