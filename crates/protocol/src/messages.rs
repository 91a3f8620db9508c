//! Request and response bodies for the chunked upload endpoints.
//!
//! Field names follow the registry's snake_case JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST …/versions/chunked/initiate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiateRequest {
    pub filename: String,
    pub content_type: String,
}

/// Response of the initiate call.
///
/// The registry issues integer versions, but the token is treated as opaque
/// so a string is accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiateResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
}

/// Response of `PUT …/chunks/{n}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkUploadResponse {
    /// Bytes the server stored for this chunk.
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_number: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Token {
        Str(String),
        Num(serde_json::Number),
    }

    match Token::deserialize(deserializer)? {
        Token::Str(s) => Ok(s),
        Token::Num(n) => Ok(n.to_string()),
    }
}
