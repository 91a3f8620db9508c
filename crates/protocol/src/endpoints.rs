//! Path builders for the registry's chunked upload endpoints.
//!
//! All paths are relative to the registry base URL. Model names and session
//! tokens are each percent-encoded as a single path segment.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters that must be escaped inside one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}

/// `POST /models/{model}/versions/chunked/initiate`
pub fn initiate(model: &str) -> String {
    format!("/models/{}/versions/chunked/initiate", segment(model))
}

/// `PUT /models/{model}/versions/{version}/chunks/{n}`
pub fn chunk(model: &str, version: &str, ordinal: u32) -> String {
    format!(
        "/models/{}/versions/{}/chunks/{ordinal}",
        segment(model),
        segment(version)
    )
}

/// `POST /models/{model}/versions/{version}/chunked/complete`
pub fn complete(model: &str, version: &str) -> String {
    format!(
        "/models/{}/versions/{}/chunked/complete",
        segment(model),
        segment(version)
    )
}

/// `DELETE /models/{model}/versions/{version}/chunked/abort`
pub fn abort(model: &str, version: &str) -> String {
    format!(
        "/models/{}/versions/{}/chunked/abort",
        segment(model),
        segment(version)
    )
}

/// File name attached to a chunk's multipart part.
pub fn chunk_file_name(ordinal: u32) -> String {
    format!("chunk-{ordinal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiate_path() {
        assert_eq!(
            initiate("resnet"),
            "/models/resnet/versions/chunked/initiate"
        );
    }

    #[test]
    fn chunk_path() {
        assert_eq!(chunk("resnet", "7", 3), "/models/resnet/versions/7/chunks/3");
    }

    #[test]
    fn complete_and_abort_paths() {
        assert_eq!(
            complete("resnet", "7"),
            "/models/resnet/versions/7/chunked/complete"
        );
        assert_eq!(
            abort("resnet", "7"),
            "/models/resnet/versions/7/chunked/abort"
        );
    }

    #[test]
    fn model_name_is_one_segment() {
        assert_eq!(
            initiate("team/llama 3"),
            "/models/team%2Fllama%203/versions/chunked/initiate"
        );
    }

    #[test]
    fn session_token_is_one_segment() {
        assert_eq!(chunk("m", "v/1", 2), "/models/m/versions/v%2F1/chunks/2");
        assert_eq!(
            abort("m", "a b"),
            "/models/m/versions/a%20b/chunked/abort"
        );
    }

    #[test]
    fn chunk_file_names() {
        assert_eq!(chunk_file_name(1), "chunk-1");
        assert_eq!(chunk_file_name(12), "chunk-12");
    }
}
