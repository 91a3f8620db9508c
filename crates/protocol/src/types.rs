use serde::{Deserialize, Serialize};

/// Lifecycle state of one upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UploadState {
    #[serde(rename = "not_started")]
    NotStarted,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "paused")]
    Paused,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "aborted")]
    Aborted,
    #[serde(rename = "failed")]
    Failed,
}

impl UploadState {
    /// Returns `true` once no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Failed)
    }
}

impl std::fmt::Display for UploadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Progress of an upload, recomputed after every confirmed chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub uploaded_bytes: u64,
    pub total_bytes: u64,
    /// 0–100.
    pub percentage: f64,
    /// Ordinal of the chunk whose confirmation produced this snapshot.
    pub current_part: u32,
    pub total_parts: u32,
    /// Bytes per second since the session started.
    pub speed: f64,
    /// Estimated seconds left. Always finite and non-negative.
    pub remaining_time: f64,
}

impl ProgressSnapshot {
    /// Returns `true` once every planned byte has been confirmed.
    pub fn is_done(&self) -> bool {
        self.uploaded_bytes >= self.total_bytes && self.current_part > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(UploadState::Completed.is_terminal());
        assert!(UploadState::Aborted.is_terminal());
        assert!(UploadState::Failed.is_terminal());
        assert!(!UploadState::NotStarted.is_terminal());
        assert!(!UploadState::Active.is_terminal());
        assert!(!UploadState::Paused.is_terminal());
    }

    #[test]
    fn upload_state_serialization() {
        assert_eq!(
            serde_json::to_string(&UploadState::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(
            serde_json::to_string(&UploadState::Aborted).unwrap(),
            "\"aborted\""
        );
    }

    #[test]
    fn upload_state_display() {
        assert_eq!(UploadState::NotStarted.to_string(), "not-started");
        assert_eq!(UploadState::Paused.to_string(), "paused");
    }

    #[test]
    fn snapshot_field_names() {
        let p = ProgressSnapshot {
            uploaded_bytes: 10,
            total_bytes: 20,
            percentage: 50.0,
            current_part: 1,
            total_parts: 2,
            speed: 5.0,
            remaining_time: 2.0,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["uploadedBytes"], 10);
        assert_eq!(json["currentPart"], 1);
        assert_eq!(json["remainingTime"], 2.0);
        assert!(!p.is_done());
    }
}
