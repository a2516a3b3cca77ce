//! Wire DTOs for the studio backend API.
//!
//! Field names mirror the backend's JSON exactly; client-side domain types
//! (script lines, session state) live in their own modules and convert
//! to/from these at the boundary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Server-side status of an asynchronous generation task.
///
/// `Completed` and `Failed` are terminal; everything else keeps the polling
/// loop alive. Statuses introduced by newer backends map to
/// [`TaskStatus::Unknown`] and are treated as non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Accepted but not yet picked up by a worker.
    Pending,
    /// A worker is rendering the audio.
    Processing,
    /// Terminal: result payload should be present.
    Completed,
    /// Terminal: `error` carries the server-supplied message.
    Failed,
    /// Any status string this client does not know about.
    Unknown,
}

impl TaskStatus {
    /// Parse the wire status string; anything unrecognised is `Unknown`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Unknown,
        }
    }

    /// Returns `true` for statuses from which no further transition occurs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Lower-case label matching the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// Hand-written so unrecognised statuses become `Unknown` instead of a
// deserialisation error that would kill the polling loop.
impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskStatus::from_wire(&raw))
    }
}

// ---------------------------------------------------------------------------
// Generation task wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Speaker-tagged script text (`Speaker 0: …` / `Speaker 1: …`,
    /// newline-joined, original order).
    pub text: String,
    /// Host voice id (speaker 0).
    pub voice_id: String,
    /// Guest voice id (speaker 1), when the script has guest lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_voice_id: Option<String>,
    /// 2 when any line is spoken by the guest, else 1.
    pub num_speakers: u8,
    /// Global speed multiplier.
    pub speed: f32,
    /// Global pitch multiplier.
    pub pitch: f32,
    /// Deterministic output filename chosen by the client.
    pub custom_filename: String,
}

/// Result payload of a completed generation task.
///
/// Every field is optional on the wire; the poller decides whether the
/// payload is usable (`audio_url` + `filename` present).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub success: bool,
    pub audio_url: Option<String>,
    pub filename: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub message: String,
}

/// Response of `POST /api/generate` and `GET /api/tasks/{task_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<GenerationResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Opaque handle to a submitted generation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
}

// ---------------------------------------------------------------------------
// Script wire types
// ---------------------------------------------------------------------------

/// One dialogue line as the backend sees it. The optional `id` is echoed
/// back by the optimizer when the client supplied one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireScriptLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub speaker: String,
    pub text: String,
}

/// Response of `POST /api/generate/script` and `POST /api/optimize-script`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub script: Vec<WireScriptLine>,
}

/// Request body for `POST /api/optimize-script`.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub script: Vec<WireScriptLine>,
}

// ---------------------------------------------------------------------------
// Voice catalog wire types
// ---------------------------------------------------------------------------

/// A named, backend-stored reference to a cloned-voice model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub id: String,
    pub name: String,
    /// `"recorded"`, `"uploaded"` or `"preset"`.
    #[serde(rename = "type")]
    pub voice_type: String,
    /// Backend storage path of the reference clip. Older backends send
    /// `file_path`.
    #[serde(alias = "file_path", default)]
    pub path: String,
    #[serde(default)]
    pub created_at: String,
}

/// Response of `POST /api/voices/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceUploadResponse {
    #[serde(default)]
    pub success: bool,
    pub voice: VoiceProfile,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Audio library wire types
// ---------------------------------------------------------------------------

/// Metadata for one produced audio artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFileInfo {
    pub filename: String,
    pub voice_name: String,
    /// Length in seconds.
    pub duration: f64,
    /// File size in bytes; absent on older backends.
    #[serde(default)]
    pub size: Option<u64>,
    /// First ~100 characters of the source text.
    pub text_preview: String,
    #[serde(default)]
    pub created_at: String,
}

/// Response of `GET /api/audio/library`.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioLibraryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub audio_files: Vec<AudioFileInfo>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// An opaque file payload forwarded to the backend (reference audio for
/// cloning, or a document for script generation). The studio never decodes
/// the bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_parses_wire_values() {
        for (raw, expected) in [
            ("\"pending\"", TaskStatus::Pending),
            ("\"processing\"", TaskStatus::Processing),
            ("\"completed\"", TaskStatus::Completed),
            ("\"failed\"", TaskStatus::Failed),
        ] {
            let status: TaskStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn unexpected_status_is_unknown_and_non_terminal() {
        let status: TaskStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(status, TaskStatus::Unknown);
        assert!(!status.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
    }

    #[test]
    fn task_response_with_result() {
        let json = r#"{
            "task_id": "abc123",
            "status": "completed",
            "result": {
                "success": true,
                "audio_url": "/api/audio/x.wav",
                "filename": "x.wav",
                "duration": 12.5,
                "message": "Audio generated successfully"
            },
            "error": null,
            "created_at": "2024-06-01T10:00:00"
        }"#;

        let task: TaskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_id, "abc123");
        assert_eq!(task.status, TaskStatus::Completed);
        let result = task.result.unwrap();
        assert_eq!(result.audio_url.as_deref(), Some("/api/audio/x.wav"));
        assert_eq!(result.filename.as_deref(), Some("x.wav"));
    }

    #[test]
    fn task_response_without_result_or_error() {
        let json = r#"{"task_id": "t1", "status": "processing"}"#;
        let task: TaskResponse = serde_json::from_str(json).unwrap();
        assert!(task.result.is_none());
        assert!(task.error.is_none());
    }

    #[test]
    fn generation_request_omits_absent_guest_voice() {
        let req = GenerationRequest {
            text: "Speaker 0: Hi".into(),
            voice_id: "v1".into(),
            guest_voice_id: None,
            num_speakers: 1,
            speed: 1.0,
            pitch: 1.0,
            custom_filename: "20240601_podcast_101500.wav".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("guest_voice_id").is_none());
        assert_eq!(json["num_speakers"], 1);
    }

    #[test]
    fn voice_profile_accepts_legacy_file_path_key() {
        let json = r#"{
            "id": "v1",
            "name": "Narrator",
            "type": "uploaded",
            "file_path": "/voices/narrator.wav",
            "created_at": "2024-06-01T09:00:00"
        }"#;
        let profile: VoiceProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.path, "/voices/narrator.wav");
        assert_eq!(profile.voice_type, "uploaded");
    }

    #[test]
    fn audio_library_response_defaults() {
        let json = r#"{
            "success": true,
            "audio_files": [{
                "filename": "a.wav",
                "voice_name": "Narrator",
                "duration": 33.0,
                "text_preview": "Hello"
            }],
            "total": 1
        }"#;
        let lib: AudioLibraryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(lib.audio_files.len(), 1);
        assert!(lib.audio_files[0].size.is_none());
        assert!(lib.message.is_none());
    }

    #[test]
    fn upload_file_len() {
        let file = UploadFile::new("clip.wav", vec![0u8; 1024]);
        assert_eq!(file.len(), 1024);
        assert!(!file.is_empty());
    }
}
