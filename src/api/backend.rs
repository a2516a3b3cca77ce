//! The remote API surface and its transport error type.
//!
//! [`StudioBackend`] abstracts every call the studio makes against the
//! backend, one method per route:
//!
//! | Method                | Route                              |
//! |-----------------------|------------------------------------|
//! | `generate_script`     | POST `/api/generate/script` (multipart) |
//! | `optimize_script`     | POST `/api/optimize-script`        |
//! | `submit_generation`   | POST `/api/generate`               |
//! | `task_status`         | GET `/api/tasks/{task_id}`         |
//! | `list_voices`         | GET `/api/voices`                  |
//! | `upload_voice`        | POST `/api/voices/upload` (multipart) |
//! | `delete_voice`        | DELETE `/api/voices/{id}`          |
//! | `voice_sample`        | GET `/api/voices/{id}/sample`      |
//! | `audio_library`       | GET `/api/audio/library`           |
//! | `fetch_audio`         | GET `/api/audio/{filename}`        |
//! | `delete_audio`        | DELETE `/api/audio/{filename}`     |
//! | `health`              | GET `/api/health`                  |
//!
//! The production implementation is [`HttpBackend`](super::client::HttpBackend);
//! tests substitute scripted mocks through the same trait.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    AudioFileInfo, GenerationRequest, ScriptResponse, TaskHandle, TaskResponse, UploadFile,
    VoiceProfile, WireScriptLine,
};

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors raised by a single request/response exchange.
///
/// The transport never retries; callers decide whether a failure aborts the
/// operation (one-shot calls) or is swallowed (individual poll ticks).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success HTTP status. `message` is the server's `detail` field
    /// when the error body carried one, else a status-derived message.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection-level failure (DNS, refused, reset…).
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded as the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No usable credential could be obtained for the request.
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Script generation parameters
// ---------------------------------------------------------------------------

/// Multipart form fields for `POST /api/generate/script`.
///
/// Exactly one of `text` / `document` is expected to be meaningful; the
/// submitter validates that before calling the backend.
#[derive(Debug, Clone)]
pub struct ScriptGenParams {
    /// Pasted source text or topic description.
    pub text: Option<String>,
    /// Uploaded source document, forwarded undecoded.
    pub document: Option<UploadFile>,
    pub host_name: String,
    pub guest_name: String,
    pub mode: String,
    pub style: String,
    pub language: String,
    pub n_rounds: u32,
}

// ---------------------------------------------------------------------------
// StudioBackend
// ---------------------------------------------------------------------------

/// Everything the studio can ask of the remote backend.
///
/// Implementors must be `Send + Sync` so a single backend can be shared as
/// `Arc<dyn StudioBackend>` between the submitter, the polling tasks and
/// library sync.
#[async_trait]
pub trait StudioBackend: Send + Sync {
    /// Generate a dialogue script from text and/or an uploaded document.
    /// Synchronous from the client's point of view (one round trip).
    async fn generate_script(
        &self,
        params: &ScriptGenParams,
    ) -> Result<ScriptResponse, TransportError>;

    /// Rewrite a script with emotion/prosody tags. One round trip.
    async fn optimize_script(
        &self,
        lines: Vec<WireScriptLine>,
    ) -> Result<ScriptResponse, TransportError>;

    /// Submit an audio-synthesis job; returns a handle to poll.
    async fn submit_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, TransportError>;

    /// Fetch the current status of a submitted job.
    async fn task_status(&self, task_id: &str) -> Result<TaskResponse, TransportError>;

    /// List all enrolled voice profiles.
    async fn list_voices(&self) -> Result<Vec<VoiceProfile>, TransportError>;

    /// Upload a reference clip and enroll it as a new voice.
    async fn upload_voice(
        &self,
        name: &str,
        file: &UploadFile,
    ) -> Result<VoiceProfile, TransportError>;

    /// Delete a voice profile.
    async fn delete_voice(&self, voice_id: &str) -> Result<(), TransportError>;

    /// Fetch the reference clip of a voice as raw audio bytes.
    async fn voice_sample(&self, voice_id: &str) -> Result<Vec<u8>, TransportError>;

    /// List all produced audio artifacts.
    async fn audio_library(&self) -> Result<Vec<AudioFileInfo>, TransportError>;

    /// Download a produced artifact as raw audio bytes.
    async fn fetch_audio(&self, filename: &str) -> Result<Vec<u8>, TransportError>;

    /// Delete a produced artifact.
    async fn delete_audio(&self, filename: &str) -> Result<(), TransportError>;

    /// Backend liveness probe.
    async fn health(&self) -> Result<(), TransportError>;
}

// ---------------------------------------------------------------------------
// MockBackend — shared test double
// ---------------------------------------------------------------------------

/// Scripted in-memory [`StudioBackend`] used by the job, library and studio
/// test modules. Each call is recorded in `calls`; `task_statuses` is a
/// queue consumed one entry per poll attempt.
#[cfg(test)]
pub struct MockBackend {
    /// Method names in invocation order, for "no network call" assertions.
    pub calls: std::sync::Mutex<Vec<String>>,
    /// Scripted responses for `task_status`, consumed front-to-back.
    pub task_statuses:
        std::sync::Mutex<std::collections::VecDeque<Result<TaskResponse, TransportError>>>,
    /// Task id handed out by `submit_generation`.
    pub submit_task_id: String,
    /// Response for `generate_script` / `optimize_script`.
    pub script_response: std::sync::Mutex<Option<ScriptResponse>>,
    /// Catalog returned by `list_voices`.
    pub voices: std::sync::Mutex<Vec<VoiceProfile>>,
    /// Catalog returned by `audio_library`.
    pub audio_files: std::sync::Mutex<Vec<AudioFileInfo>>,
    /// When set, `task_status` waits for a notification before answering —
    /// used to exercise cancellation with a poll in flight.
    pub gate: Option<std::sync::Arc<tokio::sync::Notify>>,
}

#[cfg(test)]
impl Default for MockBackend {
    fn default() -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            task_statuses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            submit_task_id: "task-1".into(),
            script_response: std::sync::Mutex::new(None),
            voices: std::sync::Mutex::new(Vec::new()),
            audio_files: std::sync::Mutex::new(Vec::new()),
            gate: None,
        }
    }
}

#[cfg(test)]
impl MockBackend {
    pub fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn push_status(&self, response: Result<TaskResponse, TransportError>) {
        self.task_statuses.lock().unwrap().push_back(response);
    }
}

#[cfg(test)]
#[async_trait]
impl StudioBackend for MockBackend {
    async fn generate_script(
        &self,
        _params: &ScriptGenParams,
    ) -> Result<ScriptResponse, TransportError> {
        self.record("generate_script");
        self.script_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Request("no scripted response".into()))
    }

    async fn optimize_script(
        &self,
        _lines: Vec<WireScriptLine>,
    ) -> Result<ScriptResponse, TransportError> {
        self.record("optimize_script");
        self.script_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::Request("no scripted response".into()))
    }

    async fn submit_generation(
        &self,
        _request: &GenerationRequest,
    ) -> Result<TaskHandle, TransportError> {
        self.record("submit_generation");
        Ok(TaskHandle {
            task_id: self.submit_task_id.clone(),
        })
    }

    async fn task_status(&self, _task_id: &str) -> Result<TaskResponse, TransportError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.record("task_status");
        self.task_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("status queue exhausted".into())))
    }

    async fn list_voices(&self) -> Result<Vec<VoiceProfile>, TransportError> {
        self.record("list_voices");
        Ok(self.voices.lock().unwrap().clone())
    }

    async fn upload_voice(
        &self,
        name: &str,
        _file: &UploadFile,
    ) -> Result<VoiceProfile, TransportError> {
        self.record("upload_voice");
        Ok(VoiceProfile {
            id: format!("voice-{name}"),
            name: name.to_string(),
            voice_type: "uploaded".into(),
            path: format!("/voices/{name}.wav"),
            created_at: String::new(),
        })
    }

    async fn delete_voice(&self, _voice_id: &str) -> Result<(), TransportError> {
        self.record("delete_voice");
        Ok(())
    }

    async fn voice_sample(&self, _voice_id: &str) -> Result<Vec<u8>, TransportError> {
        self.record("voice_sample");
        Ok(vec![0u8; 4])
    }

    async fn audio_library(&self) -> Result<Vec<AudioFileInfo>, TransportError> {
        self.record("audio_library");
        Ok(self.audio_files.lock().unwrap().clone())
    }

    async fn fetch_audio(&self, _filename: &str) -> Result<Vec<u8>, TransportError> {
        self.record("fetch_audio");
        Ok(vec![0u8; 4])
    }

    async fn delete_audio(&self, _filename: &str) -> Result<(), TransportError> {
        self.record("delete_audio");
        Ok(())
    }

    async fn health(&self) -> Result<(), TransportError> {
        self.record("health");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
