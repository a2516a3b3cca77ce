//! `JobSubmitter` — turns user intents into backend calls.
//!
//! Each submission validates its preconditions client-side first; a
//! [`JobError::Validation`] is returned before anything touches the network.
//! The submitter never polls: audio synthesis returns a [`TaskHandle`] that
//! the caller attaches to the [`Poller`](super::poller::Poller).

use std::sync::Arc;

use crate::api::backend::ScriptGenParams;
use crate::api::types::{TaskHandle, UploadFile, VoiceProfile};
use crate::api::StudioBackend;
use crate::config::StudioConfig;
use crate::script::{all_blank, ScriptLine};

use super::synthesis::{build_generation_request, SynthesisRequest};
use super::JobError;

// ---------------------------------------------------------------------------
// ScriptSource
// ---------------------------------------------------------------------------

/// What the AI script generator should work from.
#[derive(Debug, Clone)]
pub enum ScriptSource {
    /// Pasted article content, notes or a topic description.
    Text(String),
    /// An uploaded document (PDF/DOCX/TXT), forwarded undecoded — the
    /// backend owns text extraction.
    Document(UploadFile),
}

// ---------------------------------------------------------------------------
// JobSubmitter
// ---------------------------------------------------------------------------

/// Issues one backend call per user intent.
pub struct JobSubmitter {
    backend: Arc<dyn StudioBackend>,
    config: StudioConfig,
}

impl JobSubmitter {
    pub fn new(backend: Arc<dyn StudioBackend>, config: StudioConfig) -> Self {
        Self { backend, config }
    }

    // -----------------------------------------------------------------------
    // Script generation
    // -----------------------------------------------------------------------

    /// Generate a dialogue script from `source`. One round trip; the
    /// response is a complete script that replaces the current one.
    pub async fn generate_script(
        &self,
        source: ScriptSource,
        style: &str,
        language: &str,
        rounds: u32,
    ) -> Result<Vec<ScriptLine>, JobError> {
        let (text, document) = match source {
            ScriptSource::Text(text) if !text.trim().is_empty() => (Some(text), None),
            ScriptSource::Document(file) if !file.is_empty() => (None, Some(file)),
            _ => {
                return Err(JobError::Validation(
                    "provide source text or a document".into(),
                ))
            }
        };

        let params = ScriptGenParams {
            text,
            document,
            host_name: self.config.script.host_name.clone(),
            guest_name: self.config.script.guest_name.clone(),
            mode: self.config.script.mode.clone(),
            style: style.to_string(),
            language: language.to_string(),
            n_rounds: rounds,
        };

        log::info!(
            "submit: generating script (style={style}, language={language}, rounds={rounds})"
        );
        let response = self.backend.generate_script(&params).await?;
        Ok(response.script.iter().map(ScriptLine::from_wire).collect())
    }

    // -----------------------------------------------------------------------
    // Script optimization
    // -----------------------------------------------------------------------

    /// Polish the script with emotion/prosody tags. Synchronous — one round
    /// trip, no job handle, no polling.
    pub async fn optimize_script(
        &self,
        lines: &[ScriptLine],
    ) -> Result<Vec<ScriptLine>, JobError> {
        if all_blank(lines) {
            return Err(JobError::Validation(
                "script is empty — write or generate one first".into(),
            ));
        }

        let wire = lines.iter().map(ScriptLine::to_wire).collect();
        let response = self.backend.optimize_script(wire).await?;

        if !response.success {
            return Err(JobError::Failed("optimization rejected by backend".into()));
        }

        log::info!("submit: optimized {} script lines", response.script.len());
        Ok(response.script.iter().map(ScriptLine::from_wire).collect())
    }

    // -----------------------------------------------------------------------
    // Voice cloning
    // -----------------------------------------------------------------------

    /// Upload a reference clip and enroll it as a new voice.
    ///
    /// The size cap (`upload.max_audio_mb`, default 5 MB) is enforced here,
    /// before any bytes leave the client.
    pub async fn clone_voice(
        &self,
        name: &str,
        file: &UploadFile,
    ) -> Result<VoiceProfile, JobError> {
        if name.trim().is_empty() {
            return Err(JobError::Validation("name this voice first".into()));
        }
        if file.is_empty() {
            return Err(JobError::Validation("no reference clip provided".into()));
        }

        let max_bytes = self.config.upload.max_audio_bytes();
        if file.len() > max_bytes {
            return Err(JobError::Validation(format!(
                "file too large — maximum size is {} MB",
                self.config.upload.max_audio_mb
            )));
        }

        log::info!(
            "submit: uploading voice '{name}' ({} bytes, {})",
            file.len(),
            file.filename
        );
        Ok(self.backend.upload_voice(name, file).await?)
    }

    // -----------------------------------------------------------------------
    // Audio synthesis
    // -----------------------------------------------------------------------

    /// Submit an audio-synthesis job. Validates and assembles the payload,
    /// then returns the backend's task handle for polling.
    pub async fn submit_audio(
        &self,
        request: &SynthesisRequest,
    ) -> Result<TaskHandle, JobError> {
        let payload =
            build_generation_request(request, &self.config.synthesis.default_prefix)?;

        log::info!(
            "submit: audio job ({} speakers, filename {})",
            payload.num_speakers,
            payload.custom_filename
        );
        Ok(self.backend.submit_generation(&payload).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
