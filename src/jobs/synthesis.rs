//! Audio-synthesis payload builders.
//!
//! The backend receives one flat text payload per job: each line rendered as
//! `Speaker {n}: {text}` in original order, newline-joined, where speaker 0
//! is the host and speaker 1 the guest. `num_speakers` is 2 exactly when the
//! script contains a guest line. Output filenames are chosen client-side and
//! are deterministic up to the clock:
//! `{UTC date YYYYMMDD}_{prefix or "podcast"}_{local time HHMMSS}.wav`.

use chrono::{Local, Utc};

use crate::api::types::GenerationRequest;
use crate::script::{all_blank, any_guest, ScriptLine};

use super::JobError;

// ---------------------------------------------------------------------------
// SynthesisRequest
// ---------------------------------------------------------------------------

/// A validated-on-build request to render the current script to audio.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Voice for speaker 0. Required.
    pub host_voice_id: String,
    /// Voice for speaker 1; the backend falls back to the host voice when
    /// absent.
    pub guest_voice_id: Option<String>,
    /// The script, in reading order.
    pub lines: Vec<ScriptLine>,
    /// Global speed multiplier (0.5 – 2.0).
    pub speed: f32,
    /// Global pitch multiplier (0.5 – 2.0).
    pub pitch: f32,
    /// Optional filename prefix; `None` or blank uses the configured
    /// default (`"podcast"`).
    pub filename_prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// Render the script as the backend's speaker-tagged text payload.
///
/// Every line is included — blank ones too — preserving original order, so
/// the payload mirrors exactly what the user sees in the editor.
pub fn speaker_tagged_text(lines: &[ScriptLine]) -> String {
    lines
        .iter()
        .map(|line| format!("Speaker {}: {}", line.speaker.index(), line.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 2 when any line belongs to the guest, else 1.
pub fn num_speakers(lines: &[ScriptLine]) -> u8 {
    if any_guest(lines) {
        2
    } else {
        1
    }
}

/// Build the output filename: UTC date, prefix, local wall-clock time.
///
/// A `None` or blank prefix falls back to `default_prefix`. The result
/// always matches `^\d{8}_.+_\d{6}\.wav$`.
pub fn synthesis_filename(prefix: Option<&str>, default_prefix: &str) -> String {
    let date = Utc::now().format("%Y%m%d");
    let time = Local::now().format("%H%M%S");

    let prefix = match prefix {
        Some(p) if !p.trim().is_empty() => p.trim(),
        _ => default_prefix,
    };

    format!("{date}_{prefix}_{time}.wav")
}

/// Validate a [`SynthesisRequest`] and assemble the wire-level
/// [`GenerationRequest`]. Fails with [`JobError::Validation`] — before any
/// network traffic — when no host voice is selected or every line is blank.
pub fn build_generation_request(
    request: &SynthesisRequest,
    default_prefix: &str,
) -> Result<GenerationRequest, JobError> {
    if request.host_voice_id.trim().is_empty() {
        return Err(JobError::Validation("select a host voice first".into()));
    }
    if all_blank(&request.lines) {
        return Err(JobError::Validation("script is empty".into()));
    }

    Ok(GenerationRequest {
        text: speaker_tagged_text(&request.lines),
        voice_id: request.host_voice_id.clone(),
        guest_voice_id: request.guest_voice_id.clone(),
        num_speakers: num_speakers(&request.lines),
        speed: request.speed,
        pitch: request.pitch,
        custom_filename: synthesis_filename(request.filename_prefix.as_deref(), default_prefix),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
