//! Job submission and polling.
//!
//! This module provides:
//! * [`JobSubmitter`] — turns user intents into backend calls (script
//!   generation, script optimization, voice cloning, audio synthesis).
//! * [`Poller`] / [`CancellationToken`] / [`JobObserver`] — fixed-interval
//!   status polling for long-running generation tasks.
//! * [`JobError`] — the error taxonomy for everything job-related.
//! * Pure payload builders for audio synthesis (speaker-tagged text,
//!   speaker count, deterministic filenames).

pub mod poller;
pub mod submit;
pub mod synthesis;

use thiserror::Error;

use crate::api::TransportError;

// ---------------------------------------------------------------------------
// JobKind
// ---------------------------------------------------------------------------

/// The long-running operations the studio can run.
///
/// At most one job of a given kind is tracked per session; submitting a new
/// one implicitly stops tracking (and cancels polling for) the prior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// AI script generation from text or an uploaded document.
    ScriptGen,
    /// Emotion/prosody polish of the current script.
    ScriptOptimize,
    /// Rendering the script to audio with the selected voices.
    AudioSynthesis,
}

impl JobKind {
    /// Short human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            JobKind::ScriptGen => "script generation",
            JobKind::ScriptOptimize => "script optimization",
            JobKind::AudioSynthesis => "audio synthesis",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// JobError
// ---------------------------------------------------------------------------

/// Everything that can go wrong between a user intent and a finished job.
///
/// `Validation` failures are raised client-side before any network call.
/// `Transport` failures abort one-shot calls (an individual poll tick
/// swallows them instead). `Failed`, `ResultMissing` and `TimedOut` are
/// terminal polling outcomes. None of these are fatal to the process — each
/// is scoped to the single user action that triggered it.
#[derive(Debug, Error)]
pub enum JobError {
    /// A client-side precondition failed; nothing was sent to the backend.
    #[error("{0}")]
    Validation(String),

    /// The underlying HTTP exchange failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The job reached terminal `failed` status; carries the server message.
    #[error("generation failed: {0}")]
    Failed(String),

    /// The job completed but the payload lacked the expected result fields.
    #[error("job completed without a usable result: {0}")]
    ResultMissing(String),

    /// The job never reached a terminal status within the poll budget.
    #[error("job did not finish after {attempts} poll attempts")]
    TimedOut { attempts: u32 },
}

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use poller::{CancellationToken, JobObserver, Poller, SynthesisOutcome};
pub use submit::{JobSubmitter, ScriptSource};
pub use synthesis::{
    num_speakers, speaker_tagged_text, synthesis_filename, SynthesisRequest,
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
