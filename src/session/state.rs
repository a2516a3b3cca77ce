//! Studio session state — the single source of truth for one user's
//! generation workflow.
//!
//! [`StudioSession`] is the aggregate; [`SharedSession`] (`Arc<Mutex<…>>`)
//! is the handle shared between the orchestrator, polling observers and any
//! presentational layer. All mutation goes through
//! [`SessionStore`](super::store::SessionStore) so compound updates are
//! atomic under a single lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::types::{AudioFileInfo, TaskStatus, VoiceProfile};
use crate::jobs::{CancellationToken, JobKind};
use crate::script::ScriptLine;

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Client-side view of a tracked job's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted by the backend, not yet observed processing.
    Submitted,
    /// A worker is on it (any non-terminal wire status).
    Processing,
    /// Terminal success.
    Completed,
    /// Terminal failure.
    Failed,
}

impl JobStatus {
    /// Map a wire status onto the client-side job state.
    pub fn from_wire(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => JobStatus::Submitted,
            TaskStatus::Completed => JobStatus::Completed,
            TaskStatus::Failed => JobStatus::Failed,
            // Unknown statuses are non-terminal, so "processing" is the
            // honest display.
            TaskStatus::Processing | TaskStatus::Unknown => JobStatus::Processing,
        }
    }

    /// A short human-readable label suitable for a status bar.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "Submitted",
            JobStatus::Processing => "Processing",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// ActiveJob
// ---------------------------------------------------------------------------

/// One tracked in-flight job.
///
/// The session owns the [`CancellationToken`] so polling can be stopped
/// independently of any presentational lifecycle.
#[derive(Debug, Clone)]
pub struct ActiveJob {
    pub task_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Observable progress message (e.g. `"Processing... (pending)"`).
    pub message: String,
    pub token: CancellationToken,
}

// ---------------------------------------------------------------------------
// NowPlaying
// ---------------------------------------------------------------------------

/// The artifact currently loaded in the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    /// Backend-relative URL of the audio.
    pub url: String,
    pub filename: String,
}

// ---------------------------------------------------------------------------
// StudioSession
// ---------------------------------------------------------------------------

/// In-memory aggregate of all state driving one studio session.
///
/// Nothing here is persisted — the session dies with the process.
#[derive(Debug, Clone, Default)]
pub struct StudioSession {
    /// Voice for speaker 0. Auto-assigned from the catalog when unset.
    pub selected_host_voice: Option<String>,
    /// Voice for speaker 1. Auto-assigned from the catalog when unset.
    pub selected_guest_voice: Option<String>,
    /// The script, in reading order.
    pub script_lines: Vec<ScriptLine>,
    /// At most one tracked job per kind.
    pub active_jobs: HashMap<JobKind, ActiveJob>,
    /// What the player footer is showing, if anything.
    pub now_playing: Option<NowPlaying>,
    /// Read-through cache of the remote voice catalog.
    pub voices: Vec<VoiceProfile>,
    /// Read-through cache of the remote audio library.
    pub audio_files: Vec<AudioFileInfo>,
    /// Message of the most recent job failure, cleared on resubmission.
    pub last_error: Option<String>,
}

// ---------------------------------------------------------------------------
// SharedSession
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`StudioSession`].
///
/// Cheap to clone (`Arc` clone). Lock for a short critical section; do
/// **not** hold the lock across `.await` points.
pub type SharedSession = Arc<Mutex<StudioSession>>;

/// Construct a new [`SharedSession`] wrapping an empty [`StudioSession`].
pub fn new_shared_session() -> SharedSession {
    Arc::new(Mutex::new(StudioSession::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
