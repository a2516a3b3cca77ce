//! `SessionStore` — the session's mutation entry points.
//!
//! Every method takes the session lock exactly once, so each entry point is
//! one atomic command against the aggregate: observers never see a compound
//! update (clear job + set player, say) half-applied. None of these methods
//! await; network work happens in the modules that call them.

use crate::api::types::{AudioFileInfo, TaskStatus, VoiceProfile};
use crate::jobs::{CancellationToken, JobKind, SynthesisOutcome};
use crate::script::{ScriptLine, Speaker};

use super::state::{
    new_shared_session, ActiveJob, JobStatus, NowPlaying, SharedSession, StudioSession,
};

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Cheaply-cloneable handle exposing command-style mutations over the
/// [`StudioSession`] aggregate.
#[derive(Clone, Default)]
pub struct SessionStore {
    shared: SharedSession,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            shared: new_shared_session(),
        }
    }

    /// The underlying shared handle, for read-only observers.
    pub fn shared(&self) -> SharedSession {
        std::sync::Arc::clone(&self.shared)
    }

    /// A point-in-time copy of the whole aggregate.
    pub fn snapshot(&self) -> StudioSession {
        self.shared.lock().unwrap().clone()
    }

    // -----------------------------------------------------------------------
    // Script lines
    // -----------------------------------------------------------------------

    /// Replace the script wholesale and republish the full ordered
    /// sequence. Used for generation/optimization results; no incremental
    /// diffing.
    pub fn set_script_lines(&self, lines: Vec<ScriptLine>) {
        let mut session = self.shared.lock().unwrap();
        session.script_lines = lines;
    }

    /// Current script, in reading order.
    pub fn script_lines(&self) -> Vec<ScriptLine> {
        self.shared.lock().unwrap().script_lines.clone()
    }

    /// Append an empty line for `speaker`; returns the new line.
    pub fn add_line(&self, speaker: Speaker) -> ScriptLine {
        let line = ScriptLine::new(speaker, "");
        let mut session = self.shared.lock().unwrap();
        session.script_lines.push(line.clone());
        line
    }

    /// Rewrite the text of the line with `id`. Returns `false` when no such
    /// line exists.
    pub fn update_line_text(&self, id: &str, text: &str) -> bool {
        let mut session = self.shared.lock().unwrap();
        match session.script_lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Flip the line with `id` between host and guest.
    pub fn toggle_line_speaker(&self, id: &str) -> bool {
        let mut session = self.shared.lock().unwrap();
        match session.script_lines.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.speaker = line.speaker.toggled();
                true
            }
            None => false,
        }
    }

    /// Remove the line with `id`. Returns `false` when no such line exists.
    pub fn remove_line(&self, id: &str) -> bool {
        let mut session = self.shared.lock().unwrap();
        let before = session.script_lines.len();
        session.script_lines.retain(|l| l.id != id);
        session.script_lines.len() != before
    }

    // -----------------------------------------------------------------------
    // Voice selection
    // -----------------------------------------------------------------------

    pub fn select_host(&self, voice_id: impl Into<String>) {
        self.shared.lock().unwrap().selected_host_voice = Some(voice_id.into());
    }

    pub fn select_guest(&self, voice_id: impl Into<String>) {
        self.shared.lock().unwrap().selected_guest_voice = Some(voice_id.into());
    }

    /// `(host, guest)` voice ids as currently selected.
    pub fn selections(&self) -> (Option<String>, Option<String>) {
        let session = self.shared.lock().unwrap();
        (
            session.selected_host_voice.clone(),
            session.selected_guest_voice.clone(),
        )
    }

    // -----------------------------------------------------------------------
    // Job tracking
    // -----------------------------------------------------------------------

    /// Track a newly submitted job of `kind`.
    ///
    /// Any prior job of the same kind is implicitly invalidated: its token
    /// is cancelled and its entry replaced, so a stale poller can neither
    /// tick on nor mutate this session. Also clears `last_error` — a fresh
    /// submission starts clean.
    pub fn begin_job(&self, kind: JobKind, task_id: impl Into<String>, token: CancellationToken) {
        let mut session = self.shared.lock().unwrap();
        if let Some(prior) = session.active_jobs.get(&kind) {
            log::debug!("session: replacing in-flight {kind} job {}", prior.task_id);
            prior.token.cancel();
        }
        let task_id = task_id.into();
        session.active_jobs.insert(
            kind,
            ActiveJob {
                task_id,
                kind,
                status: JobStatus::Submitted,
                message: "Task submitted, processing...".into(),
                token,
            },
        );
        session.last_error = None;
    }

    /// Record a non-terminal poll status. Ignored when `task_id` no longer
    /// matches the tracked job of that kind (a replaced or cancelled poller
    /// must not mutate state).
    pub fn update_job_status(&self, kind: JobKind, task_id: &str, status: TaskStatus) -> bool {
        let mut session = self.shared.lock().unwrap();
        match session.active_jobs.get_mut(&kind) {
            Some(job) if job.task_id == task_id => {
                job.status = JobStatus::from_wire(status);
                job.message = format!("Processing... ({status})");
                true
            }
            _ => false,
        }
    }

    /// Terminal success of an audio-synthesis job: clear the tracked job
    /// and load the artifact into the player, atomically. Script lines are
    /// left untouched.
    pub fn complete_audio_job(&self, task_id: &str, outcome: &SynthesisOutcome) -> bool {
        let mut session = self.shared.lock().unwrap();
        let tracked = session
            .active_jobs
            .get(&JobKind::AudioSynthesis)
            .is_some_and(|job| job.task_id == task_id);
        if !tracked {
            log::debug!("session: stale completion for task {task_id} ignored");
            return false;
        }

        session.active_jobs.remove(&JobKind::AudioSynthesis);
        session.now_playing = Some(NowPlaying {
            url: outcome.audio_url.clone(),
            filename: outcome.filename.clone(),
        });
        true
    }

    /// Terminal failure: clear the tracked job so a new submission is
    /// possible and surface the message.
    pub fn fail_job(&self, kind: JobKind, task_id: &str, message: impl Into<String>) -> bool {
        let mut session = self.shared.lock().unwrap();
        let tracked = session
            .active_jobs
            .get(&kind)
            .is_some_and(|job| job.task_id == task_id);
        if !tracked {
            return false;
        }

        session.active_jobs.remove(&kind);
        session.last_error = Some(message.into());
        true
    }

    /// Explicit user cancellation: stop the poller and drop the tracked
    /// job. No error is recorded.
    pub fn cancel_job(&self, kind: JobKind) -> bool {
        let mut session = self.shared.lock().unwrap();
        match session.active_jobs.remove(&kind) {
            Some(job) => {
                job.token.cancel();
                log::info!("session: cancelled {kind} job {}", job.task_id);
                true
            }
            None => false,
        }
    }

    pub fn active_job(&self, kind: JobKind) -> Option<ActiveJob> {
        self.shared.lock().unwrap().active_jobs.get(&kind).cloned()
    }

    pub fn is_busy(&self, kind: JobKind) -> bool {
        self.shared.lock().unwrap().active_jobs.contains_key(&kind)
    }

    pub fn last_error(&self) -> Option<String> {
        self.shared.lock().unwrap().last_error.clone()
    }

    // -----------------------------------------------------------------------
    // Player
    // -----------------------------------------------------------------------

    /// Load an artifact into the player (e.g. replaying from the library).
    pub fn set_now_playing(&self, url: impl Into<String>, filename: impl Into<String>) {
        self.shared.lock().unwrap().now_playing = Some(NowPlaying {
            url: url.into(),
            filename: filename.into(),
        });
    }

    /// Close the player footer.
    pub fn close_player(&self) {
        self.shared.lock().unwrap().now_playing = None;
    }

    // -----------------------------------------------------------------------
    // Catalogs
    // -----------------------------------------------------------------------

    /// Install freshly fetched catalogs and apply the selection invariant:
    /// an unset host takes the first voice, an unset guest the second (or
    /// the first when only one exists).
    ///
    /// Selections that no longer resolve against the new catalog are left
    /// in place — re-validating them after a deletion is the UI layer's
    /// responsibility, not this core's.
    pub fn apply_catalog(&self, voices: Vec<VoiceProfile>, audio_files: Vec<AudioFileInfo>) {
        let mut session = self.shared.lock().unwrap();

        if !voices.is_empty() {
            if session.selected_host_voice.is_none() {
                session.selected_host_voice = Some(voices[0].id.clone());
            }
            if session.selected_guest_voice.is_none() {
                let guest = voices.get(1).unwrap_or(&voices[0]);
                session.selected_guest_voice = Some(guest.id.clone());
            }
        }

        session.voices = voices;
        session.audio_files = audio_files;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(id: &str, name: &str) -> VoiceProfile {
        VoiceProfile {
            id: id.into(),
            name: name.into(),
            voice_type: "uploaded".into(),
            path: format!("/voices/{id}.wav"),
            created_at: String::new(),
        }
    }

    fn outcome(url: &str, filename: &str) -> SynthesisOutcome {
        SynthesisOutcome {
            audio_url: url.into(),
            filename: filename.into(),
            duration: None,
        }
    }

    // ---- script lines ------------------------------------------------------

    #[test]
    fn set_script_lines_replaces_wholesale() {
        let store = SessionStore::new();
        store.set_script_lines(vec![ScriptLine::new(Speaker::Host, "old")]);
        store.set_script_lines(vec![
            ScriptLine::new(Speaker::Host, "a"),
            ScriptLine::new(Speaker::Guest, "b"),
        ]);

        let lines = store.script_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[1].text, "b");
    }

    #[test]
    fn line_edits_by_id() {
        let store = SessionStore::new();
        let line = store.add_line(Speaker::Host);

        assert!(store.update_line_text(&line.id, "hello"));
        assert!(store.toggle_line_speaker(&line.id));

        let lines = store.script_lines();
        assert_eq!(lines[0].text, "hello");
        assert_eq!(lines[0].speaker, Speaker::Guest);

        assert!(store.remove_line(&line.id));
        assert!(store.script_lines().is_empty());
    }

    #[test]
    fn edits_on_unknown_id_return_false() {
        let store = SessionStore::new();
        assert!(!store.update_line_text("nope", "x"));
        assert!(!store.toggle_line_speaker("nope"));
        assert!(!store.remove_line("nope"));
    }

    // ---- job tracking ------------------------------------------------------

    #[test]
    fn begin_job_cancels_prior_of_same_kind() {
        let store = SessionStore::new();
        let first = CancellationToken::new();
        let second = CancellationToken::new();

        store.begin_job(JobKind::AudioSynthesis, "t1", first.clone());
        store.begin_job(JobKind::AudioSynthesis, "t2", second.clone());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(
            store.active_job(JobKind::AudioSynthesis).unwrap().task_id,
            "t2"
        );
    }

    #[test]
    fn jobs_of_different_kinds_are_independent() {
        let store = SessionStore::new();
        let synth = CancellationToken::new();
        store.begin_job(JobKind::AudioSynthesis, "t1", synth.clone());
        store.begin_job(JobKind::ScriptGen, "t2", CancellationToken::new());

        assert!(!synth.is_cancelled());
        assert!(store.is_busy(JobKind::AudioSynthesis));
        assert!(store.is_busy(JobKind::ScriptGen));
    }

    #[test]
    fn status_update_requires_matching_task_id() {
        let store = SessionStore::new();
        store.begin_job(JobKind::AudioSynthesis, "t1", CancellationToken::new());

        assert!(store.update_job_status(JobKind::AudioSynthesis, "t1", TaskStatus::Processing));
        let job = store.active_job(JobKind::AudioSynthesis).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.message, "Processing... (processing)");

        // A stale poller must not touch the replacement job.
        assert!(!store.update_job_status(JobKind::AudioSynthesis, "t0", TaskStatus::Failed));
        assert_eq!(
            store.active_job(JobKind::AudioSynthesis).unwrap().status,
            JobStatus::Processing
        );
    }

    /// Completion clears the job and loads the player in one atomic step.
    #[test]
    fn complete_audio_job_is_atomic() {
        let store = SessionStore::new();
        store.set_script_lines(vec![ScriptLine::new(Speaker::Host, "hi")]);
        store.begin_job(JobKind::AudioSynthesis, "t1", CancellationToken::new());

        assert!(store.complete_audio_job("t1", &outcome("/api/audio/x.wav", "x.wav")));

        let session = store.snapshot();
        assert!(session.active_jobs.is_empty());
        assert_eq!(
            session.now_playing,
            Some(NowPlaying {
                url: "/api/audio/x.wav".into(),
                filename: "x.wav".into()
            })
        );
        // Completing a job never clears the script.
        assert_eq!(session.script_lines.len(), 1);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let store = SessionStore::new();
        store.begin_job(JobKind::AudioSynthesis, "t2", CancellationToken::new());

        assert!(!store.complete_audio_job("t1", &outcome("u", "f")));
        assert!(store.snapshot().now_playing.is_none());
        assert!(store.is_busy(JobKind::AudioSynthesis));
    }

    #[test]
    fn fail_job_clears_and_records_error() {
        let store = SessionStore::new();
        store.begin_job(JobKind::AudioSynthesis, "t1", CancellationToken::new());

        assert!(store.fail_job(JobKind::AudioSynthesis, "t1", "generation failed: oom"));
        assert!(!store.is_busy(JobKind::AudioSynthesis));
        assert_eq!(store.last_error().as_deref(), Some("generation failed: oom"));

        // A fresh submission starts clean.
        store.begin_job(JobKind::AudioSynthesis, "t2", CancellationToken::new());
        assert!(store.last_error().is_none());
    }

    #[test]
    fn cancel_job_stops_token() {
        let store = SessionStore::new();
        let token = CancellationToken::new();
        store.begin_job(JobKind::AudioSynthesis, "t1", token.clone());

        assert!(store.cancel_job(JobKind::AudioSynthesis));
        assert!(token.is_cancelled());
        assert!(!store.is_busy(JobKind::AudioSynthesis));
        assert!(store.last_error().is_none());

        assert!(!store.cancel_job(JobKind::AudioSynthesis));
    }

    // ---- player ------------------------------------------------------------

    #[test]
    fn player_set_and_close() {
        let store = SessionStore::new();
        store.set_now_playing("/api/audio/a.wav", "a.wav");
        assert!(store.snapshot().now_playing.is_some());

        store.close_player();
        assert!(store.snapshot().now_playing.is_none());
    }

    // ---- catalogs ----------------------------------------------------------

    #[test]
    fn apply_catalog_auto_assigns_two_voices() {
        let store = SessionStore::new();
        store.apply_catalog(vec![voice("v1", "A"), voice("v2", "B")], Vec::new());

        assert_eq!(store.selections(), (Some("v1".into()), Some("v2".into())));
    }

    #[test]
    fn apply_catalog_single_voice_doubles_up() {
        let store = SessionStore::new();
        store.apply_catalog(vec![voice("v1", "A")], Vec::new());

        assert_eq!(store.selections(), (Some("v1".into()), Some("v1".into())));
    }

    #[test]
    fn apply_catalog_keeps_existing_selection() {
        let store = SessionStore::new();
        store.select_host("v9");
        store.apply_catalog(vec![voice("v1", "A"), voice("v2", "B")], Vec::new());

        // The set selection survives; only the unset guest is assigned.
        assert_eq!(store.selections(), (Some("v9".into()), Some("v2".into())));
    }

    #[test]
    fn apply_catalog_empty_assigns_nothing() {
        let store = SessionStore::new();
        store.apply_catalog(Vec::new(), Vec::new());
        assert_eq!(store.selections(), (None, None));
    }

    /// Known gap, preserved on purpose: a selection pointing at a deleted
    /// voice stays in place after the catalog refresh drops that voice.
    #[test]
    fn stale_selection_survives_catalog_refresh() {
        let store = SessionStore::new();
        store.apply_catalog(vec![voice("v1", "A"), voice("v2", "B")], Vec::new());
        assert_eq!(store.selections().0.as_deref(), Some("v1"));

        // v1 was deleted remotely; the refreshed catalog no longer has it.
        store.apply_catalog(vec![voice("v2", "B")], Vec::new());
        assert_eq!(store.selections().0.as_deref(), Some("v1"));
    }
}
