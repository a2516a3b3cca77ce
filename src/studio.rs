//! `Studio` — the root orchestrator tying submission, polling, session
//! state and library sync together.
//!
//! # Operation flow
//!
//! ```text
//! user intent
//!   └─▶ JobSubmitter ── validate ── StudioBackend call
//!         ├─ one-shot (script gen / optimize / clone) ─▶ SessionStore update
//!         │                                              └─▶ LibrarySync (clone only)
//!         └─ job handle (audio synthesis)
//!               └─▶ SessionStore.begin_job ─▶ Poller.start_with
//!                     └─▶ SynthesisTracker (observer)
//!                           ├─ on_status   ─▶ SessionStore.update_job_status
//!                           └─ on_terminal ─▶ complete/fail job ─▶ LibrarySync
//! ```
//!
//! All session mutations funnel through [`SessionStore`]'s atomic command
//! methods; the orchestrator itself keeps no mutable state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::types::{TaskStatus, UploadFile, VoiceProfile};
use crate::api::{HttpBackend, StudioBackend, TokenProvider, TransportError};
use crate::config::StudioConfig;
use crate::jobs::poller::{JobObserver, Poller, SynthesisOutcome};
use crate::jobs::submit::{JobSubmitter, ScriptSource};
use crate::jobs::synthesis::SynthesisRequest;
use crate::jobs::{CancellationToken, JobError, JobKind};
use crate::library::{Catalog, LibrarySync};
use crate::script::ScriptLine;
use crate::session::SessionStore;

// ---------------------------------------------------------------------------
// SynthesisTracker
// ---------------------------------------------------------------------------

/// Poll observer for audio-synthesis jobs.
///
/// Status ticks update the tracked job's message; the terminal notification
/// either loads the artifact into the player and refreshes the library, or
/// clears the job and records the failure. All store calls are task-id
/// guarded, so a tracker for a replaced job is inert.
struct SynthesisTracker {
    store: SessionStore,
    library: Arc<LibrarySync>,
}

#[async_trait]
impl JobObserver for SynthesisTracker {
    async fn on_status(&self, task_id: &str, status: TaskStatus) {
        self.store
            .update_job_status(JobKind::AudioSynthesis, task_id, status);
    }

    async fn on_terminal(&self, task_id: &str, outcome: Result<SynthesisOutcome, JobError>) {
        match outcome {
            Ok(outcome) => {
                if self.store.complete_audio_job(task_id, &outcome) {
                    log::info!("studio: task {task_id} produced {}", outcome.filename);
                    if let Err(e) = self.library.refresh().await {
                        log::warn!("studio: library refresh after synthesis failed: {e}");
                    }
                }
            }
            Err(e) => {
                let message = e.to_string();
                if self
                    .store
                    .fail_job(JobKind::AudioSynthesis, task_id, message.clone())
                {
                    log::error!("studio: task {task_id} failed: {message}");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Studio
// ---------------------------------------------------------------------------

/// The studio orchestration core.
///
/// Create with [`Studio::new`] (any [`StudioBackend`]) or
/// [`Studio::with_http`] (the reqwest transport), call
/// [`init`](Self::init) once, then drive it with the user-level operations.
/// Presentational layers read state through [`store`](Self::store).
pub struct Studio {
    backend: Arc<dyn StudioBackend>,
    submitter: JobSubmitter,
    poller: Poller,
    store: SessionStore,
    library: Arc<LibrarySync>,
    config: StudioConfig,
}

impl Studio {
    pub fn new(backend: Arc<dyn StudioBackend>, config: StudioConfig) -> Self {
        let store = SessionStore::new();
        let submitter = JobSubmitter::new(Arc::clone(&backend), config.clone());
        let poller = Poller::new(Arc::clone(&backend), &config.poll);
        let library = Arc::new(LibrarySync::new(Arc::clone(&backend), store.clone()));

        Self {
            backend,
            submitter,
            poller,
            store,
            library,
            config,
        }
    }

    /// Convenience constructor over the reqwest transport.
    pub fn with_http(config: StudioConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        let backend = Arc::new(HttpBackend::from_config(&config.api, tokens));
        Self::new(backend, config)
    }

    /// The session store; presentational layers observe state through it.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Initial load: populate the voice and audio catalogs (which also
    /// auto-assigns unset voice selections).
    pub async fn init(&self) -> Result<Catalog, TransportError> {
        self.library.refresh().await
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<(), TransportError> {
        self.backend.health().await
    }

    // -----------------------------------------------------------------------
    // Script operations
    // -----------------------------------------------------------------------

    /// Generate a script from `source` and replace the session's script
    /// wholesale with the result.
    pub async fn generate_script(
        &self,
        source: ScriptSource,
        style: &str,
        language: &str,
        rounds: u32,
    ) -> Result<Vec<ScriptLine>, JobError> {
        let lines = self
            .submitter
            .generate_script(source, style, language, rounds)
            .await?;
        self.store.set_script_lines(lines.clone());
        Ok(lines)
    }

    /// Polish the current script with emotion/prosody tags and replace it
    /// wholesale with the optimized version.
    pub async fn optimize_script(&self) -> Result<Vec<ScriptLine>, JobError> {
        let current = self.store.script_lines();
        let lines = self.submitter.optimize_script(&current).await?;
        self.store.set_script_lines(lines.clone());
        Ok(lines)
    }

    // -----------------------------------------------------------------------
    // Audio synthesis
    // -----------------------------------------------------------------------

    /// Render the current script with the selected voices.
    ///
    /// Submits the job, begins tracking it (implicitly cancelling a prior
    /// in-flight synthesis) and attaches the poller. Returns the
    /// cancellation token; the terminal result lands in the session store.
    pub async fn produce_audio(
        &self,
        speed: f32,
        pitch: f32,
        filename_prefix: Option<String>,
    ) -> Result<CancellationToken, JobError> {
        let (host, guest) = self.store.selections();

        let request = SynthesisRequest {
            host_voice_id: host.unwrap_or_default(),
            guest_voice_id: guest,
            lines: self.store.script_lines(),
            speed,
            pitch,
            filename_prefix,
        };

        let handle = self.submitter.submit_audio(&request).await?;
        let token = CancellationToken::new();

        // Register the job before the first poll can resolve, so even an
        // instantly-completed task finds its tracking entry.
        self.store
            .begin_job(JobKind::AudioSynthesis, handle.task_id.clone(), token.clone());

        let tracker = Arc::new(SynthesisTracker {
            store: self.store.clone(),
            library: Arc::clone(&self.library),
        });
        self.poller
            .start_with(handle.task_id, tracker, token.clone());

        Ok(token)
    }

    /// Stop tracking (and polling) the in-flight synthesis, if any.
    pub fn cancel_synthesis(&self) -> bool {
        self.store.cancel_job(JobKind::AudioSynthesis)
    }

    // -----------------------------------------------------------------------
    // Voice catalog
    // -----------------------------------------------------------------------

    /// Clone a voice from a reference clip, then refresh the catalogs.
    pub async fn clone_voice(
        &self,
        name: &str,
        file: &UploadFile,
    ) -> Result<VoiceProfile, JobError> {
        let profile = self.submitter.clone_voice(name, file).await?;
        if let Err(e) = self.library.refresh().await {
            log::warn!("studio: library refresh after voice clone failed: {e}");
        }
        Ok(profile)
    }

    /// Delete a voice, then refresh the catalogs. A selection still
    /// pointing at the deleted voice is left as-is for the UI to reconcile.
    pub async fn delete_voice(&self, voice_id: &str) -> Result<(), TransportError> {
        self.backend.delete_voice(voice_id).await?;
        if let Err(e) = self.library.refresh().await {
            log::warn!("studio: library refresh after voice delete failed: {e}");
        }
        Ok(())
    }

    /// Raw bytes of a voice's reference clip, for sample playback.
    pub async fn voice_sample(&self, voice_id: &str) -> Result<Vec<u8>, TransportError> {
        self.backend.voice_sample(voice_id).await
    }

    // -----------------------------------------------------------------------
    // Audio library
    // -----------------------------------------------------------------------

    /// Load a library artifact into the player.
    pub fn play_from_library(&self, filename: &str) {
        self.store
            .set_now_playing(format!("/api/audio/{filename}"), filename);
    }

    /// Close the player footer.
    pub fn close_player(&self) {
        self.store.close_player();
    }

    /// Download a produced artifact.
    pub async fn fetch_audio(&self, filename: &str) -> Result<Vec<u8>, TransportError> {
        self.backend.fetch_audio(filename).await
    }

    /// Delete a produced artifact, then refresh the catalogs. The player
    /// keeps a stale reference if it was showing this artifact.
    pub async fn delete_audio(&self, filename: &str) -> Result<(), TransportError> {
        self.backend.delete_audio(filename).await?;
        if let Err(e) = self.library.refresh().await {
            log::warn!("studio: library refresh after audio delete failed: {e}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{
        AudioFileInfo, GenerationResult, ScriptResponse, TaskResponse, WireScriptLine,
    };
    use crate::api::MockBackend;
    use crate::config::PollConfig;
    use crate::script::Speaker;
    use std::time::Duration;

    fn voice(id: &str, name: &str) -> VoiceProfile {
        VoiceProfile {
            id: id.into(),
            name: name.into(),
            voice_type: "uploaded".into(),
            path: format!("/voices/{id}.wav"),
            created_at: String::new(),
        }
    }

    fn fast_config() -> StudioConfig {
        StudioConfig {
            poll: PollConfig {
                interval_ms: 1,
                max_attempts: 50,
            },
            ..StudioConfig::default()
        }
    }

    fn processing(task_id: &str) -> TaskResponse {
        TaskResponse {
            task_id: task_id.into(),
            status: TaskStatus::Processing,
            result: None,
            error: None,
        }
    }

    fn completed(task_id: &str, filename: &str) -> TaskResponse {
        TaskResponse {
            task_id: task_id.into(),
            status: TaskStatus::Completed,
            result: Some(GenerationResult {
                success: true,
                audio_url: Some(format!("/api/audio/{filename}")),
                filename: Some(filename.into()),
                duration: Some(30.0),
                message: String::new(),
            }),
            error: None,
        }
    }

    fn studio_with(backend: Arc<MockBackend>) -> Studio {
        Studio::new(backend, fast_config())
    }

    /// Wait until `predicate` holds against the store, or panic.
    async fn wait_for(store: &SessionStore, predicate: impl Fn(&crate::session::StudioSession) -> bool) {
        for _ in 0..200 {
            if predicate(&store.snapshot()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("condition not reached in time");
    }

    // ---- init --------------------------------------------------------------

    #[tokio::test]
    async fn init_populates_catalogs_and_selections() {
        let backend = Arc::new(MockBackend::default());
        *backend.voices.lock().unwrap() = vec![voice("v1", "A"), voice("v2", "B")];

        let studio = studio_with(Arc::clone(&backend));
        studio.init().await.unwrap();

        let session = studio.store().snapshot();
        assert_eq!(session.voices.len(), 2);
        assert_eq!(session.selected_host_voice.as_deref(), Some("v1"));
        assert_eq!(session.selected_guest_voice.as_deref(), Some("v2"));
    }

    // ---- script ------------------------------------------------------------

    #[tokio::test]
    async fn generate_script_republishes_lines() {
        let backend = Arc::new(MockBackend::default());
        *backend.script_response.lock().unwrap() = Some(ScriptResponse {
            success: true,
            script: vec![WireScriptLine {
                id: None,
                speaker: "Host".into(),
                text: "Welcome!".into(),
            }],
        });

        let studio = studio_with(backend);
        let lines = studio
            .generate_script(
                ScriptSource::Text("topic".into()),
                "Deep Dive",
                "English",
                5,
            )
            .await
            .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(studio.store().script_lines(), lines);
    }

    #[tokio::test]
    async fn optimize_script_requires_non_blank_lines() {
        let backend = Arc::new(MockBackend::default());
        let studio = studio_with(Arc::clone(&backend));

        let err = studio.optimize_script().await.unwrap_err();
        assert!(matches!(err, JobError::Validation(_)));
        assert_eq!(backend.call_count("optimize_script"), 0);
    }

    // ---- audio synthesis ---------------------------------------------------

    #[tokio::test]
    async fn produce_audio_happy_path() {
        let backend = Arc::new(MockBackend::default());
        *backend.voices.lock().unwrap() = vec![voice("v1", "A")];
        backend.push_status(Ok(processing("task-1")));
        backend.push_status(Ok(processing("task-1")));
        backend.push_status(Ok(completed("task-1", "x.wav")));

        let studio = studio_with(Arc::clone(&backend));
        studio.init().await.unwrap();
        studio
            .store()
            .set_script_lines(vec![
                ScriptLine::new(Speaker::Host, "Hi"),
                ScriptLine::new(Speaker::Guest, "Hello"),
            ]);

        studio.produce_audio(1.0, 1.0, None).await.unwrap();
        assert!(studio.store().is_busy(JobKind::AudioSynthesis));

        wait_for(studio.store(), |s| s.now_playing.is_some()).await;

        let session = studio.store().snapshot();
        assert_eq!(session.now_playing.as_ref().unwrap().filename, "x.wav");
        assert!(session.active_jobs.is_empty());
        assert!(session.last_error.is_none());
        // Script survives a completed synthesis.
        assert_eq!(session.script_lines.len(), 2);
        // Library was refreshed after completion (init + completion).
        assert_eq!(backend.call_count("audio_library"), 2);
    }

    #[tokio::test]
    async fn produce_audio_failure_clears_job_and_records_error() {
        let backend = Arc::new(MockBackend::default());
        *backend.voices.lock().unwrap() = vec![voice("v1", "A")];
        backend.push_status(Ok(TaskResponse {
            task_id: "task-1".into(),
            status: TaskStatus::Failed,
            result: None,
            error: Some("oom".into()),
        }));

        let studio = studio_with(Arc::clone(&backend));
        studio.init().await.unwrap();
        studio
            .store()
            .set_script_lines(vec![ScriptLine::new(Speaker::Host, "Hi")]);

        studio.produce_audio(1.0, 1.0, None).await.unwrap();
        wait_for(studio.store(), |s| s.last_error.is_some()).await;

        let session = studio.store().snapshot();
        assert!(session.active_jobs.is_empty());
        assert!(session.now_playing.is_none());
        assert!(session.last_error.as_deref().unwrap().contains("oom"));
    }

    #[tokio::test]
    async fn produce_audio_without_voice_is_validation_error() {
        let backend = Arc::new(MockBackend::default());
        let studio = studio_with(Arc::clone(&backend));
        studio
            .store()
            .set_script_lines(vec![ScriptLine::new(Speaker::Host, "Hi")]);

        // No init, no catalog — no voice selected.
        let err = studio.produce_audio(1.0, 1.0, None).await.unwrap_err();
        assert!(matches!(err, JobError::Validation(_)));
        assert_eq!(backend.call_count("submit_generation"), 0);
        assert!(!studio.store().is_busy(JobKind::AudioSynthesis));
    }

    #[tokio::test]
    async fn cancel_synthesis_stops_tracking() {
        let backend = Arc::new(MockBackend::default());
        *backend.voices.lock().unwrap() = vec![voice("v1", "A")];
        for _ in 0..200 {
            backend.push_status(Ok(processing("task-1")));
        }

        let studio = studio_with(Arc::clone(&backend));
        studio.init().await.unwrap();
        studio
            .store()
            .set_script_lines(vec![ScriptLine::new(Speaker::Host, "Hi")]);

        let token = studio.produce_audio(1.0, 1.0, None).await.unwrap();
        assert!(studio.cancel_synthesis());
        assert!(token.is_cancelled());
        assert!(!studio.store().is_busy(JobKind::AudioSynthesis));

        // Nothing may land in the player after cancellation.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(studio.store().snapshot().now_playing.is_none());
    }

    // ---- voices ------------------------------------------------------------

    #[tokio::test]
    async fn clone_voice_refreshes_catalog() {
        let backend = Arc::new(MockBackend::default());
        let studio = studio_with(Arc::clone(&backend));

        let file = UploadFile::new("clip.wav", vec![0u8; 512]);
        let profile = studio.clone_voice("Narrator", &file).await.unwrap();

        assert_eq!(profile.name, "Narrator");
        assert_eq!(backend.call_count("upload_voice"), 1);
        assert_eq!(backend.call_count("list_voices"), 1);
    }

    #[tokio::test]
    async fn delete_voice_refreshes_but_keeps_stale_selection() {
        let backend = Arc::new(MockBackend::default());
        *backend.voices.lock().unwrap() = vec![voice("v1", "A"), voice("v2", "B")];

        let studio = studio_with(Arc::clone(&backend));
        studio.init().await.unwrap();
        assert_eq!(
            studio.store().selections().0.as_deref(),
            Some("v1")
        );

        // v1 disappears from the remote catalog.
        *backend.voices.lock().unwrap() = vec![voice("v2", "B")];
        studio.delete_voice("v1").await.unwrap();

        assert_eq!(backend.call_count("delete_voice"), 1);
        // Known gap: the stale host selection is preserved.
        assert_eq!(studio.store().selections().0.as_deref(), Some("v1"));
        assert_eq!(studio.store().snapshot().voices.len(), 1);
    }

    // ---- player / library --------------------------------------------------

    #[tokio::test]
    async fn play_from_library_and_close() {
        let backend = Arc::new(MockBackend::default());
        let studio = studio_with(backend);

        studio.play_from_library("a.wav");
        let now = studio.store().snapshot().now_playing.unwrap();
        assert_eq!(now.url, "/api/audio/a.wav");
        assert_eq!(now.filename, "a.wav");

        studio.close_player();
        assert!(studio.store().snapshot().now_playing.is_none());
    }

    #[tokio::test]
    async fn delete_audio_refreshes_library() {
        let backend = Arc::new(MockBackend::default());
        *backend.audio_files.lock().unwrap() = vec![AudioFileInfo {
            filename: "a.wav".into(),
            voice_name: "A".into(),
            duration: 5.0,
            size: None,
            text_preview: String::new(),
            created_at: String::new(),
        }];

        let studio = studio_with(Arc::clone(&backend));
        studio.delete_audio("a.wav").await.unwrap();

        assert_eq!(backend.call_count("delete_audio"), 1);
        assert_eq!(backend.call_count("audio_library"), 1);
    }
}
