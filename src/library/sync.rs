//! Library sync — reconciles the remote catalogs with session state.
//!
//! `refresh()` is a pure read: it fetches the voice catalog and the audio
//! library, installs both into the session (applying the voice
//! auto-assignment invariant) and returns them. It is idempotent and safe
//! to call while a generation job is in flight. The orchestrator invokes it
//! after initial load and after every mutating catalog operation
//! (clone/delete voice, finished synthesis, delete audio).

use std::sync::Arc;

use crate::api::types::{AudioFileInfo, VoiceProfile};
use crate::api::{StudioBackend, TransportError};
use crate::session::SessionStore;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The two remote catalogs as of one refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub voices: Vec<VoiceProfile>,
    pub audio_files: Vec<AudioFileInfo>,
}

// ---------------------------------------------------------------------------
// LibrarySync
// ---------------------------------------------------------------------------

/// Fetches the remote catalogs and installs them into the session store.
pub struct LibrarySync {
    backend: Arc<dyn StudioBackend>,
    store: SessionStore,
}

impl LibrarySync {
    pub fn new(backend: Arc<dyn StudioBackend>, store: SessionStore) -> Self {
        Self { backend, store }
    }

    /// Fetch both catalogs, apply them to the session and return them.
    ///
    /// A transport failure leaves the session's cached catalogs untouched.
    pub async fn refresh(&self) -> Result<Catalog, TransportError> {
        let voices = self.backend.list_voices().await?;
        let audio_files = self.backend.audio_library().await?;

        log::debug!(
            "library: refreshed ({} voices, {} audio files)",
            voices.len(),
            audio_files.len()
        );

        self.store.apply_catalog(voices.clone(), audio_files.clone());

        Ok(Catalog {
            voices,
            audio_files,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
