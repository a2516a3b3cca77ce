//! Authenticated transport against the studio backend.
//!
//! This module provides:
//! * [`TokenProvider`] — per-request credential seam (tokens are never cached).
//! * [`StudioBackend`] — async trait covering the full remote API surface.
//! * [`HttpBackend`] — reqwest implementation (JSON + multipart).
//! * [`TransportError`] — normalised request/response errors.
//! * Wire DTOs mirroring the backend's JSON.

pub mod auth;
pub mod backend;
pub mod client;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use auth::{StaticTokenProvider, TokenProvider};
pub use backend::{ScriptGenParams, StudioBackend, TransportError};

// test-only re-export so other modules' test code can script a backend
// without `use voice_studio::api::backend::MockBackend`.
#[cfg(test)]
pub use backend::MockBackend;
pub use client::HttpBackend;
pub use types::{
    AudioFileInfo, AudioLibraryResponse, GenerationRequest, GenerationResult, ScriptResponse,
    TaskHandle, TaskResponse, TaskStatus, UploadFile, VoiceProfile, VoiceUploadResponse,
    WireScriptLine,
};
