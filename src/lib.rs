//! voice-studio — orchestration core for an AI podcast-production studio.
//!
//! Submits long-running content-generation jobs (script synthesis, voice
//! cloning, audio rendering) to a remote backend, polls them to completion
//! and keeps one in-memory studio session consistent across concurrent,
//! cancellable asynchronous operations.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────── Studio (orchestrator) ─────────────────────────┐
//! │                                                                          │
//! │  JobSubmitter ──▶ StudioBackend (HTTP) ◀── Poller ◀── CancellationToken  │
//! │       │                                      │                           │
//! │       ▼                                      ▼                           │
//! │  SessionStore ◀───────────────────── JobObserver (terminal results)      │
//! │       ▲                                                                  │
//! │  LibrarySync (catalog refresh after every mutating operation)            │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_studio::api::StaticTokenProvider;
//! use voice_studio::config::StudioConfig;
//! use voice_studio::jobs::ScriptSource;
//! use voice_studio::Studio;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     env_logger::Builder::from_env(
//!         env_logger::Env::default().default_filter_or("info"),
//!     )
//!     .init();
//!
//!     let config = StudioConfig::load()?;
//!     let studio = Studio::with_http(config, Arc::new(StaticTokenProvider::new("dev")));
//!
//!     // Load catalogs; unset voice selections are auto-assigned.
//!     studio.init().await?;
//!
//!     // Generate a script, then render it.
//!     studio
//!         .generate_script(
//!             ScriptSource::Text("The history of birdsong".into()),
//!             "Deep Dive",
//!             "English",
//!             5,
//!         )
//!         .await?;
//!     let _token = studio.produce_audio(1.0, 1.0, None).await?;
//!
//!     // The terminal result lands in the session store; see
//!     // `studio.store().snapshot().now_playing`.
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod jobs;
pub mod library;
pub mod script;
pub mod session;
pub mod studio;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use studio::Studio;
