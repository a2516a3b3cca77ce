//! Workflow state store — the studio session aggregate and its mutation
//! entry points.
//!
//! The session is mutated only through [`SessionStore`]'s command methods,
//! each of which holds the lock for exactly one atomic update. Polling
//! observers, library sync and the orchestrator all share one store.

pub mod state;
pub mod store;

pub use state::{
    new_shared_session, ActiveJob, JobStatus, NowPlaying, SharedSession, StudioSession,
};
pub use store::SessionStore;
