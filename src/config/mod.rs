//! Configuration module for the studio client.
//!
//! Provides `StudioConfig` (top-level settings), sub-configs for each
//! subsystem, `AppPaths` for cross-platform data directories, and TOML
//! persistence via `StudioConfig::load` / `StudioConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    ApiConfig, PollConfig, ScriptConfig, StudioConfig, SynthesisConfig, UploadConfig,
};
