//! Studio settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Settings for the backend HTTP transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the studio backend (no trailing slash).
    pub base_url: String,
    /// Maximum seconds to wait for a single HTTP request before timing out.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// PollConfig
// ---------------------------------------------------------------------------

/// Settings for the generation-task polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Milliseconds between poll attempts, measured from completion of the
    /// previous attempt (not wall-clock-aligned).
    pub interval_ms: u64,
    /// Maximum number of poll attempts before the job is reported as timed
    /// out. 600 attempts at the default interval is roughly ten minutes,
    /// which comfortably covers a long synthesis run.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            max_attempts: 600,
        }
    }
}

impl PollConfig {
    /// Poll interval as a [`std::time::Duration`].
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}

// ---------------------------------------------------------------------------
// UploadConfig
// ---------------------------------------------------------------------------

/// Limits for reference-audio uploads (voice cloning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum reference clip size in megabytes, enforced client-side before
    /// any network call.
    pub max_audio_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_audio_mb: 5 }
    }
}

impl UploadConfig {
    /// The upload cap in bytes.
    pub fn max_audio_bytes(&self) -> u64 {
        self.max_audio_mb * 1024 * 1024
    }
}

// ---------------------------------------------------------------------------
// ScriptConfig
// ---------------------------------------------------------------------------

/// Defaults for AI script generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Display name for speaker 0.
    pub host_name: String,
    /// Display name for speaker 1.
    pub guest_name: String,
    /// Conversation mode sent to the backend (`"multi"` for two speakers).
    pub mode: String,
    /// Default analysis style (e.g. `"Deep Dive"`, `"Debate"`, `"Critique"`).
    pub style: String,
    /// Default target language of the generated script.
    pub language: String,
    /// Default number of dialogue turns.
    pub rounds: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            host_name: "Host".into(),
            guest_name: "Guest".into(),
            mode: "multi".into(),
            style: "Deep Dive".into(),
            language: "Chinese".into(),
            rounds: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// Defaults for audio synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Global playback speed multiplier (0.5 – 2.0).
    pub speed: f32,
    /// Global pitch multiplier (0.5 – 2.0).
    pub pitch: f32,
    /// Filename prefix used when the caller supplies none.
    pub default_prefix: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 1.0,
            default_prefix: "podcast".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// StudioConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level studio configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_studio::config::StudioConfig;
///
/// // Load (returns Default when file is missing)
/// let config = StudioConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Backend transport settings.
    pub api: ApiConfig,
    /// Task polling policy.
    pub poll: PollConfig,
    /// Upload limits.
    pub upload: UploadConfig,
    /// Script generation defaults.
    pub script: ScriptConfig,
    /// Audio synthesis defaults.
    pub synthesis: SynthesisConfig,
}

impl StudioConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(StudioConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `StudioConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = StudioConfig::default();
        original.save_to(&path).expect("save");

        let loaded = StudioConfig::load_from(&path).expect("load");

        assert_eq!(original.api.base_url, loaded.api.base_url);
        assert_eq!(original.api.timeout_secs, loaded.api.timeout_secs);
        assert_eq!(original.poll.interval_ms, loaded.poll.interval_ms);
        assert_eq!(original.poll.max_attempts, loaded.poll.max_attempts);
        assert_eq!(original.upload.max_audio_mb, loaded.upload.max_audio_mb);
        assert_eq!(original.script.style, loaded.script.style);
        assert_eq!(original.script.language, loaded.script.language);
        assert_eq!(original.script.rounds, loaded.script.rounds);
        assert_eq!(original.synthesis.speed, loaded.synthesis.speed);
        assert_eq!(
            original.synthesis.default_prefix,
            loaded.synthesis.default_prefix
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = StudioConfig::load_from(&path).expect("should not error");
        let default = StudioConfig::default();

        assert_eq!(config.api.base_url, default.api.base_url);
        assert_eq!(config.poll.interval_ms, default.poll.interval_ms);
        assert_eq!(config.script.host_name, default.script.host_name);
    }

    /// Verify default values match the backend's expectations.
    #[test]
    fn default_values() {
        let cfg = StudioConfig::default();

        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.poll.interval_ms, 1_000);
        assert_eq!(cfg.poll.max_attempts, 600);
        assert_eq!(cfg.upload.max_audio_mb, 5);
        assert_eq!(cfg.upload.max_audio_bytes(), 5 * 1024 * 1024);
        assert_eq!(cfg.script.mode, "multi");
        assert_eq!(cfg.script.rounds, 5);
        assert_eq!(cfg.synthesis.default_prefix, "podcast");
        assert!((cfg.synthesis.speed - 1.0).abs() < f32::EPSILON);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = StudioConfig::default();
        cfg.api.base_url = "https://studio.example.com".into();
        cfg.api.timeout_secs = 60;
        cfg.poll.interval_ms = 2_500;
        cfg.poll.max_attempts = 40;
        cfg.upload.max_audio_mb = 10;
        cfg.script.language = "English".into();
        cfg.script.style = "Debate".into();
        cfg.synthesis.pitch = 1.2;
        cfg.synthesis.default_prefix = "episode".into();

        cfg.save_to(&path).expect("save");
        let loaded = StudioConfig::load_from(&path).expect("load");

        assert_eq!(loaded.api.base_url, "https://studio.example.com");
        assert_eq!(loaded.api.timeout_secs, 60);
        assert_eq!(loaded.poll.interval_ms, 2_500);
        assert_eq!(loaded.poll.max_attempts, 40);
        assert_eq!(loaded.upload.max_audio_mb, 10);
        assert_eq!(loaded.script.language, "English");
        assert_eq!(loaded.script.style, "Debate");
        assert!((loaded.synthesis.pitch - 1.2).abs() < f32::EPSILON);
        assert_eq!(loaded.synthesis.default_prefix, "episode");
    }

    #[test]
    fn poll_interval_duration() {
        let cfg = PollConfig {
            interval_ms: 250,
            max_attempts: 3,
        };
        assert_eq!(cfg.interval(), std::time::Duration::from_millis(250));
    }
}
