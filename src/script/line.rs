//! Dialogue script domain types.
//!
//! A script is an ordered `Vec<ScriptLine>`; line ids are unique within a
//! session so individual lines can be edited or removed stably. Scripts are
//! session-only — they are never persisted, only replaced wholesale by a
//! generation/optimization result or edited line-by-line by the user.

use serde::{Deserialize, Serialize};

use crate::api::types::WireScriptLine;

// ---------------------------------------------------------------------------
// Speaker
// ---------------------------------------------------------------------------

/// Which of the two podcast voices a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    /// Speaker 0 in the synthesis payload.
    Host,
    /// Speaker 1 in the synthesis payload.
    Guest,
}

impl Speaker {
    /// Numeric speaker tag used in the synthesis payload.
    pub fn index(&self) -> u8 {
        match self {
            Speaker::Host => 0,
            Speaker::Guest => 1,
        }
    }

    /// Parse the backend's speaker string. Anything that is not exactly
    /// `"Guest"` maps to `Host`, matching how scripts are consumed
    /// downstream (speaker 0 is the safe default).
    pub fn from_wire(raw: &str) -> Self {
        if raw == "Guest" {
            Speaker::Guest
        } else {
            Speaker::Host
        }
    }

    /// The wire representation (`"Host"` / `"Guest"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Host => "Host",
            Speaker::Guest => "Guest",
        }
    }

    /// The other speaker; used by editors toggling a line's owner.
    pub fn toggled(&self) -> Self {
        match self {
            Speaker::Host => Speaker::Guest,
            Speaker::Guest => Speaker::Host,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScriptLine
// ---------------------------------------------------------------------------

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    /// Session-unique id (uuid v4), stable across edits.
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
}

impl ScriptLine {
    /// Create a line with a freshly generated id.
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            speaker,
            text: text.into(),
        }
    }

    /// Create a line with an explicit id (mostly useful in tests).
    pub fn with_id(id: impl Into<String>, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker,
            text: text.into(),
        }
    }

    /// A line is blank when its text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Convert a backend line into a domain line with a fresh id.
    pub fn from_wire(wire: &WireScriptLine) -> Self {
        Self::new(Speaker::from_wire(&wire.speaker), wire.text.clone())
    }

    /// Convert to the backend representation, carrying the id along.
    pub fn to_wire(&self) -> WireScriptLine {
        WireScriptLine {
            id: Some(self.id.clone()),
            speaker: self.speaker.as_str().to_string(),
            text: self.text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence helpers
// ---------------------------------------------------------------------------

/// `true` when every line is blank (or the script is empty). Submissions
/// that would send an all-blank script are rejected before any network call.
pub fn all_blank(lines: &[ScriptLine]) -> bool {
    lines.iter().all(ScriptLine::is_blank)
}

/// `true` when at least one line — blank or not — belongs to the guest.
pub fn any_guest(lines: &[ScriptLine]) -> bool {
    lines.iter().any(|l| l.speaker == Speaker::Guest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
