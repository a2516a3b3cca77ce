//! Script domain types — speakers, dialogue lines and sequence helpers.

pub mod line;

pub use line::{all_blank, any_guest, ScriptLine, Speaker};
