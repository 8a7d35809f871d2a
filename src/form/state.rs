//! Editing session states

use std::fmt;

/// Where an editing session is in its lifecycle
///
/// ```text
/// Loading ──load──▶ Clean ──edit/preset──▶ Dirty ──submit──▶ Saving
///                     ▲                      ▲                  │
///                     └──────── success ─────┼──────────────────┤
///                                            └───── failure ────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormState {
    /// No working copy yet
    Loading,
    /// Working copy mirrors the last loaded or saved state
    Clean,
    /// At least one field changed since load/save
    Dirty,
    /// Update call in flight
    Saving,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormState::Loading => "loading",
            FormState::Clean => "clean",
            FormState::Dirty => "dirty",
            FormState::Saving => "saving",
        }
    }

    /// Whether the working copy holds unsaved edits
    pub fn has_unsaved_edits(&self) -> bool {
        matches!(self, FormState::Dirty | FormState::Saving)
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a successful submit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to save; no update call was made
    Skipped,
    /// Working copy persisted
    Saved,
}

impl SubmitOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitOutcome::Skipped => "skipped",
            SubmitOutcome::Saved => "saved",
        }
    }
}
