use serde::Serialize;

use super::model::SessionPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Local state was (re)derived from the external value.
    Open,
    Commit,
    /// Outside click: commit, then close.
    Cancel,
    Delete,
    /// Callbacks for the finalizing phase have fired.
    Finish,
    /// The external value went away or the editor unmounted mid-edit.
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: Option<SessionPhase>,
    pub event: SessionEvent,
    pub to: SessionPhase,
}

impl StateTransition {
    pub const fn new(from: Option<SessionPhase>, event: SessionEvent, to: SessionPhase) -> Self {
        Self { from, event, to }
    }
}
