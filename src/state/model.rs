use serde::Serialize;

/// Where an editing session is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Editing,
    Committing,
    Cancelling,
    Deleting,
    Closed,
}

impl SessionPhase {
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Editing)
    }
}
