use super::error::{StateError, StateResult};
use super::event::StateTransition;
use super::{SessionEvent, SessionPhase};

#[derive(Debug)]
pub struct SessionMachine {
    phase: SessionPhase,
    transition_history: Vec<StateTransition>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn next_phase(&self, event: SessionEvent) -> Option<SessionPhase> {
        use SessionEvent::*;
        match (self.phase, event) {
            (SessionPhase::Idle | SessionPhase::Closed, Open) => Some(SessionPhase::Editing),
            (SessionPhase::Editing, Open) => Some(SessionPhase::Editing),
            (SessionPhase::Editing, Commit) => Some(SessionPhase::Committing),
            (SessionPhase::Editing, Cancel) => Some(SessionPhase::Cancelling),
            (SessionPhase::Editing, Delete) => Some(SessionPhase::Deleting),
            (SessionPhase::Editing, Dismiss) => Some(SessionPhase::Closed),
            (
                SessionPhase::Committing | SessionPhase::Cancelling | SessionPhase::Deleting,
                Finish,
            ) => Some(SessionPhase::Closed),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> StateResult<SessionPhase> {
        tracing::debug!(from = ?self.phase, event = ?event, "request session transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::warn!(from = ?from, event = ?event, "invalid session transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        // A fresh session starts a fresh history.
        if !self.phase.is_editing() && next.is_editing() {
            self.transition_history.clear();
        }

        let record = StateTransition::new(Some(self.phase), event, next);
        self.phase = next;
        self.transition_history.push(record);

        Ok(self.phase)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionPhase::{:?}", self.phase)
    }
}
