use crate::error::{Result, SidekickError};

use super::types::{Session, SessionState};

impl SessionState {
    /// Valid transitions:
    /// - `Active` -> `Stopped`
    ///
    /// `Stopped` is terminal.
    pub fn can_transition_to(&self, new_state: &SessionState) -> bool {
        if self == new_state {
            return true;
        }

        match self {
            SessionState::Active => matches!(new_state, SessionState::Stopped),
            SessionState::Stopped => false,
        }
    }

    pub fn try_transition(&self, new_state: SessionState) -> Result<SessionState> {
        if self.can_transition_to(&new_state) {
            Ok(new_state)
        } else {
            Err(SidekickError::invalid(format!(
                "Invalid session state transition: {self} -> {new_state}"
            )))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Stopped)
    }
}

impl Session {
    /// Move the session to `Stopped`. Stopping twice is a no-op.
    pub fn stop(&mut self) {
        if let Ok(state) = self.state.try_transition(SessionState::Stopped) {
            self.state = state;
        }
    }
}
