use crate::{Error, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ImageLoaded,
    Classifying,
    Resulted,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ImageUploaded,
    ClassifyRequested,
    ClassificationSucceeded,
    ClassificationFailed,
    Cleared,
}

/// Per-session page state. There is no terminal state: the user can always
/// upload again or clear.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    state: SessionState,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, event: SessionEvent) -> Result<()> {
        let old_state = self.state;
        debug!("Session FSM processing {:?} in state {:?}", event, old_state);

        let new_state = match (self.state, event) {
            (_, SessionEvent::ImageUploaded) => SessionState::ImageLoaded,
            (_, SessionEvent::Cleared) => SessionState::Idle,
            (
                SessionState::ImageLoaded | SessionState::Resulted | SessionState::Errored,
                SessionEvent::ClassifyRequested,
            ) => SessionState::Classifying,
            (SessionState::Classifying, SessionEvent::ClassificationSucceeded) => {
                SessionState::Resulted
            }
            (SessionState::Classifying, SessionEvent::ClassificationFailed) => {
                SessionState::Errored
            }
            _ => {
                warn!(
                    "Invalid session transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        if old_state != new_state {
            info!(
                "Session state transition: {:?} -> {:?} (event: {:?})",
                old_state, new_state, event
            );
        }

        self.state = new_state;
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Classifying
    }

    pub fn has_image(&self) -> bool {
        !matches!(self.state, SessionState::Idle)
    }
}
