pub mod fsm;
mod store;

pub use fsm::{SessionEvent, SessionState, SessionStateMachine};
pub use store::SessionStore;

use crate::{
    ClassifyError, IntakeError, Result, classifier::ClassificationResult, intake::UploadedImage,
};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

/// What the diagnosis panel shows after the last trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoImage,
    Classified(ClassificationResult),
    Failed(ClassifyError),
}

/// Result of pressing the classify button.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Nothing uploaded; the "no image" warning is recorded, no call is made.
    NoImage,
    /// A classification is already in flight for this session.
    Busy,
    /// Caller must classify this image and report back with `attempt`.
    Start { attempt: u64, image: UploadedImage },
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    machine: SessionStateMachine,
    image: Option<UploadedImage>,
    outcome: Option<Outcome>,
    upload_error: Option<IntakeError>,
    /// Bumped on every trigger, upload and clear; only the current attempt may finish.
    attempt: u64,
    classified_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            machine: SessionStateMachine::new(),
            image: None,
            outcome: None,
            upload_error: None,
            attempt: 0,
            classified_at: None,
            updated_at: Utc::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.current_state()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn upload_error(&self) -> Option<&IntakeError> {
        self.upload_error.as_ref()
    }

    pub fn classified_at(&self) -> Option<DateTime<Utc>> {
        self.classified_at
    }

    /// Replaces the held image and forgets the previous outcome.
    pub fn load_image(&mut self, image: UploadedImage) -> Result<()> {
        self.machine.transition(SessionEvent::ImageUploaded)?;
        debug!("Session {} now holds {}", self.id, image.filename);
        self.attempt += 1;
        self.image = Some(image);
        self.outcome = None;
        self.upload_error = None;
        self.classified_at = None;
        self.touch();
        Ok(())
    }

    /// Records a rejected upload. The previously held image stays.
    pub fn reject_upload(&mut self, error: IntakeError) {
        self.upload_error = Some(error);
        self.touch();
    }

    pub fn begin_classification(&mut self) -> Result<Trigger> {
        self.touch();
        self.upload_error = None;

        if self.machine.is_busy() {
            return Ok(Trigger::Busy);
        }
        let Some(image) = self.image.clone() else {
            self.outcome = Some(Outcome::NoImage);
            return Ok(Trigger::NoImage);
        };

        self.machine.transition(SessionEvent::ClassifyRequested)?;
        self.attempt += 1;
        self.outcome = None;
        Ok(Trigger::Start {
            attempt: self.attempt,
            image,
        })
    }

    /// Stores the outcome of a call started by [`Session::begin_classification`].
    /// Dropped if the session moved on (new upload, clear or a newer trigger)
    /// while it ran.
    pub fn finish_classification(
        &mut self,
        attempt: u64,
        result: std::result::Result<ClassificationResult, ClassifyError>,
    ) -> Result<()> {
        if !self.machine.is_busy() || attempt != self.attempt {
            debug!(
                "Discarding stale classification #{} for session {} (current #{}, state {:?})",
                attempt,
                self.id,
                self.attempt,
                self.state()
            );
            return Ok(());
        }

        match result {
            Ok(result) => {
                self.machine
                    .transition(SessionEvent::ClassificationSucceeded)?;
                self.outcome = Some(Outcome::Classified(result));
            }
            Err(error) => {
                self.machine.transition(SessionEvent::ClassificationFailed)?;
                self.outcome = Some(Outcome::Failed(error));
            }
        }
        self.classified_at = Some(Utc::now());
        self.touch();
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.machine.transition(SessionEvent::Cleared)?;
        self.attempt += 1;
        self.image = None;
        self.outcome = None;
        self.upload_error = None;
        self.classified_at = None;
        self.touch();
        Ok(())
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.updated_at > ttl
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
