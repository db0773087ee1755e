//! Submission Pipeline: Idle → Submitting → settled → Idle.
//!
//! `begin` snapshots the draft and hands back a ticket; the ticket owns the
//! serialized payload, so the draft stays editable while the request is in
//! flight. `settle` reports the outcome and reopens the pipeline. An attempt
//! whose ticket is dropped unsent is closed with `abandon`.

pub mod client;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::draft::DraftRecord;
use crate::models::DoctorId;
use crate::notify::Notifier;

pub use client::{HttpProfileStore, ProfileStore, SubmitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// Terminal outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Success { attempt_id: Uuid, message: String },
    Failure { attempt_id: Uuid, message: String },
}

impl Settlement {
    pub fn attempt_id(&self) -> Uuid {
        match self {
            Settlement::Success { attempt_id, .. } | Settlement::Failure { attempt_id, .. } => {
                *attempt_id
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Settlement::Success { message, .. } | Settlement::Failure { message, .. } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Settlement::Success { .. })
    }

    pub(crate) fn from_error(attempt_id: Uuid, error: &SubmitError) -> Self {
        Settlement::Failure {
            attempt_id,
            message: error.user_message(),
        }
    }
}

/// An in-flight submission: target, immutable payload, attempt id.
///
/// Not `Clone`: `send` consumes the ticket, so one attempt issues at most one
/// request.
#[derive(Debug)]
pub struct SubmissionTicket {
    attempt_id: Uuid,
    target: DoctorId,
    payload: Value,
}

impl SubmissionTicket {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn target(&self) -> &DoctorId {
        &self.target
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Performs the single remote write. Never retries, never panics: every
    /// outcome comes back as a [`Settlement`].
    pub async fn send(self, store: &dyn ProfileStore) -> Settlement {
        match store.update_profile(&self.target, &self.payload).await {
            Ok(message) => {
                info!(attempt = %self.attempt_id, doctor = %self.target, "profile update accepted");
                Settlement::Success {
                    attempt_id: self.attempt_id,
                    message,
                }
            }
            Err(e) => {
                warn!(
                    attempt = %self.attempt_id,
                    doctor = %self.target,
                    "profile update failed: {e}"
                );
                Settlement::from_error(self.attempt_id, &e)
            }
        }
    }
}

#[derive(Debug)]
pub struct SubmissionPipeline {
    state: SubmissionState,
    in_flight: Option<Uuid>,
}

impl Default for SubmissionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionPipeline {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Attempt id of the outstanding submission, if any.
    pub fn in_flight(&self) -> Option<Uuid> {
        self.in_flight
    }

    /// Idle → Submitting. Refuses while another attempt is outstanding.
    pub fn begin(
        &mut self,
        target: &DoctorId,
        draft: &DraftRecord,
    ) -> Result<SubmissionTicket, SubmitError> {
        if let Some(attempt) = self.in_flight {
            warn!(attempt = %attempt, "submit ignored: previous attempt still in flight");
            return Err(SubmitError::AlreadySubmitting);
        }
        if target.is_blank() {
            return Err(SubmitError::MissingTarget);
        }

        let payload = serde_json::to_value(draft)?;
        let attempt_id = Uuid::new_v4();

        self.state = SubmissionState::Submitting;
        self.in_flight = Some(attempt_id);
        info!(attempt = %attempt_id, doctor = %target, "submitting profile update");

        Ok(SubmissionTicket {
            attempt_id,
            target: target.clone(),
            payload,
        })
    }

    /// Reports `settlement` to `notifier` and returns to Idle.
    ///
    /// A settlement for an attempt other than the one in flight is logged
    /// and dropped.
    pub fn settle(&mut self, settlement: &Settlement, notifier: &dyn Notifier) {
        if self.in_flight != Some(settlement.attempt_id()) {
            warn!(
                attempt = %settlement.attempt_id(),
                "ignoring settlement for an attempt that is not in flight"
            );
            return;
        }

        match settlement {
            Settlement::Success { message, .. } => notifier.success(message),
            Settlement::Failure { message, .. } => notifier.error(message),
        }

        self.in_flight = None;
        self.state = SubmissionState::Idle;
    }

    /// Closes attempt `attempt_id` without a result and returns to Idle.
    ///
    /// Used when the ticket was dropped or the send was cancelled before it
    /// settled. Nothing is notified. Returns false if that attempt is not the
    /// one in flight.
    pub fn abandon(&mut self, attempt_id: Uuid) -> bool {
        if self.in_flight != Some(attempt_id) {
            return false;
        }
        warn!(attempt = %attempt_id, "submission abandoned before it settled");
        self.in_flight = None;
        self.state = SubmissionState::Idle;
        true
    }
}
