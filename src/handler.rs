// ✉️ RSVP Confirmation Handler
//
// validate -> one update -> outcome
//
// Shared by the HTTP server and the terminal confirmation page, so both
// adapters run the exact same state machine.

use crate::db::GuestStore;
use crate::error::RsvpError;
use crate::status::RsvpStatus;
use serde::Deserialize;
use tracing::{error, info, warn};

/// Query parameters carried by a confirmation link
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RsvpRequest {
    #[serde(rename = "guestId")]
    pub guest_id: Option<String>,

    pub status: Option<String>,
}

/// Applied status on success, or the error kind the presenter renders
pub type Outcome = Result<RsvpStatus, RsvpError>;

impl RsvpRequest {
    pub fn new(guest_id: &str, status: &str) -> Self {
        Self {
            guest_id: Some(guest_id.to_string()),
            status: Some(status.to_string()),
        }
    }

    /// Steps 1 and 2: presence, then the status literal.
    /// Empty values count as absent.
    pub fn validate(&self) -> Result<(&str, RsvpStatus), RsvpError> {
        let guest_id = present(&self.guest_id).ok_or(RsvpError::MissingParameter("guestId"))?;
        let raw_status = present(&self.status).ok_or(RsvpError::MissingParameter("status"))?;

        let status = RsvpStatus::parse_requested(raw_status)
            .ok_or_else(|| RsvpError::InvalidStatus(raw_status.to_string()))?;

        Ok((guest_id, status))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate the request and apply at most one status write.
///
/// Nothing is retried. A guest that doesn't exist and a store that failed
/// both come back as [`RsvpError::UpdateFailed`].
pub fn confirm_rsvp<S>(store: &S, request: &RsvpRequest) -> Outcome
where
    S: GuestStore + ?Sized,
{
    let (guest_id, status) = match request.validate() {
        Ok(valid) => valid,
        Err(err) => {
            warn!(?request, error = %err, "rejected rsvp link");
            return Err(err);
        }
    };

    info!(guest_id, status = %status, "updating rsvp status");

    match store.set_rsvp_status(guest_id, status) {
        Ok(()) => Ok(status),
        Err(err) => {
            error!(guest_id, error = %err, "rsvp update failed");
            Err(err.into())
        }
    }
}
