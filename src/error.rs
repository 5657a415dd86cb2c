use thiserror::Error;

/// Failures reported by the guest record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no guest with id {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("guest store unavailable: {0}")]
    Unavailable(String),
}

/// Terminal error outcomes of an RSVP confirmation request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsvpError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid RSVP status: {0:?}")]
    InvalidStatus(String),

    /// Covers both an unknown guest and a failing data layer
    #[error("failed to update RSVP: {0}")]
    UpdateFailed(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl RsvpError {
    /// HTTP status the server answers with for this outcome
    pub fn http_status(&self) -> u16 {
        match self {
            RsvpError::MissingParameter(_) | RsvpError::InvalidStatus(_) => 400,
            RsvpError::UpdateFailed(_) | RsvpError::Unexpected(_) => 500,
        }
    }
}

impl From<StoreError> for RsvpError {
    fn from(err: StoreError) -> Self {
        RsvpError::UpdateFailed(err.to_string())
    }
}
