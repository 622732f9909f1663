//! Outbound quote submission: payload, transport seam and errors.

mod payload;
mod transport;

use thiserror::Error;

use crate::wizard::ValidationError;

pub use payload::SubmissionPayload;
pub use transport::{SubmissionTransport, TransportError};

/// Where a wizard is in the submission flow.
///
/// A settled submission, successful or not, returns the wizard to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("a submission is already in flight")]
    InFlight,

    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),
}
