//! Submission flow: `Idle → Submitting → Idle`, gated on the final step.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::submission::{
    SubmissionPayload, SubmissionPhase, SubmissionTransport, SubmitError, TransportError,
};

use super::controller::Wizard;

impl Wizard {
    pub fn phase(&self) -> SubmissionPhase {
        if self.submitting {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        }
    }

    /// Validates the final step and enters `Submitting`.
    ///
    /// Returns the payload to hand to a transport. Fails with
    /// [`SubmitError::InFlight`] while another submission is pending and
    /// with [`SubmitError::Invalid`] when the final step is incomplete; in
    /// both cases nothing changes.
    pub fn begin_submission(
        &mut self,
        timestamp: DateTime<Utc>,
    ) -> Result<SubmissionPayload, SubmitError> {
        if self.submitting {
            return Err(SubmitError::InFlight);
        }
        self.check_step(self.state.step_count())?;

        self.submitting = true;
        Ok(SubmissionPayload::new(
            self.state.answers(),
            &self.personal,
            self.preferences,
            timestamp,
            self.estimate.clone(),
        ))
    }

    /// Settles a pending submission with the transport's result.
    ///
    /// Success deletes the draft and resets the wizard. Failure keeps every
    /// input so the user can submit again.
    pub async fn finish_submission(
        &mut self,
        outcome: Result<(), TransportError>,
    ) -> Result<(), SubmitError> {
        self.submitting = false;

        match outcome {
            Ok(()) => {
                info!("quote request submitted");
                if let Err(error) = self.reset().await {
                    warn!(%error, "submitted, but the draft could not be cleared");
                }
                Ok(())
            }
            Err(error) => {
                warn!(%error, "quote request submission failed");
                Err(SubmitError::Transport(error))
            }
        }
    }

    /// Runs the whole flow against `transport`.
    ///
    /// Dropping the returned future while the transport is pending (a host
    /// timeout, a cancelled task) puts the wizard back to `Idle` with its
    /// input intact.
    pub async fn submit(
        &mut self,
        transport: &dyn SubmissionTransport,
    ) -> Result<(), SubmitError> {
        let payload = self.begin_submission(Utc::now())?;
        let outcome = {
            let _pending = PendingSend(&mut self.submitting);
            transport.send(&payload).await
        };
        self.finish_submission(outcome).await
    }
}

/// Lowers the in-flight flag when the send ends, however it ends.
struct PendingSend<'a>(&'a mut bool);

impl Drop for PendingSend<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
