//! Draft save/restore for [`Wizard`] through its [`DraftStore`].
//!
//! [`DraftStore`]: crate::store::DraftStore

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{DRAFT_KEY, Draft, is_reserved_answer_key};
use crate::store::StoreError;

use super::controller::Wizard;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What [`Wizard::load_draft`] found in the draft slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftLoad {
    /// No draft was stored.
    Empty,
    /// A draft was restored; the wizard is now on `step`.
    Restored { step: usize },
    /// The stored draft could not be parsed and was deleted.
    Discarded,
}

impl Wizard {
    /// Snapshot of the answers, step and personal fields.
    pub fn draft(&self) -> Draft {
        let answers = self
            .state
            .answers()
            .iter()
            .filter(|(field, _)| !is_reserved_answer_key(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Draft {
            answers,
            current_step: self.state.current_step(),
            personal_fields: self.personal.clone(),
        }
    }

    /// Writes the current snapshot to the draft slot, replacing any
    /// previous draft.
    pub async fn save_draft(&self) -> Result<(), DraftError> {
        let encoded = serde_json::to_string(&self.draft())?;
        self.store.write(DRAFT_KEY, &encoded).await?;
        info!(step = self.state.current_step(), "draft saved");
        Ok(())
    }

    /// Saves a draft unless the wizard is still untouched. Returns whether
    /// anything was written.
    pub async fn autosave(&self) -> Result<bool, DraftError> {
        if self.state.is_pristine() {
            debug!("autosave skipped, nothing to save");
            return Ok(false);
        }
        self.save_draft().await?;
        Ok(true)
    }

    /// Restores the stored draft, if any.
    ///
    /// A draft that fails to parse is deleted and the wizard starts empty.
    /// Only storage failures are returned as errors; the in-memory state is
    /// never left half-restored.
    pub async fn load_draft(&mut self) -> Result<DraftLoad, DraftError> {
        let Some(raw) = self.store.read(DRAFT_KEY).await? else {
            debug!("no draft stored");
            return Ok(DraftLoad::Empty);
        };

        match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) => {
                let step = self.restore(draft);
                info!(step, "draft restored");
                Ok(DraftLoad::Restored { step })
            }
            Err(error) => {
                warn!(%error, "discarding unreadable draft");
                self.clear_form();
                if let Err(error) = self.store.remove(DRAFT_KEY).await {
                    warn!(%error, "could not delete unreadable draft");
                }
                Ok(DraftLoad::Discarded)
            }
        }
    }

    /// Deletes the stored draft.
    pub async fn clear_draft(&self) -> Result<(), DraftError> {
        self.store.remove(DRAFT_KEY).await?;
        debug!("draft cleared");
        Ok(())
    }

    /// Returns to step 1 with no input and deletes the stored draft.
    ///
    /// The in-memory reset happens even when the store fails.
    pub async fn reset(&mut self) -> Result<(), DraftError> {
        self.clear_form();
        self.clear_draft().await
    }

    fn restore(
        &mut self,
        draft: Draft,
    ) -> usize {
        self.clear_form();
        *self.state.answers_mut() = draft.answers;
        self.personal = draft.personal_fields;
        let step = self.state.go_to(draft.current_step);
        self.refresh_estimate();
        step
    }
}
