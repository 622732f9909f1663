pub mod calculations;
pub mod models;
pub mod store;
pub mod submission;
pub mod wizard;

pub use calculations::{Estimator, TimelineChoice};
pub use models::*;
pub use store::{DraftStore, StoreError};
pub use submission::{SubmissionPayload, SubmissionTransport, SubmitError, TransportError};
pub use wizard::{DraftError, DraftLoad, Wizard, WizardConfig, WizardState};
