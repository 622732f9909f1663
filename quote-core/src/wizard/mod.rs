//! The quote request wizard: step state, validation, draft persistence and
//! submission.

mod controller;
mod draft;
mod state;
mod submit;
pub mod validation;

pub use controller::Wizard;
pub use draft::{DraftError, DraftLoad};
pub use state::{StepRequirement, WizardConfig, WizardState};
pub use validation::{ValidationError, ValidationRules, Validator};
