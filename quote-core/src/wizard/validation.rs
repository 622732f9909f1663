//! Configurable validation of the personal information step.
//!
//! Required fields and the email/phone patterns differ between deployments,
//! so they live in [`ValidationRules`] and are compiled once into a
//! [`Validator`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PersonalField, PersonalFields};

/// Email shape accepted by the quote form: something, `@`, something, a dot.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// French landline/mobile numbers, with optional `+33`/`0033` prefix.
pub const FRENCH_PHONE_PATTERN: &str = r"^(?:(?:\+|00)33|0)\s*[1-9](?:[\s.-]*\d{2}){4}$";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please choose a value for '{0}'")]
    MissingAnswer(String),

    #[error("{} is required", .0.label())]
    MissingField(PersonalField),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),

    #[error("invalid {name} pattern: {reason}")]
    InvalidPattern { name: &'static str, reason: String },

    #[error("step {step} does not exist (the wizard has {count} steps)")]
    UnknownStep { step: usize, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Fields that must be non-blank before the personal step passes.
    pub required_personal: Vec<PersonalField>,
    pub email_pattern: String,
    /// Checked only when a phone number is entered. `None` or an empty
    /// pattern accepts any.
    pub phone_pattern: Option<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_personal: vec![
                PersonalField::FirstName,
                PersonalField::LastName,
                PersonalField::Email,
                PersonalField::Message,
            ],
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            phone_pattern: Some(FRENCH_PHONE_PATTERN.to_string()),
        }
    }
}

impl ValidationRules {
    pub fn compile(&self) -> Result<Validator, ValidationError> {
        let email = compile_pattern("email", &self.email_pattern)?;
        let phone = self
            .phone_pattern
            .as_deref()
            .filter(|pattern| !pattern.is_empty())
            .map(|pattern| compile_pattern("phone", pattern))
            .transpose()?;

        Ok(Validator {
            required: self.required_personal.clone(),
            email,
            phone,
        })
    }
}

fn compile_pattern(
    name: &'static str,
    pattern: &str,
) -> Result<Regex, ValidationError> {
    Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
        name,
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct Validator {
    required: Vec<PersonalField>,
    email: Regex,
    phone: Option<Regex>,
}

impl Validator {
    pub fn required_fields(&self) -> &[PersonalField] {
        &self.required
    }

    /// Checks the whole personal information block.
    ///
    /// Required fields are checked in configured order, then the email
    /// format. The phone pattern is a field-level check only; see
    /// [`Validator::validate_field`].
    pub fn validate_personal(
        &self,
        fields: &PersonalFields,
    ) -> Result<(), ValidationError> {
        if let Some(missing) = self
            .required
            .iter()
            .find(|field| fields.get(**field).trim().is_empty())
        {
            return Err(ValidationError::MissingField(*missing));
        }

        self.validate_field(PersonalField::Email, fields.get(PersonalField::Email))
    }

    /// Checks one field as the user leaves it. Blank values pass; whether
    /// a field is required is decided by [`Validator::validate_personal`].
    pub fn validate_field(
        &self,
        field: PersonalField,
        value: &str,
    ) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }

        match field {
            PersonalField::Email if !self.email.is_match(value) => {
                Err(ValidationError::InvalidEmail(value.to_string()))
            }
            PersonalField::Phone => match &self.phone {
                Some(pattern) if !pattern.is_match(value) => {
                    Err(ValidationError::InvalidPhone(value.to_string()))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
