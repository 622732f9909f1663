use serde::{Deserialize, Serialize};

/// One of the contact fields collected on the personal information step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    Message,
}

impl PersonalField {
    pub const ALL: [PersonalField; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Company,
        Self::Message,
    ];

    /// Key used in drafts and submission payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Company => "company",
            Self::Message => "message",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Company => "Company",
            Self::Message => "Message",
        }
    }

    /// Accepts the payload key in any case, with or without `-`/`_`
    /// separators (`firstName`, `first-name`, `FIRST_NAME`).
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "firstname" => Some(Self::FirstName),
            "lastname" => Some(Self::LastName),
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "company" => Some(Self::Company),
            "message" => Some(Self::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

impl PersonalFields {
    pub fn get(
        &self,
        field: PersonalField,
    ) -> &str {
        match field {
            PersonalField::FirstName => &self.first_name,
            PersonalField::LastName => &self.last_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Company => &self.company,
            PersonalField::Message => &self.message,
        }
    }

    pub fn set(
        &mut self,
        field: PersonalField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            PersonalField::FirstName => &mut self.first_name,
            PersonalField::LastName => &mut self.last_name,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::Company => &mut self.company,
            PersonalField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    /// True when every field is blank.
    pub fn is_empty(&self) -> bool {
        PersonalField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Copy with surrounding whitespace removed, as sent on submission.
    pub fn trimmed(&self) -> Self {
        let mut trimmed = Self::default();
        for field in PersonalField::ALL {
            trimmed.set(field, self.get(field).trim());
        }
        trimmed
    }
}

/// Opt-in checkboxes sent along with a submission. Not part of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPreferences {
    pub newsletter: bool,
    pub urgent_contact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPreference {
    Newsletter,
    UrgentContact,
}

impl ContactPreference {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "newsletter" => Some(Self::Newsletter),
            "urgent" | "urgentcontact" | "urgent-contact" => Some(Self::UrgentContact),
            _ => None,
        }
    }
}

impl ContactPreferences {
    pub fn set(
        &mut self,
        preference: ContactPreference,
        enabled: bool,
    ) {
        match preference {
            ContactPreference::Newsletter => self.newsletter = enabled,
            ContactPreference::UrgentContact => self.urgent_contact = enabled,
        }
    }
}
