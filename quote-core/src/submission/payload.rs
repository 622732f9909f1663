use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Answers, ContactPreferences, Estimate, PersonalField, PersonalFields};

/// Keys owned by the payload itself; answers with these names are dropped
/// so the JSON object never carries duplicate keys.
const RESERVED_KEYS: [&str; 4] = ["newsletter", "urgentContact", "timestamp", "estimate"];

/// JSON body sent on submission: answers, personal fields and preferences
/// merged into one object, plus a timestamp and the estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub answers: Answers,
    #[serde(flatten)]
    pub personal: PersonalFields,
    #[serde(flatten)]
    pub preferences: ContactPreferences,
    pub timestamp: DateTime<Utc>,
    pub estimate: Option<Estimate>,
}

impl SubmissionPayload {
    /// Builds the payload. Personal fields are trimmed and take precedence
    /// over answers of the same name.
    pub fn new(
        answers: &Answers,
        personal: &PersonalFields,
        preferences: ContactPreferences,
        timestamp: DateTime<Utc>,
        estimate: Option<Estimate>,
    ) -> Self {
        let answers = answers
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            answers,
            personal: personal.trimmed(),
            preferences,
            timestamp,
            estimate,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key) || PersonalField::ALL.iter().any(|field| field.as_str() == key)
}
