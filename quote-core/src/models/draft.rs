use serde::{Deserialize, Serialize};

use super::{Answers, PersonalFields};

/// Storage key of the single draft slot.
pub const DRAFT_KEY: &str = "advancedFormDraft";

/// Top-level draft keys owned by the record itself. Answers may not use
/// them or the draft would not parse back.
pub const RESERVED_DRAFT_KEYS: [&str; 2] = ["currentStep", "personalFields"];

pub fn is_reserved_answer_key(field: &str) -> bool {
    RESERVED_DRAFT_KEYS.contains(&field)
}

/// Snapshot of an unfinished quote request.
///
/// Serialized as one flat JSON object: the answers sit at the top level
/// next to `currentStep` and the nested `personalFields` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(flatten)]
    pub answers: Answers,
    #[serde(default = "first_step")]
    pub current_step: usize,
    #[serde(default)]
    pub personal_fields: PersonalFields,
}

fn first_step() -> usize {
    1
}
