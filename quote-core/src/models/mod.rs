mod answers;
mod draft;
mod estimate;
mod personal;
mod service_rate;

pub use answers::{Answers, BUDGET, PRICING_FIELDS, PROJECT_TYPE, TIMELINE};
pub use draft::{DRAFT_KEY, Draft, RESERVED_DRAFT_KEYS, is_reserved_answer_key};
pub use estimate::Estimate;
pub use personal::{ContactPreference, ContactPreferences, PersonalField, PersonalFields};
pub use service_rate::{DEFAULT_EXPRESS_LABEL, DEFAULT_FLEXIBLE_LABEL, RateTable, ServiceRate};
