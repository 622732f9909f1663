use std::collections::BTreeMap;

/// Choices recorded by the wizard, keyed by field name.
pub type Answers = BTreeMap<String, String>;

/// Service identifier chosen on the first step.
pub const PROJECT_TYPE: &str = "projectType";

/// Budget bracket chosen on the second step.
pub const BUDGET: &str = "budget";

/// Timeline choice (`urgent`, `flexible`, or anything else for standard).
pub const TIMELINE: &str = "timeline";

/// Fields whose changes trigger an estimate refresh.
pub const PRICING_FIELDS: [&str; 3] = [PROJECT_TYPE, BUDGET, TIMELINE];
