use serde::{Deserialize, Serialize};

use crate::models::{Answers, BUDGET, PROJECT_TYPE, TIMELINE};

/// What a step needs before the wizard may move past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepRequirement {
    /// A non-empty answer under `field`.
    Answer { field: String },
    /// The required contact fields, with a well-formed email.
    PersonalInfo,
}

impl StepRequirement {
    pub fn answer(field: impl Into<String>) -> Self {
        Self::Answer {
            field: field.into(),
        }
    }
}

/// Ordered step requirements. The number of steps is `N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub steps: Vec<StepRequirement>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                StepRequirement::answer(PROJECT_TYPE),
                StepRequirement::answer(BUDGET),
                StepRequirement::answer(TIMELINE),
                StepRequirement::PersonalInfo,
            ],
        }
    }
}

impl WizardConfig {
    /// Number of steps; a wizard always has at least one.
    pub fn step_count(&self) -> usize {
        self.steps.len().max(1)
    }

    /// Requirement for a 1-based step number.
    pub fn requirement(
        &self,
        step: usize,
    ) -> Option<&StepRequirement> {
        step.checked_sub(1).and_then(|idx| self.steps.get(idx))
    }
}

/// Current position and answers of a wizard.
///
/// `current_step` always stays within `[1, step_count]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    step_count: usize,
    answers: Answers,
}

impl WizardState {
    pub fn new(step_count: usize) -> Self {
        Self {
            current_step: 1,
            step_count: step_count.max(1),
            answers: Answers::new(),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.step_count
    }

    /// True at step 1 with nothing answered; such a state is not worth a
    /// draft.
    pub fn is_pristine(&self) -> bool {
        self.current_step == 1 && self.answers.is_empty()
    }

    pub(crate) fn answers_mut(&mut self) -> &mut Answers {
        &mut self.answers
    }

    /// Moves to `step`, clamped into range. Returns the step actually set.
    pub(crate) fn go_to(
        &mut self,
        step: usize,
    ) -> usize {
        self.current_step = step.clamp(1, self.step_count);
        self.current_step
    }

    pub(crate) fn step_forward(&mut self) -> usize {
        self.go_to(self.current_step.saturating_add(1))
    }

    pub(crate) fn step_back(&mut self) -> usize {
        self.go_to(self.current_step.saturating_sub(1))
    }

    pub(crate) fn clear(&mut self) {
        self.current_step = 1;
        self.answers.clear();
    }
}
