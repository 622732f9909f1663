use std::sync::Arc;

use tracing::{debug, warn};

use crate::calculations::Estimator;
use crate::models::{
    Answers, BUDGET, ContactPreference, ContactPreferences, Estimate, PRICING_FIELDS,
    PROJECT_TYPE, PersonalField, PersonalFields, RateTable, TIMELINE, is_reserved_answer_key,
};
use crate::store::DraftStore;

use super::state::{StepRequirement, WizardConfig, WizardState};
use super::validation::{ValidationError, Validator};

/// Multi-step quote request form.
///
/// Owns the wizard state, the personal details entered on the last step and
/// the derived estimate. A UI layer drives it through the command methods
/// (`record_answer`, `advance`, `retreat`, `submit`, ...); draft persistence
/// and submission live in the sibling `draft` and `submit` modules.
pub struct Wizard {
    pub(super) config: WizardConfig,
    pub(super) validator: Validator,
    pub(super) rates: Arc<RateTable>,
    pub(super) store: Box<dyn DraftStore>,
    pub(super) state: WizardState,
    pub(super) personal: PersonalFields,
    pub(super) preferences: ContactPreferences,
    pub(super) estimate: Option<Estimate>,
    pub(super) submitting: bool,
}

impl Wizard {
    pub fn new(
        config: WizardConfig,
        validator: Validator,
        rates: Arc<RateTable>,
        store: Box<dyn DraftStore>,
    ) -> Self {
        let state = WizardState::new(config.step_count());
        Self {
            config,
            validator,
            rates,
            store,
            state,
            personal: PersonalFields::default(),
            preferences: ContactPreferences::default(),
            estimate: None,
            submitting: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn step_count(&self) -> usize {
        self.state.step_count()
    }

    pub fn answers(&self) -> &Answers {
        self.state.answers()
    }

    pub fn personal(&self) -> &PersonalFields {
        &self.personal
    }

    pub fn preferences(&self) -> ContactPreferences {
        self.preferences
    }

    /// Current estimate, or `None` while a pricing answer is missing or the
    /// chosen service is unknown.
    pub fn estimate(&self) -> Option<&Estimate> {
        self.estimate.as_ref()
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// Contact fields the personal information step insists on.
    pub fn required_fields(&self) -> &[PersonalField] {
        self.validator.required_fields()
    }

    /// Requirement of the step the wizard is on.
    pub fn current_requirement(&self) -> Option<&StepRequirement> {
        self.config.requirement(self.state.current_step())
    }

    // ── commands ─────────────────────────────────────────────────────────

    /// Stores `value` under `field`. A blank value clears the answer.
    ///
    /// Returns `false`, changing nothing, when `field` collides with a key
    /// of the draft record (`currentStep`, `personalFields`).
    pub fn record_answer(
        &mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let field = field.into();
        let value = value.into();

        if is_reserved_answer_key(&field) {
            warn!(field = %field, "answer name is reserved by the draft record");
            return false;
        }

        if value.trim().is_empty() {
            self.state.answers_mut().remove(&field);
        } else {
            self.state.answers_mut().insert(field.clone(), value);
        }
        debug!(field = %field, "answer recorded");

        if PRICING_FIELDS.contains(&field.as_str()) {
            self.refresh_estimate();
        }
        true
    }

    pub fn set_personal(
        &mut self,
        field: PersonalField,
        value: impl Into<String>,
    ) {
        self.personal.set(field, value);
    }

    pub fn set_preference(
        &mut self,
        preference: ContactPreference,
        enabled: bool,
    ) {
        self.preferences.set(preference, enabled);
    }

    /// Field-level check of one personal field's current value.
    pub fn validate_field(
        &self,
        field: PersonalField,
    ) -> Result<(), ValidationError> {
        self.validator.validate_field(field, self.personal.get(field))
    }

    /// Why `step` cannot be left yet, if anything.
    pub fn check_step(
        &self,
        step: usize,
    ) -> Result<(), ValidationError> {
        match self.config.requirement(step) {
            Some(StepRequirement::Answer { field }) => {
                if self.state.answers().contains_key(field) {
                    Ok(())
                } else {
                    Err(ValidationError::MissingAnswer(field.clone()))
                }
            }
            Some(StepRequirement::PersonalInfo) => self.validator.validate_personal(&self.personal),
            // A wizard configured with no steps has a single step that is
            // always complete.
            None if self.config.steps.is_empty() && step == 1 => Ok(()),
            None => Err(ValidationError::UnknownStep {
                step,
                count: self.state.step_count(),
            }),
        }
    }

    pub fn can_advance(
        &self,
        step: usize,
    ) -> bool {
        self.check_step(step).is_ok()
    }

    /// Moves to the next step if the current one is complete.
    ///
    /// On error nothing changes. On the last step a successful check leaves
    /// the wizard where it is.
    pub fn advance(&mut self) -> Result<usize, ValidationError> {
        let from = self.state.current_step();
        self.check_step(from)?;
        let to = self.state.step_forward();
        debug!(from, to, "advanced");
        Ok(to)
    }

    /// Moves to the previous step, staying on step 1.
    pub fn retreat(&mut self) -> usize {
        let from = self.state.current_step();
        let to = self.state.step_back();
        debug!(from, to, "retreated");
        to
    }

    /// Drops all input and returns to step 1. Does not touch storage;
    /// see [`Wizard::reset`].
    pub(super) fn clear_form(&mut self) {
        self.state.clear();
        self.personal = PersonalFields::default();
        self.preferences = ContactPreferences::default();
        self.estimate = None;
    }

    pub(super) fn refresh_estimate(&mut self) {
        let answers = self.state.answers();
        self.estimate = match (
            answers.get(PROJECT_TYPE),
            answers.get(BUDGET),
            answers.get(TIMELINE),
        ) {
            (Some(service), Some(_), Some(timeline)) => {
                Estimator::new(&self.rates).estimate(service, timeline)
            }
            _ => None,
        };
        debug!(estimate = ?self.estimate, "estimate refreshed");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryDraftStore;
    use crate::wizard::validation::ValidationRules;

    fn wizard() -> Wizard {
        Wizard::new(
            WizardConfig::default(),
            ValidationRules::default().compile().unwrap(),
            Arc::new(RateTable::default()),
            Box::new(MemoryDraftStore::new()),
        )
    }

    fn fill_personal(wizard: &mut Wizard) {
        wizard.set_personal(PersonalField::FirstName, "Ada");
        wizard.set_personal(PersonalField::LastName, "Lovelace");
        wizard.set_personal(PersonalField::Email, "ada@example.org");
        wizard.set_personal(PersonalField::Message, "Need a site");
    }

    #[test]
    fn starts_on_first_step_with_nothing_answered() {
        let wizard = wizard();

        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.step_count(), 4);
        assert!(wizard.answers().is_empty());
        assert!(wizard.estimate().is_none());
    }

    #[test]
    fn advance_without_answer_is_a_no_op() {
        let mut wizard = wizard();

        let result = wizard.advance();

        assert_eq!(result, Err(ValidationError::MissingAnswer(PROJECT_TYPE.to_string())));
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn each_answer_step_gates_on_its_own_field() {
        let mut wizard = wizard();

        for (step, field) in [(1, PROJECT_TYPE), (2, BUDGET), (3, TIMELINE)] {
            assert_eq!(wizard.current_step(), step);
            assert!(!wizard.can_advance(step));
            assert!(wizard.advance().is_err());
            assert_eq!(wizard.current_step(), step);

            wizard.record_answer(field, "x");
            assert!(wizard.can_advance(step));
            assert_eq!(wizard.advance(), Ok(step + 1));
        }
    }

    #[test]
    fn answer_for_other_step_does_not_unlock_current() {
        let mut wizard = wizard();
        wizard.record_answer(BUDGET, "5k");

        assert!(!wizard.can_advance(1));
        assert!(wizard.can_advance(2));
    }

    #[test]
    fn blank_answer_clears_previous_choice() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "design");
        wizard.record_answer(PROJECT_TYPE, "  ");

        assert!(!wizard.answers().contains_key(PROJECT_TYPE));
        assert!(!wizard.can_advance(1));
    }

    #[test]
    fn last_step_requires_valid_personal_info() {
        let mut wizard = wizard();
        assert!(!wizard.can_advance(4));

        fill_personal(&mut wizard);
        assert!(wizard.can_advance(4));

        wizard.set_personal(PersonalField::Email, "not-an-email");
        assert_eq!(
            wizard.check_step(4),
            Err(ValidationError::InvalidEmail("not-an-email".to_string()))
        );
    }

    #[test]
    fn advance_on_last_step_stays_capped() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "design");
        wizard.record_answer(BUDGET, "5k");
        wizard.record_answer(TIMELINE, "normal");
        fill_personal(&mut wizard);
        for _ in 0..3 {
            wizard.advance().unwrap();
        }

        assert_eq!(wizard.advance(), Ok(4));
        assert_eq!(wizard.current_step(), 4);
    }

    #[test]
    fn retreat_floors_at_first_step() {
        let mut wizard = wizard();

        assert_eq!(wizard.retreat(), 1);
    }

    #[test]
    fn retreat_then_advance_keeps_answers() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "site-web");
        wizard.advance().unwrap();
        wizard.record_answer(BUDGET, "5k-10k");
        wizard.advance().unwrap();
        let before = wizard.answers().clone();

        wizard.retreat();
        wizard.advance().unwrap();

        assert_eq!(wizard.current_step(), 3);
        assert_eq!(wizard.answers(), &before);
    }

    #[test]
    fn unknown_step_is_reported() {
        let wizard = wizard();

        assert_eq!(
            wizard.check_step(7),
            Err(ValidationError::UnknownStep { step: 7, count: 4 })
        );
    }

    #[test]
    fn wizard_without_steps_never_blocks() {
        let mut wizard = Wizard::new(
            WizardConfig { steps: vec![] },
            ValidationRules::default().compile().unwrap(),
            Arc::new(RateTable::default()),
            Box::new(MemoryDraftStore::new()),
        );

        assert_eq!(wizard.advance(), Ok(1));
    }

    // ── estimate ─────────────────────────────────────────────────────────

    #[test]
    fn estimate_waits_for_all_pricing_answers() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "site-web");
        wizard.record_answer(TIMELINE, "urgent");
        assert!(wizard.estimate().is_none());

        wizard.record_answer(BUDGET, "1k-5k");

        let estimate = wizard.estimate().unwrap();
        assert_eq!(estimate.price, 1950);
        assert!(estimate.timeline_label.contains("Express"));
    }

    #[test]
    fn estimate_follows_timeline_changes() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "app-web");
        wizard.record_answer(BUDGET, "5k+");
        wizard.record_answer(TIMELINE, "urgent");
        assert_eq!(wizard.estimate().unwrap().price, 4550);

        wizard.record_answer(TIMELINE, "flexible");

        assert_eq!(wizard.estimate().unwrap().price, 3150);
    }

    #[test]
    fn unknown_service_clears_stale_estimate() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "design");
        wizard.record_answer(BUDGET, "1k");
        wizard.record_answer(TIMELINE, "normal");
        assert!(wizard.estimate().is_some());

        wizard.record_answer(PROJECT_TYPE, "logo");

        assert!(wizard.estimate().is_none());
    }

    #[test]
    fn non_pricing_answer_keeps_estimate() {
        let mut wizard = wizard();
        wizard.record_answer(PROJECT_TYPE, "design");
        wizard.record_answer(BUDGET, "1k");
        wizard.record_answer(TIMELINE, "normal");

        wizard.record_answer("referral", "friend");

        assert_eq!(wizard.estimate().unwrap().price, 800);
    }

    // ── personal fields ──────────────────────────────────────────────────

    #[test]
    fn validate_field_checks_current_value() {
        let mut wizard = wizard();
        wizard.set_personal(PersonalField::Phone, "12");

        assert_eq!(
            wizard.validate_field(PersonalField::Phone),
            Err(ValidationError::InvalidPhone("12".to_string()))
        );

        wizard.set_personal(PersonalField::Phone, "06 12 34 56 78");
        assert_eq!(wizard.validate_field(PersonalField::Phone), Ok(()));
    }

    #[test]
    fn preferences_are_recorded() {
        let mut wizard = wizard();
        wizard.set_preference(ContactPreference::Newsletter, true);

        assert!(wizard.preferences().newsletter);
        assert!(!wizard.preferences().urgent_contact);
    }
}
