//! Whole-form walkthroughs against the public API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use quote_core::store::{DraftStore, MemoryDraftStore, StoreError};
use quote_core::wizard::ValidationRules;
use quote_core::{
    BUDGET, DRAFT_KEY, DraftLoad, PROJECT_TYPE, PersonalField, RateTable, SubmissionPayload,
    SubmissionTransport, SubmitError, TIMELINE, TransportError, Wizard, WizardConfig,
};

/// Memory store whose contents outlive the wizard that owns it.
#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<Option<String>>>);

#[async_trait]
impl DraftStore for SharedStore {
    async fn read(
        &self,
        _key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn write(
        &self,
        _key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        *self.0.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    async fn remove(
        &self,
        _key: &str,
    ) -> Result<(), StoreError> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

struct AcceptAll;

#[async_trait]
impl SubmissionTransport for AcceptAll {
    async fn send(
        &self,
        _payload: &SubmissionPayload,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

fn wizard(store: impl DraftStore + 'static) -> Wizard {
    Wizard::new(
        WizardConfig::default(),
        ValidationRules::default().compile().unwrap(),
        Arc::new(RateTable::default()),
        Box::new(store),
    )
}

#[tokio::test]
async fn test_draft_resumes_in_a_new_wizard() {
    let store = SharedStore::default();

    let mut first = wizard(store.clone());
    first.record_answer(PROJECT_TYPE, "app-web");
    first.advance().unwrap();
    first.record_answer(BUDGET, "5k+");
    first.advance().unwrap();
    first.record_answer(TIMELINE, "flexible");
    assert!(first.autosave().await.unwrap());

    let mut second = wizard(store.clone());
    assert_eq!(
        second.load_draft().await.unwrap(),
        DraftLoad::Restored { step: 3 }
    );
    assert_eq!(second.answers(), first.answers());
    assert_eq!(second.estimate().map(|e| e.price), Some(3150));
}

#[tokio::test]
async fn test_complete_walkthrough_clears_the_draft() {
    let store = SharedStore::default();
    let mut wizard = wizard(store.clone());

    for (field, value) in [(PROJECT_TYPE, "consulting"), (BUDGET, "<1k"), (TIMELINE, "flexible")] {
        wizard.record_answer(field, value);
        wizard.advance().unwrap();
    }
    let estimate = wizard.estimate().cloned().unwrap();
    assert_eq!(estimate.price, 85);
    assert!(estimate.is_hourly);
    assert_eq!(estimate.display_price(), "85€/hour");

    wizard.save_draft().await.unwrap();
    assert!(store.0.lock().unwrap().is_some());

    assert!(matches!(
        wizard.submit(&AcceptAll).await,
        Err(SubmitError::Invalid(_))
    ));
    assert_eq!(wizard.current_step(), 4);

    wizard.set_personal(PersonalField::FirstName, "Grace");
    wizard.set_personal(PersonalField::LastName, "Hopper");
    wizard.set_personal(PersonalField::Email, "grace@example.org");
    wizard.set_personal(PersonalField::Message, "Compiler consulting");
    wizard.submit(&AcceptAll).await.unwrap();

    assert_eq!(wizard.current_step(), 1);
    assert!(store.0.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_draft_in_memory_store_is_dropped() {
    let mut wizard = wizard(MemoryDraftStore::with_entry(DRAFT_KEY, "[1, 2"));

    assert_eq!(wizard.load_draft().await.unwrap(), DraftLoad::Discarded);
    assert_eq!(wizard.current_step(), 1);
    assert!(wizard.answers().is_empty());
}
