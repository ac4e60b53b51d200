//! End-to-end authoring flows driven through `AuthoringSession` against an
//! in-process gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use larder_core::authoring::session::AuthoringSession;
use larder_core::repository::gateway::RecipeGateway;
use larder_types::authoring::{AuthoringStep, Bucket};
use larder_types::catalog::{Catalog, CatalogItem};
use larder_types::error::{AuthoringError, GatewayOperation, PersistenceError};
use larder_types::recipe::{ContainerId, DraftPatch, RecipeDraft, RecipeId};

#[derive(Default)]
struct StoreGateway {
    docs: Mutex<HashMap<String, RecipeDraft>>,
    creates: Mutex<u32>,
}

impl RecipeGateway for StoreGateway {
    async fn create_draft(&self, payload: &RecipeDraft) -> Result<RecipeId, PersistenceError> {
        let mut creates = self.creates.lock().unwrap();
        *creates += 1;
        let id = format!("r{creates}");
        let mut doc = payload.clone();
        doc.draft_id = Some(RecipeId::new(&id));
        self.docs.lock().unwrap().insert(id.clone(), doc);
        Ok(RecipeId::new(id))
    }

    async fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> Result<RecipeId, PersistenceError> {
        let mut docs = self.docs.lock().unwrap();
        if !docs.contains_key(id.as_str()) {
            return Err(PersistenceError::new(GatewayOperation::UpdateDraft, "not found"));
        }
        docs.insert(id.as_str().to_string(), payload.clone());
        Ok(id.clone())
    }

    async fn fetch_draft(&self, id: &RecipeId) -> Result<RecipeDraft, PersistenceError> {
        self.docs
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| PersistenceError::new(GatewayOperation::FetchDraft, "not found"))
    }
}

fn onion() -> CatalogItem {
    CatalogItem::new("onion", "Onion")
}

fn basics() -> DraftPatch {
    DraftPatch {
        name: Some("Tomato Soup".to_string()),
        author: Some("Ana".to_string()),
        cuisine: Some("Italian".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn basic_flow_assigns_id_and_later_gates_name_missing_fields() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    session.update(basics()).unwrap();

    session.next().await.unwrap();
    assert_eq!(session.recipe_id(), Some(&RecipeId::new("r1")));
    assert_eq!(
        gateway.fetch_draft(&RecipeId::new("r1")).await.unwrap().name,
        "Tomato Soup"
    );

    let err = session.next().await.unwrap_err();
    let AuthoringError::Validation(v) = err else {
        panic!("expected a validation error");
    };
    assert!(v.names("containers"));
}

#[tokio::test]
async fn quantity_confirmation_then_duplicate_rejection() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    let pot = session.add_container("Pot").unwrap();
    assert_eq!(pot, ContainerId(1));

    session.begin_placement(onion(), Bucket::Container(pot)).unwrap();
    let err = session.confirm_placement("-5", Some("gm")).unwrap_err();
    assert!(matches!(err, AuthoringError::InvalidQuantity { .. }));
    assert!(session.pending().is_some());

    session.confirm_placement("50", Some("gm")).unwrap();
    let container = session.draft().container(pot).unwrap();
    assert_eq!(container.ingredients.len(), 1);
    assert_eq!(container.ingredients[0].id, "onion");
    assert_eq!(container.ingredients[0].quantity.value(), 50.0);

    let before = session.draft().clone();
    session.begin_placement(onion(), Bucket::Container(pot)).unwrap();
    let err = session.confirm_placement("30", Some("gm")).unwrap_err();
    assert!(matches!(err, AuthoringError::DuplicateIngredient { .. }));
    assert_eq!(session.draft(), &before);
}

#[tokio::test]
async fn move_is_all_or_nothing() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    let a = session.add_container("Bowl").unwrap();
    let b = session.add_container("Pot").unwrap();
    for bucket in [Bucket::Container(a), Bucket::Container(b)] {
        session.begin_placement(onion(), bucket).unwrap();
        session.confirm_placement("10", None).unwrap();
    }

    let before = session.draft().clone();
    assert!(session.move_addition("onion", a, b).is_err());
    assert_eq!(session.draft(), &before);

    session.remove_addition(Bucket::Container(b), "onion").unwrap();
    session.move_addition("onion", a, b).unwrap();
    assert!(!session.draft().container(a).unwrap().contains("onion"));
    assert!(session.draft().container(b).unwrap().contains("onion"));
}

#[tokio::test]
async fn removal_keeps_narrative_and_steps_in_sync() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    let boil = CatalogItem::new("boil", "Bring to a boil");
    session.append_catalog_instruction(0, &boil).unwrap();
    session.append_ingredient_instruction(0, &onion(), "2", Some("pcs")).unwrap();
    session.append_catalog_instruction(0, &CatalogItem::new("stir", "Stir well")).unwrap();

    assert!(!session.remove_instruction(0, "Not there").unwrap());
    assert!(session.remove_instruction(0, "Add 2 pcs Onion").unwrap());

    let context = &session.contexts()[0];
    let texts: Vec<_> = context.steps.iter().map(|s| s.instruction.as_str()).collect();
    assert_eq!(texts, vec!["Bring to a boil", "Stir well"]);
    assert_eq!(context.narrative, "Bring to a boil\nStir well");

    let payload = session.assemble_payload();
    let numbers: Vec<u32> = payload.instructions.iter().map(|s| s.step).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn step_numbers_stay_contiguous_across_contexts() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    let second = session.add_context().unwrap();
    for i in 0..3 {
        let item = CatalogItem::new(format!("a{i}"), format!("First {i}"));
        session.append_catalog_instruction(0, &item).unwrap();
        let item = CatalogItem::new(format!("b{i}"), format!("Second {i}"));
        session.append_catalog_instruction(second, &item).unwrap();
    }
    session.remove_instruction(0, "First 1").unwrap();
    session.remove_instruction(second, "Second 0").unwrap();

    let numbers: Vec<u32> = session.assemble_payload().instructions.iter().map(|s| s.step).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn resubmitting_a_resumed_recipe_is_stable() {
    let gateway = StoreGateway::default();
    let mut session = AuthoringSession::start(&gateway, Catalog::default(), "gm");
    session.update(basics()).unwrap();
    session.next().await.unwrap();
    let pot = session.add_container("Pot").unwrap();
    session.begin_placement(onion(), Bucket::Container(pot)).unwrap();
    session.confirm_placement("50", Some("gm")).unwrap();
    session.next().await.unwrap();
    session.next().await.unwrap();
    session
        .update(DraftPatch {
            serving_size: Some(2),
            cooking_time: Some(20),
            ..Default::default()
        })
        .unwrap();
    session.next().await.unwrap();
    session.append_ingredient_instruction(0, &onion(), "50", None).unwrap();
    let id = session.finish().await.unwrap();
    let persisted = gateway.fetch_draft(&id).await.unwrap();

    let mut resumed = AuthoringSession::resume(&gateway, Catalog::default(), "gm", &id)
        .await
        .unwrap();
    while resumed.step() != AuthoringStep::last() {
        resumed.next().await.unwrap();
    }
    resumed.finish().await.unwrap();

    let mut resubmitted = gateway.fetch_draft(&id).await.unwrap();
    let mut expected = persisted;
    resubmitted.draft_id = None;
    expected.draft_id = None;
    assert_eq!(resubmitted, expected);
    assert_eq!(*gateway.creates.lock().unwrap(), 1);
}
