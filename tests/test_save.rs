use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use paste_recipe::{
    Draft, DraftError, InMemoryRecipeStore, NewStep, RecipeId, RecipeStore, RecipeSummary,
    RecipeWithDetails, StoreError,
};

/// Store that fails a fixed number of saves before delegating to memory
struct FlakyStore {
    failures_left: AtomicUsize,
    inner: InMemoryRecipeStore,
}

impl FlakyStore {
    fn failing(times: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(times),
            inner: InMemoryRecipeStore::new(),
        }
    }
}

#[async_trait]
impl RecipeStore for FlakyStore {
    async fn save_recipe(
        &self,
        title: &str,
        ingredients: &[String],
        steps: &[NewStep],
    ) -> Result<RecipeId, StoreError> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::Backend("database is locked".to_string()));
        }
        self.inner.save_recipe(title, ingredients, steps).await
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError> {
        self.inner.delete_recipe(id).await
    }

    async fn get_recipe_with_details(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeWithDetails>, StoreError> {
        self.inner.get_recipe_with_details(id).await
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, StoreError> {
        self.inner.list_recipes().await
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, StoreError> {
        self.inner.search_recipes(query).await
    }
}

fn ready_draft() -> Draft {
    let mut draft = Draft::new();
    draft.set_title("Test Recipe");
    draft.set_source_text("1. Do this\n2. Do that");
    draft.run_segmentation();
    draft
}

#[tokio::test]
async fn test_save_recipe_calls_store() {
    let store = InMemoryRecipeStore::new();
    let mut draft = ready_draft();

    let id = draft.save(&store).await.unwrap();

    assert_eq!(draft.saved_as(), Some(id));
    assert!(!draft.saving());

    let details = store.get_recipe_with_details(id).await.unwrap().unwrap();
    assert_eq!(details.recipe.title, "Test Recipe");
    assert!(details.ingredients.is_empty());
    let instructions: Vec<&str> = details
        .steps
        .iter()
        .map(|s| s.instruction.as_str())
        .collect();
    assert_eq!(instructions, vec!["Do this", "Do that"]);
    assert!(details.steps.iter().all(|s| s.timer_seconds.is_none()));
}

#[tokio::test]
async fn test_save_skips_blank_steps_and_keeps_edited_order() {
    let store = InMemoryRecipeStore::new();
    let mut draft = ready_draft();
    draft.reorder_steps(1, 0);
    draft.add_manual_step();

    let id = draft.save(&store).await.unwrap();

    let details = store.get_recipe_with_details(id).await.unwrap().unwrap();
    let instructions: Vec<&str> = details
        .steps
        .iter()
        .map(|s| s.instruction.as_str())
        .collect();
    assert_eq!(instructions, vec!["Do that", "Do this"]);
}

#[tokio::test]
async fn test_save_not_ready_does_not_touch_store() {
    let store = InMemoryRecipeStore::new();
    let mut draft = Draft::new();
    draft.set_source_text("1. Do this");
    draft.run_segmentation();

    let result = draft.save(&store).await;

    assert!(matches!(result, Err(DraftError::NotReady)));
    assert_eq!(store.recipe_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_save_can_be_retried() {
    let store = FlakyStore::failing(1);
    let mut draft = ready_draft();
    let before = draft.snapshot();

    let first = draft.save(&store).await;
    assert!(matches!(
        first,
        Err(DraftError::Store(StoreError::Backend(_)))
    ));
    assert_eq!(draft.snapshot(), before);

    let id = draft.save(&store).await.unwrap();
    assert_eq!(draft.saved_as(), Some(id));
    assert_eq!(store.recipe_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_save_through_trait_object() {
    let store: Box<dyn RecipeStore> = Box::new(InMemoryRecipeStore::new());
    let mut draft = ready_draft();

    draft.save(store.as_ref()).await.unwrap();

    let recipes = store.search_recipes("test").await.unwrap();
    assert_eq!(recipes.len(), 1);
}

#[tokio::test]
async fn test_segmentation_off_thread() {
    let mut draft = Draft::new();
    draft.set_source_text("Step 1: Soak beans\nStep 2: Simmer beans");

    let job = draft.begin_segmentation();
    let segmentation = tokio::task::spawn_blocking(move || job.run())
        .await
        .unwrap();

    assert!(draft.apply_segmentation(segmentation));
    assert!(draft.parsed());
    assert_eq!(
        draft.steps().instructions(),
        vec!["Soak beans", "Simmer beans"]
    );
}

#[tokio::test]
async fn test_stale_off_thread_segmentation_is_dropped() {
    let mut draft = Draft::new();
    draft.set_source_text("1. Old\n2. Recipe");

    let job = draft.begin_segmentation();
    let handle = tokio::task::spawn_blocking(move || job.run());

    draft.set_source_text("1. Edited\n2. Recipe");
    let segmentation = handle.await.unwrap();

    assert!(!draft.apply_segmentation(segmentation));
    assert!(draft.steps().is_empty());
    assert!(!draft.parsed());
}

#[tokio::test]
async fn test_off_thread_segmentation_dropped_after_text_restored() {
    let mut draft = Draft::new();
    draft.set_source_text("1. Rinse\n2. Cook");

    let job = draft.begin_segmentation();
    let handle = tokio::task::spawn_blocking(move || job.run());

    draft.set_source_text("something else");
    draft.set_source_text("1. Rinse\n2. Cook");
    draft.run_segmentation();
    let first = draft.steps().ids()[0];
    draft.edit_step(first, "Rinse twice");

    let segmentation = handle.await.unwrap();

    assert!(!draft.apply_segmentation(segmentation));
    assert_eq!(draft.steps().instructions(), vec!["Rinse twice", "Cook"]);
}
