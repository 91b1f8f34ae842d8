//! The persistence seam a finished draft is handed to.

use std::fmt;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A step as handed to the store. Timers are not set by the paste flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStep {
    pub instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_seconds: Option<u32>,
}

impl NewStep {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            timer_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredStep {
    pub instruction: String,
    pub timer_seconds: Option<u32>,
    pub order_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeWithDetails {
    pub recipe: RecipeSummary,
    pub ingredients: Vec<String>,
    pub steps: Vec<StoredStep>,
}

/// Storage for finished recipes
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persist a new recipe and return its id
    async fn save_recipe(
        &self,
        title: &str,
        ingredients: &[String],
        steps: &[NewStep],
    ) -> Result<RecipeId, StoreError>;

    /// Remove a recipe; unknown ids are ignored
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError>;

    async fn get_recipe_with_details(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeWithDetails>, StoreError>;

    /// All recipes, newest first
    async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, StoreError>;

    /// Recipes whose title contains `query`, ignoring case, newest first
    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, StoreError>;

    async fn recipe_count(&self) -> Result<usize, StoreError> {
        Ok(self.list_recipes().await?.len())
    }
}

/// Process-local [`RecipeStore`], for tests, demos and hosts without a database
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    // Insertion order, oldest first
    recipes: Vec<RecipeWithDetails>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn save_recipe(
        &self,
        title: &str,
        ingredients: &[String],
        steps: &[NewStep],
    ) -> Result<RecipeId, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::InvalidRecipe(
                "Recipe title cannot be empty".to_string(),
            ));
        }

        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = RecipeId(inner.next_id);

        let steps = steps
            .iter()
            .enumerate()
            .map(|(order_index, step)| StoredStep {
                instruction: step.instruction.clone(),
                timer_seconds: step.timer_seconds,
                order_index,
            })
            .collect::<Vec<_>>();

        debug!("Storing recipe {} '{}' with {} steps", id, title, steps.len());
        inner.recipes.push(RecipeWithDetails {
            recipe: RecipeSummary {
                id,
                title: title.to_string(),
            },
            ingredients: ingredients.to_vec(),
            steps,
        });

        Ok(id)
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.recipes.retain(|recipe| recipe.recipe.id != id);
        Ok(())
    }

    async fn get_recipe_with_details(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeWithDetails>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .find(|recipe| recipe.recipe.id == id)
            .cloned())
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .rev()
            .map(|recipe| recipe.recipe.clone())
            .collect())
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSummary>, StoreError> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .rev()
            .filter(|recipe| recipe.recipe.title.to_lowercase().contains(&needle))
            .map(|recipe| recipe.recipe.clone())
            .collect())
    }
}
