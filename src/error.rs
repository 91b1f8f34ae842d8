use thiserror::Error;

/// Errors reported by a [`RecipeStore`](crate::store::RecipeStore)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store refused the recipe as given
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// The storage backend failed
    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Errors that can occur while working on a draft
#[derive(Error, Debug)]
pub enum DraftError {
    /// Save requested while the draft has no title or no non-blank step
    #[error("Draft is not ready to save: it needs a title and at least one step")]
    NotReady,

    /// Save requested while a previous save has not finished
    #[error("A save is already in progress")]
    SaveInFlight,

    /// A save result arrived with no save in progress
    #[error("No save is in progress")]
    NoSaveInFlight,

    /// The persistence collaborator rejected or failed the save
    #[error("Failed to save recipe: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
