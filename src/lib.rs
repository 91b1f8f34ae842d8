//! Turn pasted recipe text into an ordered, editable list of cooking steps.
//!
//! # Quick Start
//!
//! ```
//! use paste_recipe::Draft;
//!
//! let mut draft = Draft::new();
//! draft.set_title("Sponge cake");
//! draft.set_source_text("1. Preheat oven to 350°F\n2. Mix flour and sugar\n3. Bake for 30 minutes");
//! draft.run_segmentation();
//!
//! let ids = draft.steps().ids();
//! draft.merge_steps(ids[0], true);
//!
//! assert_eq!(
//!     draft.steps().instructions(),
//!     vec!["Preheat oven to 350°F Mix flour and sugar", "Bake for 30 minutes"]
//! );
//! assert!(draft.can_save());
//! ```

pub mod config;
pub mod draft;
pub mod error;
pub mod segmenter;
pub mod steps;
pub mod store;
pub mod uniffi_bindings;

pub use config::SegmenterConfig;
pub use draft::{
    Draft, DraftSnapshot, SavePayload, Segmentation, SegmentationJob, StepSnapshot,
};
pub use error::{DraftError, StoreError};
pub use segmenter::{Convention, MatchReport, Segmenter, SplitStrategy};
pub use steps::{Step, StepId, StepList, StepState};
pub use store::{
    InMemoryRecipeStore, NewStep, RecipeId, RecipeStore, RecipeSummary, RecipeWithDetails,
    StoredStep,
};

/// Split recipe text into instructions with the default segmenter.
///
/// # Example
/// ```
/// let steps = paste_recipe::segment_text("Step 1: Boil water\nStep 2: Add pasta");
/// assert_eq!(steps, vec!["Boil water", "Add pasta"]);
/// ```
pub fn segment_text(text: &str) -> Vec<String> {
    Segmenter::default().segment(text)
}

/// Build a segmenter from `paste_recipe.toml` and `PASTE_RECIPE__*` variables.
pub fn load_segmenter() -> Result<Segmenter, DraftError> {
    let config = SegmenterConfig::load()?;
    Ok(Segmenter::new(&config))
}
