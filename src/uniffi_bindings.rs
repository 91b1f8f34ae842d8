//! UniFFI bindings for paste-recipe
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! The host owns persistence: it calls `begin_save`, writes the payload to its
//! own database, then reports the outcome through `finish_save`.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::draft::{DraftSnapshot, SavePayload};
use crate::steps::{StepId, StepState};
use crate::{Draft, DraftError, RecipeId, StoreError};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible step view
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiStep {
    pub id: u64,
    pub instruction: String,
    pub is_editing: bool,
}

/// FFI-compatible draft snapshot
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiDraftSnapshot {
    pub title: String,
    pub source_text: String,
    pub steps: Vec<FfiStep>,
    pub parsed: bool,
    pub can_save: bool,
    pub is_saving: bool,
    /// Recipe id from the last successful save
    pub saved_recipe_id: Option<i64>,
}

impl From<DraftSnapshot> for FfiDraftSnapshot {
    fn from(snapshot: DraftSnapshot) -> Self {
        FfiDraftSnapshot {
            title: snapshot.title,
            source_text: snapshot.source_text,
            steps: snapshot
                .steps
                .into_iter()
                .map(|step| FfiStep {
                    id: step.id.get(),
                    instruction: step.instruction,
                    is_editing: step.state == StepState::Editing,
                })
                .collect(),
            parsed: snapshot.parsed,
            can_save: snapshot.can_save,
            is_saving: snapshot.saving,
            saved_recipe_id: snapshot.saved_as.map(|id| id.0),
        }
    }
}

/// FFI-compatible save payload
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiSavePayload {
    pub title: String,
    pub ingredients: Vec<String>,
    /// Instructions in execution order; timers are always unset
    pub steps: Vec<String>,
}

impl From<SavePayload> for FfiSavePayload {
    fn from(payload: SavePayload) -> Self {
        FfiSavePayload {
            title: payload.title,
            ingredients: payload.ingredients,
            steps: payload.steps.into_iter().map(|s| s.instruction).collect(),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiDraftError {
    /// Draft needs a title and a non-blank step
    NotReady { message: String },
    /// A save is already running
    SaveInFlight { message: String },
    /// A save result was reported with no save running
    NoSaveInFlight { message: String },
    /// Host storage reported a failure
    StoreError { message: String },
    /// Configuration error
    ConfigError { message: String },
}

impl fmt::Display for FfiDraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiDraftError::NotReady { message } => write!(f, "Not ready: {}", message),
            FfiDraftError::SaveInFlight { message } => write!(f, "Save in flight: {}", message),
            FfiDraftError::NoSaveInFlight { message } => {
                write!(f, "No save in flight: {}", message)
            }
            FfiDraftError::StoreError { message } => write!(f, "Store error: {}", message),
            FfiDraftError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for FfiDraftError {}

impl From<DraftError> for FfiDraftError {
    fn from(err: DraftError) -> Self {
        let message = err.to_string();
        match err {
            DraftError::NotReady => FfiDraftError::NotReady { message },
            DraftError::SaveInFlight => FfiDraftError::SaveInFlight { message },
            DraftError::NoSaveInFlight => FfiDraftError::NoSaveInFlight { message },
            DraftError::Store(_) => FfiDraftError::StoreError { message },
            DraftError::Config(_) => FfiDraftError::ConfigError { message },
        }
    }
}

/// A draft shared with the host UI
#[cfg_attr(feature = "uniffi", derive(uniffi::Object))]
pub struct FfiPasteDraft {
    draft: Mutex<Draft>,
}

impl Default for FfiPasteDraft {
    fn default() -> Self {
        FfiPasteDraft {
            draft: Mutex::new(Draft::new()),
        }
    }
}

impl FfiPasteDraft {
    fn lock(&self) -> MutexGuard<'_, Draft> {
        // Draft operations never panic mid-update, so a poisoned lock still
        // holds a consistent draft
        self.draft.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn update(&self, op: impl FnOnce(&mut Draft)) -> FfiDraftSnapshot {
        let mut draft = self.lock();
        op(&mut *draft);
        draft.snapshot().into()
    }
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
impl FfiPasteDraft {
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a draft whose segmenter reads `paste_recipe.toml` and the environment
    #[cfg_attr(feature = "uniffi", uniffi::constructor)]
    pub fn with_config() -> Result<Arc<Self>, FfiDraftError> {
        let segmenter = crate::load_segmenter()?;
        Ok(Arc::new(FfiPasteDraft {
            draft: Mutex::new(Draft::with_segmenter(Arc::new(segmenter))),
        }))
    }

    pub fn snapshot(&self) -> FfiDraftSnapshot {
        self.lock().snapshot().into()
    }

    pub fn set_source_text(&self, text: String) -> FfiDraftSnapshot {
        self.update(|draft| draft.set_source_text(text))
    }

    pub fn set_title(&self, title: String) -> FfiDraftSnapshot {
        self.update(|draft| draft.set_title(title))
    }

    /// Segment the current text. The lock is released while segmenting, so
    /// a text change from another thread makes the result stale and it is dropped.
    pub fn run_segmentation(&self) -> FfiDraftSnapshot {
        let job = self.lock().begin_segmentation();
        let segmentation = job.run();
        self.update(|draft| {
            draft.apply_segmentation(segmentation);
        })
    }

    pub fn set_editing(&self, step_id: u64, editing: bool) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.set_editing(StepId::from_raw(step_id), editing);
        })
    }

    pub fn edit_step(&self, step_id: u64, text: String) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.edit_step(StepId::from_raw(step_id), &text);
        })
    }

    pub fn delete_step(&self, step_id: u64) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.delete_step(StepId::from_raw(step_id));
        })
    }

    pub fn merge_steps(&self, step_id: u64, toward_next: bool) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.merge_steps(StepId::from_raw(step_id), toward_next);
        })
    }

    pub fn add_manual_step(&self) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.add_manual_step();
        })
    }

    pub fn reorder_steps(&self, from_index: u32, to_index: u32) -> FfiDraftSnapshot {
        self.update(|draft| {
            draft.reorder_steps(from_index as usize, to_index as usize);
        })
    }

    pub fn begin_save(&self) -> Result<FfiSavePayload, FfiDraftError> {
        Ok(self.lock().begin_save()?.into())
    }

    /// Report the host's save outcome: a recipe id on success, an error message otherwise
    pub fn finish_save(
        &self,
        recipe_id: Option<i64>,
        error: Option<String>,
    ) -> Result<FfiDraftSnapshot, FfiDraftError> {
        let result = match (recipe_id, error) {
            (Some(id), None) => Ok(RecipeId(id)),
            (_, Some(message)) => Err(StoreError::Backend(message)),
            (None, None) => Err(StoreError::Backend(
                "Save finished without a recipe id".to_string(),
            )),
        };

        let mut draft = self.lock();
        draft.finish_save(result)?;
        Ok(draft.snapshot().into())
    }
}

/// Split recipe text into instructions without creating a draft
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn segment_recipe_text(text: String) -> Vec<String> {
    crate::segment_text(&text)
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
