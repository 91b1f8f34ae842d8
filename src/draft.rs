//! A recipe being assembled from pasted text.
//!
//! The draft keeps the pasted text, the title and the editable [`StepList`].
//! Segmentation can run off the interactive thread: [`Draft::begin_segmentation`]
//! snapshots the text into a [`SegmentationJob`], and the finished
//! [`Segmentation`] is only accepted if the text has not changed meanwhile.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{DraftError, StoreError};
use crate::segmenter::Segmenter;
use crate::steps::{StepId, StepList, StepState};
use crate::store::{NewStep, RecipeId, RecipeStore};

/// Work item for one segmentation run, detached from the draft.
#[derive(Debug, Clone)]
pub struct SegmentationJob {
    source: String,
    revision: u64,
    segmenter: Arc<Segmenter>,
}

impl SegmentationJob {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Segment the captured text. Pure; safe to call from any thread.
    pub fn run(self) -> Segmentation {
        let instructions = self.segmenter.segment(&self.source);
        Segmentation {
            source: self.source,
            revision: self.revision,
            instructions,
        }
    }
}

/// Instructions produced from one exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    source: String,
    revision: u64,
    instructions: Vec<String>,
}

impl Segmentation {
    /// The text these instructions were computed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }
}

/// What a draft hands to the store on save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePayload {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<NewStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSnapshot {
    pub id: StepId,
    pub instruction: String,
    pub state: StepState,
}

impl StepSnapshot {
    pub fn is_editing(&self) -> bool {
        self.state == StepState::Editing
    }
}

/// Read-only view of a draft after an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSnapshot {
    pub title: String,
    pub source_text: String,
    pub steps: Vec<StepSnapshot>,
    pub step_count: usize,
    pub parsed: bool,
    pub can_save: bool,
    pub saving: bool,
    pub saved_as: Option<RecipeId>,
}

#[derive(Debug, Clone)]
pub struct Draft {
    title: String,
    source_text: String,
    // Bumped on every source text change, including changes back to old text
    source_revision: u64,
    steps: StepList,
    // Text the current steps were segmented from
    segmented_from: Option<String>,
    saving: bool,
    saved_as: Option<RecipeId>,
    segmenter: Arc<Segmenter>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    pub fn new() -> Self {
        Self::with_segmenter(Arc::new(Segmenter::default()))
    }

    pub fn with_segmenter(segmenter: Arc<Segmenter>) -> Self {
        Self {
            title: String::new(),
            source_text: String::new(),
            source_revision: 0,
            steps: StepList::new(),
            segmented_from: None,
            saving: false,
            saved_as: None,
            segmenter,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    /// Id assigned by the store after the last successful save
    pub fn saved_as(&self) -> Option<RecipeId> {
        self.saved_as
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the pasted text. Existing steps stay until the next segmentation.
    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
        self.source_revision = self.source_revision.wrapping_add(1);
    }

    /// True while the steps come from segmenting the current source text
    pub fn parsed(&self) -> bool {
        self.segmented_from.as_deref() == Some(self.source_text.as_str())
    }

    /// Capture the current source text for segmentation.
    pub fn begin_segmentation(&self) -> SegmentationJob {
        SegmentationJob {
            source: self.source_text.clone(),
            revision: self.source_revision,
            segmenter: Arc::clone(&self.segmenter),
        }
    }

    /// Install a finished segmentation, replacing every step.
    ///
    /// Results started before the latest [`Draft::set_source_text`] are
    /// dropped and false is returned, even if the text was set back to the
    /// same value.
    pub fn apply_segmentation(&mut self, segmentation: Segmentation) -> bool {
        if segmentation.revision != self.source_revision {
            warn!("Dropping stale segmentation; source text changed while it ran");
            return false;
        }

        debug!("Applying {} segmented steps", segmentation.instructions.len());
        self.steps.replace_all(segmentation.instructions);
        self.segmented_from = Some(segmentation.source);
        true
    }

    /// Segment the current source text in place.
    pub fn run_segmentation(&mut self) {
        let segmentation = self.begin_segmentation().run();
        self.apply_segmentation(segmentation);
    }

    pub fn set_editing(&mut self, id: StepId, editing: bool) -> bool {
        self.steps.set_editing(id, editing)
    }

    pub fn edit_step(&mut self, id: StepId, text: &str) -> bool {
        self.steps.edit_step(id, text)
    }

    pub fn delete_step(&mut self, id: StepId) -> bool {
        self.steps.delete_step(id)
    }

    pub fn merge_steps(&mut self, id: StepId, toward_next: bool) -> bool {
        self.steps.merge_steps(id, toward_next)
    }

    pub fn add_manual_step(&mut self) -> StepId {
        self.steps.add_manual_step()
    }

    pub fn reorder_steps(&mut self, from: usize, to: usize) -> bool {
        self.steps.reorder_steps(from, to)
    }

    /// Titled, has at least one non-blank step, and no save is running
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty() && self.steps.has_content() && !self.saving
    }

    /// Mark a save as started and build what the store should receive.
    ///
    /// Blank steps are left out and every instruction is trimmed.
    pub fn begin_save(&mut self) -> Result<SavePayload, DraftError> {
        if self.saving {
            return Err(DraftError::SaveInFlight);
        }
        if !self.can_save() {
            return Err(DraftError::NotReady);
        }

        let steps: Vec<NewStep> = self
            .steps
            .iter()
            .filter(|step| !step.is_blank())
            .map(|step| NewStep::new(step.instruction().trim()))
            .collect();

        self.saving = true;
        info!(
            "Saving recipe '{}' with {} steps",
            self.title.trim(),
            steps.len()
        );

        Ok(SavePayload {
            title: self.title.trim().to_string(),
            ingredients: Vec::new(),
            steps,
        })
    }

    /// Record the store's answer to the save started by [`Draft::begin_save`].
    ///
    /// On failure the draft keeps its title and steps so the save can be retried.
    /// Without a save in flight the result is ignored and the draft is untouched.
    pub fn finish_save(
        &mut self,
        result: Result<RecipeId, StoreError>,
    ) -> Result<RecipeId, DraftError> {
        if !self.saving {
            warn!("Ignoring save result; no save is in progress");
            return Err(DraftError::NoSaveInFlight);
        }
        self.saving = false;
        match result {
            Ok(id) => {
                info!("Recipe saved as {}", id);
                self.saved_as = Some(id);
                Ok(id)
            }
            Err(e) => {
                warn!("Saving recipe failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Hand the draft to `store`.
    pub async fn save<S>(&mut self, store: &S) -> Result<RecipeId, DraftError>
    where
        S: RecipeStore + ?Sized,
    {
        let payload = self.begin_save()?;
        let result = store
            .save_recipe(&payload.title, &payload.ingredients, &payload.steps)
            .await;
        self.finish_save(result)
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        let steps: Vec<StepSnapshot> = self
            .steps
            .iter()
            .map(|step| StepSnapshot {
                id: step.id(),
                instruction: step.instruction().to_string(),
                state: self.steps.state_of(step.id()),
            })
            .collect();

        DraftSnapshot {
            title: self.title.clone(),
            source_text: self.source_text.clone(),
            step_count: steps.len(),
            steps,
            parsed: self.parsed(),
            can_save: self.can_save(),
            saving: self.saving,
            saved_as: self.saved_as,
        }
    }
}
