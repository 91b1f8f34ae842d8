//! The editable list of parsed steps.
//!
//! Steps are identified by [`StepId`] handles issued from a counter owned by
//! the list, so an id is never reused while the list lives, even across
//! [`StepList::replace_all`]. The list also owns the single editing cursor:
//! at most one step is in [`StepState::Editing`] at a time.

use std::fmt;

use log::debug;
use serde::Serialize;

/// Stable handle of a step inside one [`StepList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StepId(u64);

impl StepId {
    /// Raw value, for hosts that need to pass ids across an FFI boundary
    pub fn get(self) -> u64 {
        self.0
    }

    /// Rebuild an id handed back across an FFI boundary
    pub fn from_raw(raw: u64) -> Self {
        StepId(raw)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    id: StepId,
    instruction: String,
}

impl Step {
    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn is_blank(&self) -> bool {
        self.instruction.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StepList {
    steps: Vec<Step>,
    editing: Option<StepId>,
    next_id: u64,
}

impl StepList {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, instruction: String) -> Step {
        let id = StepId(self.next_id);
        self.next_id += 1;
        Step { id, instruction }
    }

    fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    /// Replace every step with freshly identified ones built from `instructions`.
    pub fn replace_all<I>(&mut self, instructions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.editing = None;
        let fresh: Vec<Step> = instructions
            .into_iter()
            .map(|instruction| self.allocate(instruction))
            .collect();
        self.steps = fresh;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Step at `index` in execution order
    pub fn at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|step| step.id).collect()
    }

    pub fn instructions(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.instruction.as_str()).collect()
    }

    /// The step currently being edited, if any
    pub fn editing(&self) -> Option<StepId> {
        self.editing
    }

    pub fn state_of(&self, id: StepId) -> StepState {
        if self.editing == Some(id) {
            StepState::Editing
        } else {
            StepState::Viewing
        }
    }

    /// Whether at least one step has a non-blank instruction
    pub fn has_content(&self) -> bool {
        self.steps.iter().any(|step| !step.is_blank())
    }

    /// Open or close the editor on a step.
    ///
    /// Opening closes whichever step was open before. Closing only affects
    /// `id`. Returns false when `id` is unknown.
    pub fn set_editing(&mut self, id: StepId, editing: bool) -> bool {
        if self.position(id).is_none() {
            debug!("Ignoring set_editing for unknown {}", id);
            return false;
        }

        if editing {
            self.editing = Some(id);
        } else if self.editing == Some(id) {
            self.editing = None;
        }
        true
    }

    /// Replace the instruction of `id` with trimmed `text` and close its editor.
    ///
    /// Empty text is accepted; readiness checks decide whether it matters.
    pub fn edit_step(&mut self, id: StepId, text: &str) -> bool {
        let Some(index) = self.position(id) else {
            debug!("Ignoring edit for unknown {}", id);
            return false;
        };

        self.steps[index].instruction = text.trim().to_string();
        if self.editing == Some(id) {
            self.editing = None;
        }
        true
    }

    pub fn delete_step(&mut self, id: StepId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("Ignoring delete for unknown {}", id);
            return false;
        };

        self.steps.remove(index);
        if self.editing == Some(id) {
            self.editing = None;
        }
        true
    }

    /// Fold the neighbouring step into `id`.
    ///
    /// With `toward_next` the following step is appended to `id`, otherwise
    /// the preceding step is prepended. The merged step keeps the id of `id`
    /// and the neighbour disappears. Returns false when `id` is unknown or
    /// has no neighbour in that direction.
    pub fn merge_steps(&mut self, id: StepId, toward_next: bool) -> bool {
        let Some(index) = self.position(id) else {
            debug!("Ignoring merge for unknown {}", id);
            return false;
        };

        let target = if toward_next {
            index + 1
        } else {
            match index.checked_sub(1) {
                Some(previous) => previous,
                None => return false,
            }
        };
        if target >= self.steps.len() {
            return false;
        }

        let absorbed = self.steps.remove(target);
        let index = if toward_next { index } else { index - 1 };
        let current = &mut self.steps[index];

        let merged = if toward_next {
            format!("{} {}", current.instruction, absorbed.instruction)
        } else {
            format!("{} {}", absorbed.instruction, current.instruction)
        };
        current.instruction = merged.trim().to_string();

        if self.editing == Some(absorbed.id) {
            self.editing = None;
        }
        true
    }

    /// Append an empty step and open it for editing.
    pub fn add_manual_step(&mut self) -> StepId {
        let step = self.allocate(String::new());
        let id = step.id;
        self.steps.push(step);
        self.editing = Some(id);
        id
    }

    /// Move the step at `from` so it ends up at index `to`.
    ///
    /// Both indices must address existing steps; otherwise nothing moves and
    /// false is returned.
    pub fn reorder_steps(&mut self, from: usize, to: usize) -> bool {
        let len = self.steps.len();
        if from >= len || to >= len {
            debug!(
                "Rejecting reorder from {} to {} in a list of {} steps",
                from, to, len
            );
            return false;
        }

        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        true
    }
}
