#![forbid(unsafe_code)]

//! The to-do list state container.
//!
//! `TodoList` is the single owner of every task plus the input and color
//! picker sub-state. The renderer reads it; key handlers and the replay
//! driver mutate it only through the operations below. Blank text and
//! unknown ids are silently ignored.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::task::draft::Draft;
use crate::task::model::{Task, TaskId};
use crate::task::palette::{PALETTE, TaskColor};

/// `Plain` has no color tagging; `Tinted` adds the palette and picker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Plain,
    #[default]
    Tinted,
}

impl Variant {
    #[must_use]
    pub fn tagging(self) -> bool {
        self == Variant::Tinted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickerState {
    #[default]
    Closed,
    /// Choosing the color future tasks get.
    OpenForDefault,
    /// Recoloring one existing task.
    OpenForTask(TaskId),
}

#[derive(Debug, Clone)]
pub struct TodoList {
    variant: Variant,
    tasks: Vec<Task>,
    draft: Draft,
    selected_color: TaskColor,
    picker: PickerState,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl TodoList {
    #[must_use]
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            tasks: Vec::new(),
            draft: Draft::default(),
            selected_color: PALETTE[0],
            picker: PickerState::Closed,
        }
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    #[must_use]
    pub fn selected_color(&self) -> TaskColor {
        self.selected_color
    }

    #[must_use]
    pub fn picker(&self) -> PickerState {
        self.picker
    }

    #[must_use]
    pub fn color_picker_open(&self) -> bool {
        self.picker != PickerState::Closed
    }

    #[must_use]
    pub fn editing_task_id(&self) -> Option<TaskId> {
        match self.picker {
            PickerState::OpenForTask(id) => Some(id),
            _ => None,
        }
    }

    /// Appends a task built from `raw` (trimmed) and clears the draft.
    /// Returns `None` without touching anything when `raw` is blank.
    pub fn add_task(&mut self, raw: &str) -> Option<TaskId> {
        let text = raw.trim();
        if text.is_empty() {
            trace!("ignoring blank task text");
            return None;
        }
        let color = self.variant.tagging().then_some(self.selected_color);
        let task = Task::new(text.to_owned(), color);
        let id = task.id;
        debug!(id = %id.short(), ?color, "task added");
        self.tasks.push(task);
        self.draft.clear();
        Some(id)
    }

    /// Submits the current draft text.
    pub fn submit_draft(&mut self) -> Option<TaskId> {
        let raw = self.draft.as_str().to_owned();
        self.add_task(&raw)
    }

    pub fn toggle_task(&mut self, id: TaskId) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            trace!(id = %id.short(), "toggle: no such task");
            return;
        };
        task.done = !task.done;
        debug!(id = %id.short(), done = task.done, "task toggled");
    }

    pub fn delete_task(&mut self, id: TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            trace!(id = %id.short(), "delete: no such task");
        } else {
            debug!(id = %id.short(), "task deleted");
        }
    }

    /// Opens the picker for `target`, or for the default color when `None`.
    /// Ignored in the plain variant and while the picker is already open.
    pub fn open_color_picker(&mut self, target: Option<TaskId>) {
        if !self.variant.tagging() || self.color_picker_open() {
            trace!(?target, "picker open ignored");
            return;
        }
        self.picker = match target {
            Some(id) => PickerState::OpenForTask(id),
            None => PickerState::OpenForDefault,
        };
        debug!(picker = ?self.picker, "color picker opened");
    }

    /// Applies `color` to the picker's target and closes the picker.
    pub fn choose_color(&mut self, color: TaskColor) {
        match self.picker {
            PickerState::Closed => {
                trace!(%color, "choose: picker closed");
                return;
            }
            PickerState::OpenForDefault => {
                self.selected_color = color;
                debug!(%color, "default color changed");
            }
            PickerState::OpenForTask(id) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.color = Some(color);
                    debug!(id = %id.short(), %color, "task recolored");
                } else {
                    trace!(id = %id.short(), "recolor: no such task");
                }
            }
        }
        self.picker = PickerState::Closed;
    }

    pub fn dismiss_color_picker(&mut self) {
        if self.color_picker_open() {
            debug!("color picker dismissed");
        }
        self.picker = PickerState::Closed;
    }
}
