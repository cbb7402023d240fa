//! Uncommitted input that lives outside the canonical task list: per-row edit
//! drafts, per-task comment inputs and the new-task form.
//!
//! Drafts only ever produce [`Action`]s. Cancelling a draft never touches the
//! store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Category, NewTask, Priority, Task, TaskEdit, TaskId};
use crate::store::Action;
use crate::utils::parse_date;
use crate::view::Features;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
}

/// Empty input means no due date.
fn parse_due_date(input: &str) -> Result<Option<NaiveDate>, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date(input)
        .map(Some)
        .map_err(|_| DraftError::InvalidDueDate(input.to_string()))
}

fn format_due_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Editable copy of a task's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub title: String,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: String,
}

impl EditDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            priority: task.priority,
            category: task.category,
            due_date: format_due_date(task.due_date),
        }
    }

    pub fn to_edit(&self) -> Result<TaskEdit, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        Ok(TaskEdit {
            title: self.title.clone(),
            priority: self.priority,
            category: self.category,
            due_date: parse_due_date(&self.due_date)?,
        })
    }
}

/// Rows currently being edited, keyed by task id.
#[derive(Debug, Clone, Default)]
pub struct EditSessions {
    drafts: HashMap<TaskId, EditDraft>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing a row from its canonical values, replacing any
    /// earlier draft for it.
    pub fn begin(&mut self, task: &Task) -> &mut EditDraft {
        let draft = EditDraft::from_task(task);
        match self.drafts.entry(task.id) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                *slot = draft;
                slot
            }
            Entry::Vacant(entry) => entry.insert(draft),
        }
    }

    pub fn is_editing(&self, id: TaskId) -> bool {
        self.drafts.contains_key(&id)
    }

    pub fn draft(&self, id: TaskId) -> Option<&EditDraft> {
        self.drafts.get(&id)
    }

    pub fn draft_mut(&mut self, id: TaskId) -> Option<&mut EditDraft> {
        self.drafts.get_mut(&id)
    }

    /// Discard a draft. Returns false if the row was not being edited.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.drafts.remove(&id).is_some()
    }

    /// Validate the draft and turn it into an edit action. On error the
    /// draft stays open so the user can fix it.
    pub fn commit(&mut self, id: TaskId) -> Result<Option<Action>, DraftError> {
        let Some(draft) = self.drafts.get(&id) else {
            return Ok(None);
        };
        let changes = draft.to_edit()?;
        self.drafts.remove(&id);
        Ok(Some(Action::Edit { id, changes }))
    }

    /// Drop drafts whose task no longer exists.
    pub fn reconcile(&mut self, tasks: &[Task]) {
        self.drafts
            .retain(|id, _| tasks.iter().any(|task| task.id == *id));
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

/// Pending comment text per task.
#[derive(Debug, Clone, Default)]
pub struct CommentDrafts {
    inputs: HashMap<TaskId, String>,
}

impl CommentDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, id: TaskId) -> &str {
        self.inputs.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn input_mut(&mut self, id: TaskId) -> &mut String {
        self.inputs.entry(id).or_default()
    }

    /// Whitespace-only input is rejected and left in place. Accepted input is
    /// cleared and returned as an add-comment action.
    pub fn submit(&mut self, id: TaskId) -> Option<Action> {
        let input = self.inputs.get_mut(&id)?;
        if input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(input);
        Some(Action::AddComment { task_id: id, text })
    }

    pub fn reconcile(&mut self, tasks: &[Task]) {
        self.inputs
            .retain(|id, _| tasks.iter().any(|task| task.id == *id));
    }
}

/// State of the add-task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskForm {
    pub title: String,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: String,
}

impl Default for NewTaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            priority: Priority::Medium,
            category: None,
            due_date: String::new(),
        }
    }
}

impl NewTaskForm {
    /// Build an add action from the form. A blank title submits nothing and
    /// leaves the form as is; a successful submit resets the form.
    pub fn submit(&mut self, features: &Features) -> Result<Option<Action>, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let mut new_task = NewTask::new(title).priority(self.priority);
        if let Some(category) = self.category.filter(|_| features.categories) {
            new_task = new_task.category(category);
        }
        if features.due_dates {
            if let Some(date) = parse_due_date(&self.due_date)? {
                new_task = new_task.due_date(date);
            }
        }

        *self = Self::default();
        Ok(Some(Action::Add(new_task)))
    }
}
