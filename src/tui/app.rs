use crate::drafts::{CommentDrafts, EditSessions, NewTaskForm};
use crate::models::{Category, Task, TaskId};
use crate::store::{Action, TaskStore};
use crate::tui::widgets::editor::LineCursor;
use crate::view::{self, ViewSettings};
use crate::Config;
use ratatui::widgets::ListState;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Create,
    Edit(TaskId),
    Comment(TaskId),
    ConfirmDelete(TaskId),
    Help,
}

/// Fields of the add and edit forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Priority,
    Category,
    DueDate,
}

impl FormField {
    /// Fields shown for the given features, in tab order
    pub fn visible(features: &crate::view::Features) -> Vec<FormField> {
        let mut fields = vec![FormField::Title, FormField::Priority];
        if features.categories {
            fields.push(FormField::Category);
        }
        if features.due_dates {
            fields.push(FormField::DueDate);
        }
        fields
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "タイトル",
            FormField::Priority => "優先度",
            FormField::Category => "カテゴリ",
            FormField::DueDate => "期限 (YYYY-MM-DD)",
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Title | FormField::DueDate)
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub selected_index: usize,
    pub selected_id: Option<TaskId>,
    pub list_state: ListState,
    pub field: FormField,
    pub cursor: LineCursor,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            selected_index: 0,
            selected_id: None,
            list_state: ListState::default(),
            field: FormField::Title,
            cursor: LineCursor::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    /// 0 = Delete, 1 = Cancel
    pub delete_modal_selection: usize,
}

pub struct App {
    pub config: Config,
    pub store: TaskStore,
    pub view: ViewSettings,

    // Uncommitted input
    pub edits: EditSessions,
    pub comments: CommentDrafts,
    pub new_task: NewTaskForm,

    pub ui: UiState,
    pub status: StatusState,
    pub modals: ModalState,
}

impl App {
    pub fn new(config: Config, store: TaskStore) -> Self {
        let view = config.view.constrained(&config.features);
        let mut app = Self {
            config,
            store,
            view,
            edits: EditSessions::new(),
            comments: CommentDrafts::new(),
            new_task: NewTaskForm::default(),
            ui: UiState::default(),
            status: StatusState::default(),
            modals: ModalState::default(),
        };
        app.sync_selection();
        app
    }

    /// Tasks in display order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        view::project(self.store.tasks(), &self.view.constrained(&self.config.features))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.ui.selected_id.and_then(|id| self.store.get(id))
    }

    /// Re-derive the selected index after the projection changed. The
    /// selection follows the task id; if that task is gone the index is
    /// clamped to the new list.
    pub fn sync_selection(&mut self) {
        let ids: Vec<TaskId> = self.visible_tasks().iter().map(|t| t.id).collect();
        if ids.is_empty() {
            self.ui.selected_index = 0;
            self.ui.selected_id = None;
            self.ui.list_state.select(None);
            return;
        }

        let index = self
            .ui
            .selected_id
            .and_then(|id| ids.iter().position(|visible| *visible == id))
            .unwrap_or_else(|| self.ui.selected_index.min(ids.len() - 1));
        self.ui.selected_index = index;
        self.ui.selected_id = Some(ids[index]);
        self.ui.list_state.select(Some(index));
    }

    fn select_index(&mut self, index: usize) {
        let ids: Vec<TaskId> = self.visible_tasks().iter().map(|t| t.id).collect();
        if let Some(id) = ids.get(index) {
            self.ui.selected_index = index;
            self.ui.selected_id = Some(*id);
            self.ui.list_state.select(Some(index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.select_index(self.ui.selected_index - 1);
        }
    }

    pub fn move_selection_down(&mut self) {
        self.select_index(self.ui.selected_index + 1);
    }

    /// Apply an action to the store and reconcile everything derived from it.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let changed = self.store.apply(action);
        if changed {
            self.edits.reconcile(self.store.tasks());
            self.comments.reconcile(self.store.tasks());
            self.sync_selection();
        }
        changed
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.ui.selected_id {
            self.dispatch(Action::ToggleComplete(id));
        }
    }

    pub fn request_delete(&mut self) {
        let Some(id) = self.ui.selected_id else {
            return;
        };
        if self.config.confirm_delete {
            self.modals.delete_modal_selection = 0;
            self.ui.mode = Mode::ConfirmDelete(id);
        } else {
            self.delete_task(id);
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Mode::ConfirmDelete(id) = self.ui.mode {
            if self.modals.delete_modal_selection == 0 {
                self.delete_task(id);
            }
        }
        self.ui.mode = Mode::View;
    }

    fn delete_task(&mut self, id: TaskId) {
        let title = self.store.get(id).map(|t| t.title.clone()).unwrap_or_default();
        if self.dispatch(Action::Delete(id)) {
            tracing::info!(%id, "deleted task");
            self.set_status_message(format!("Deleted: {}", title));
        }
    }

    pub fn enter_create_mode(&mut self) {
        self.ui.mode = Mode::Create;
        self.ui.field = FormField::Title;
        self.ui.cursor = LineCursor::at_end(&self.new_task.title);
    }

    /// Leaving the form keeps what was typed
    pub fn exit_create_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn submit_create_form(&mut self) {
        match self.new_task.submit(&self.config.features) {
            Ok(Some(action)) => {
                if self.dispatch(action) {
                    if let Some(task) = self.store.tasks().last() {
                        tracing::info!(id = %task.id, "added task");
                        self.ui.selected_id = Some(task.id);
                    }
                    self.sync_selection();
                    self.set_status_message("Task added".to_string());
                }
                self.ui.mode = Mode::View;
            }
            // Blank title: nothing is submitted and the form stays open
            Ok(None) => {}
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        let draft = self.edits.begin(&task);
        self.ui.cursor = LineCursor::at_end(&draft.title);
        self.ui.field = FormField::Title;
        self.ui.mode = Mode::Edit(task.id);
    }

    pub fn save_edit(&mut self) {
        let Mode::Edit(id) = self.ui.mode else {
            return;
        };
        match self.edits.commit(id) {
            Ok(Some(action)) => {
                self.dispatch(action);
                self.ui.mode = Mode::View;
            }
            Ok(None) => self.ui.mode = Mode::View,
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    pub fn cancel_edit(&mut self) {
        if let Mode::Edit(id) = self.ui.mode {
            self.edits.cancel(id);
        }
        self.ui.mode = Mode::View;
    }

    pub fn enter_comment_mode(&mut self) {
        if !self.config.features.comments {
            return;
        }
        let Some(id) = self.ui.selected_id else {
            return;
        };
        self.ui.cursor = LineCursor::at_end(self.comments.input(id));
        self.ui.mode = Mode::Comment(id);
    }

    pub fn submit_comment(&mut self) {
        let Mode::Comment(id) = self.ui.mode else {
            return;
        };
        // Whitespace-only input stays in the field
        if let Some(action) = self.comments.submit(id) {
            self.dispatch(action);
            self.ui.cursor = LineCursor::default();
        }
    }

    pub fn exit_comment_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn cycle_sort(&mut self) {
        let next = self.view.sort_by.cycle(&self.config.features);
        if next == self.view.sort_by {
            self.set_status_message("Sort order is fixed".to_string());
            return;
        }
        self.view.sort_by = next;
        self.sync_selection();
    }

    fn filters_enabled(&mut self) -> bool {
        if !self.config.features.filters {
            self.set_status_message("Filters are disabled".to_string());
        }
        self.config.features.filters
    }

    pub fn cycle_priority_filter(&mut self) {
        if self.filters_enabled() {
            self.view.filter_priority = self.view.filter_priority.cycle();
            self.sync_selection();
        }
    }

    pub fn cycle_category_filter(&mut self) {
        if self.filters_enabled() && self.config.features.categories {
            self.view.filter_category = self.view.filter_category.cycle();
            self.sync_selection();
        }
    }

    pub fn toggle_show_completed(&mut self) {
        if self.filters_enabled() {
            self.view.show_completed = !self.view.show_completed;
            self.sync_selection();
        }
    }

    pub fn filter_summary(&self) -> String {
        self.view.constrained(&self.config.features).summary()
    }

    pub fn navigate_form_field(&mut self, forward: bool) {
        let fields = FormField::visible(&self.config.features);
        let current = fields.iter().position(|f| *f == self.ui.field).unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.ui.field = fields[next];
        self.ui.cursor = LineCursor::at_end(self.active_text().unwrap_or(""));
    }

    /// Text of the focused input, if the focus is on a text input
    pub fn active_text(&self) -> Option<&str> {
        let field = self.ui.field;
        match self.ui.mode {
            Mode::Create => match field {
                FormField::Title => Some(self.new_task.title.as_str()),
                FormField::DueDate => Some(self.new_task.due_date.as_str()),
                _ => None,
            },
            Mode::Edit(id) => self.edits.draft(id).and_then(|draft| match field {
                FormField::Title => Some(draft.title.as_str()),
                FormField::DueDate => Some(draft.due_date.as_str()),
                _ => None,
            }),
            Mode::Comment(id) => Some(self.comments.input(id)),
            _ => None,
        }
    }

    /// Run an edit against the focused input together with the cursor.
    pub fn edit_active_text(&mut self, f: impl FnOnce(&mut LineCursor, &mut String)) {
        let field = self.ui.field;
        let mode = self.ui.mode;
        let cursor = &mut self.ui.cursor;
        let text = match mode {
            Mode::Create => match field {
                FormField::Title => Some(&mut self.new_task.title),
                FormField::DueDate => Some(&mut self.new_task.due_date),
                _ => None,
            },
            Mode::Edit(id) => self.edits.draft_mut(id).and_then(|draft| match field {
                FormField::Title => Some(&mut draft.title),
                FormField::DueDate => Some(&mut draft.due_date),
                _ => None,
            }),
            Mode::Comment(id) => Some(self.comments.input_mut(id)),
            _ => None,
        };
        if let Some(text) = text {
            f(cursor, text);
        }
    }

    /// Step the value of a choice field (priority or category)
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = self.ui.field;
        match self.ui.mode {
            Mode::Create => match field {
                FormField::Priority => {
                    let p = self.new_task.priority;
                    self.new_task.priority = if forward { p.next() } else { p.prev() };
                }
                FormField::Category => {
                    self.new_task.category = step_category(self.new_task.category, forward);
                }
                _ => {}
            },
            Mode::Edit(id) => {
                if let Some(draft) = self.edits.draft_mut(id) {
                    match field {
                        FormField::Priority => {
                            let p = draft.priority;
                            draft.priority = if forward { p.next() } else { p.prev() };
                        }
                        FormField::Category => {
                            draft.category = step_category(draft.category, forward);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Key hints shown in the status bar for the current mode
    pub fn key_hints(&self) -> Vec<String> {
        use crate::utils::format_key_binding_for_display as display;
        let kb = &self.config.key_bindings;
        match self.ui.mode {
            Mode::View => {
                let mut hints = vec![
                    format!("{}: New", display(&kb.new)),
                    format!("{}: Edit", display(&kb.edit)),
                    format!("{}: Done", display(&kb.toggle)),
                    format!("{}: Delete", display(&kb.delete)),
                ];
                if self.config.features.comments {
                    hints.push(format!("{}: Comment", display(&kb.comment)));
                }
                hints.push(format!("{}: Sort", display(&kb.sort)));
                hints.push(format!("{}: Help", display(&kb.help)));
                hints.push(format!("{}: Quit", display(&kb.quit)));
                hints
            }
            Mode::Create => vec![
                "Enter: 追加".to_string(),
                "Tab: Next field".to_string(),
                "←/→: Change value".to_string(),
                "Esc: Close".to_string(),
            ],
            Mode::Edit(_) => vec![
                "Enter: 保存".to_string(),
                "Esc: キャンセル".to_string(),
                "Tab: Next field".to_string(),
            ],
            Mode::Comment(_) => vec!["Enter: Add".to_string(), "Esc: Back".to_string()],
            Mode::ConfirmDelete(_) => vec!["Enter: Confirm".to_string(), "Esc: Cancel".to_string()],
            Mode::Help => vec!["Any key: Close".to_string()],
        }
    }
}

fn step_category(current: Option<Category>, forward: bool) -> Option<Category> {
    if forward {
        Category::next_optional(current)
    } else {
        Category::prev_optional(current)
    }
}
