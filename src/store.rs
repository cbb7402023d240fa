//! Canonical task state and its mutations.
//!
//! Every operation takes the current ordered list and returns a new one; the
//! input is never mutated. Unknown ids and blank input are no-ops, so every
//! operation is total.

use crate::models::{Comment, NewTask, Task, TaskEdit, TaskId};

/// A single mutation of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(NewTask),
    ToggleComplete(TaskId),
    Edit { id: TaskId, changes: TaskEdit },
    Delete(TaskId),
    AddComment { task_id: TaskId, text: String },
}

/// Append a new task. New tasks always go to the end; ordering by priority is
/// a view concern.
pub fn add(tasks: &[Task], new_task: NewTask) -> Vec<Task> {
    let title = new_task.title.trim();
    if title.is_empty() {
        return tasks.to_vec();
    }

    let mut task = Task::new(title.to_string());
    task.priority = new_task.priority;
    task.category = new_task.category;
    task.due_date = new_task.due_date;

    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(task);
    next
}

pub fn toggle_complete(tasks: &[Task], id: TaskId) -> Vec<Task> {
    update_where(tasks, id, |task| task.completed = !task.completed)
}

/// Replace the editable fields of a task in place. The title is stored as
/// given; callers validate it.
pub fn edit(tasks: &[Task], id: TaskId, changes: TaskEdit) -> Vec<Task> {
    update_where(tasks, id, |task| {
        task.title = changes.title.clone();
        task.priority = changes.priority;
        task.category = changes.category;
        task.due_date = changes.due_date;
    })
}

/// Remove a task together with its comments.
pub fn delete(tasks: &[Task], id: TaskId) -> Vec<Task> {
    tasks.iter().filter(|task| task.id != id).cloned().collect()
}

pub fn add_comment(tasks: &[Task], task_id: TaskId, text: &str) -> Vec<Task> {
    let text = text.trim();
    if text.is_empty() {
        return tasks.to_vec();
    }
    update_where(tasks, task_id, |task| {
        task.comments.push(Comment::new(text.to_string()));
    })
}

pub fn reduce(tasks: &[Task], action: Action) -> Vec<Task> {
    match action {
        Action::Add(new_task) => add(tasks, new_task),
        Action::ToggleComplete(id) => toggle_complete(tasks, id),
        Action::Edit { id, changes } => edit(tasks, id, changes),
        Action::Delete(id) => delete(tasks, id),
        Action::AddComment { task_id, text } => add_comment(tasks, task_id, &text),
    }
}

fn update_where(tasks: &[Task], id: TaskId, mut update: impl FnMut(&mut Task)) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            let mut task = task.clone();
            if task.id == id {
                update(&mut task);
            }
            task
        })
        .collect()
}

/// Owner of the canonical task list.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Store initialized with the seed tasks
    pub fn seeded() -> Self {
        Self::new(crate::models::seed_tasks())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Apply an action and report whether the canonical state changed.
    pub fn apply(&mut self, action: Action) -> bool {
        tracing::debug!(?action, "applying action");
        let next = reduce(&self.tasks, action);
        let changed = next != self.tasks;
        if changed {
            self.tasks = next;
        } else {
            tracing::debug!("action was a no-op");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed_tasks, Category, Priority};
    use chrono::NaiveDate;

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn add_appends_with_defaults() {
        let seed = seed_tasks();
        let next = add(&seed, NewTask::new("新しいタスク"));
        assert_eq!(next.len(), seed.len() + 1);
        let added = &next[3];
        assert_eq!(added.title, "新しいタスク");
        assert_eq!(added.priority, Priority::Medium);
        assert!(!added.completed);
        assert!(added.comments.is_empty());
        assert_eq!(&next[..3], &seed[..]);
    }

    #[test]
    fn add_trims_title_and_keeps_optional_fields() {
        let due = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let next = add(
            &[],
            NewTask::new("  buy milk ")
                .priority(Priority::High)
                .category(Category::Shopping)
                .due_date(due),
        );
        assert_eq!(next[0].title, "buy milk");
        assert_eq!(next[0].category, Some(Category::Shopping));
        assert_eq!(next[0].due_date, Some(due));
    }

    #[test]
    fn add_blank_title_is_noop() {
        let seed = seed_tasks();
        assert_eq!(add(&seed, NewTask::new("   ")), seed);
        assert_eq!(add(&seed, NewTask::new("")), seed);
    }

    #[test]
    fn add_high_priority_still_appends() {
        let seed = seed_tasks();
        let next = add(&seed, NewTask::new("urgent").priority(Priority::High));
        assert_eq!(next.last().map(|t| t.title.as_str()), Some("urgent"));
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let seed = seed_tasks();
        let next = toggle_complete(&seed, seed[0].id);
        assert!(next[0].completed);
        assert_eq!(next[1], seed[1]);
        let back = toggle_complete(&next, seed[0].id);
        assert_eq!(back, seed);
    }

    #[test]
    fn unknown_id_is_noop_for_every_operation() {
        let seed = seed_tasks();
        let ghost = TaskId::new();
        assert_eq!(toggle_complete(&seed, ghost), seed);
        assert_eq!(edit(&seed, ghost, TaskEdit::new("x", Priority::Low)), seed);
        assert_eq!(delete(&seed, ghost), seed);
        assert_eq!(add_comment(&seed, ghost, "hello"), seed);
    }

    #[test]
    fn edit_preserves_identity_completion_and_comments() {
        let seed = seed_tasks();
        let target = seed[2].id;
        let with_comment = add_comment(&seed, target, "done twice");
        let edited = edit(
            &with_comment,
            target,
            TaskEdit::new("ジョギング", Priority::High),
        );
        let task = &edited[2];
        assert_eq!(task.id, target);
        assert_eq!(task.title, "ジョギング");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
        assert_eq!(task.comments, with_comment[2].comments);
        assert_eq!(task.category, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn edit_accepts_empty_title() {
        let seed = seed_tasks();
        let edited = edit(&seed, seed[0].id, TaskEdit::new("", Priority::High));
        assert_eq!(edited[0].title, "");
    }

    #[test]
    fn delete_removes_exactly_one() {
        let seed = seed_tasks();
        let id = seed[1].id;
        let next = delete(&seed, id);
        assert_eq!(next.len(), seed.len() - 1);
        assert!(next.iter().all(|t| t.id != id));
        assert_eq!(titles(&next), vec!["買い物に行く", "運動する"]);
    }

    #[test]
    fn comments_append_in_order() {
        let seed = seed_tasks();
        let id = seed[0].id;
        let once = add_comment(&seed, id, "first");
        let twice = add_comment(&once, id, "  second  ");
        let comments = &twice[0].comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "first");
        assert_eq!(comments[1].text, "second");
        assert_ne!(comments[0].id, comments[1].id);
        assert!(comments[0].created_at <= comments[1].created_at);
    }

    #[test]
    fn whitespace_comment_is_rejected() {
        let seed = seed_tasks();
        assert_eq!(add_comment(&seed, seed[0].id, "   "), seed);
    }

    #[test]
    fn input_is_never_mutated() {
        let seed = seed_tasks();
        let snapshot = seed.clone();
        let _ = reduce(&seed, Action::Delete(seed[0].id));
        let _ = reduce(&seed, Action::ToggleComplete(seed[1].id));
        assert_eq!(seed, snapshot);
    }

    #[test]
    fn store_apply_reports_changes() {
        let mut store = TaskStore::seeded();
        let id = store.tasks()[0].id;
        assert!(store.apply(Action::ToggleComplete(id)));
        assert!(store.get(id).is_some_and(|t| t.completed));
        assert!(!store.apply(Action::Delete(TaskId::new())));
        assert!(store.apply(Action::Delete(id)));
        assert!(store.get(id).is_none());
        assert_eq!(store.len(), 2);
    }
}
