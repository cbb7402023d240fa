use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a task, based on UUID v7 so ids created in the same
/// millisecond still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: high sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Display label used in the task list
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "高",
            Priority::Medium => "中",
            Priority::Low => "低",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::High => Priority::Low,
            Priority::Medium => Priority::High,
            Priority::Low => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Shopping,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Shopping];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Shopping => "shopping",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "仕事",
            Category::Personal => "個人",
            Category::Shopping => "買い物",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Category::Work => Category::Personal,
            Category::Personal => Category::Shopping,
            Category::Shopping => Category::Work,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Category::Work => Category::Shopping,
            Category::Personal => Category::Work,
            Category::Shopping => Category::Personal,
        }
    }

    /// Step forward through "no category" and then each category in turn.
    pub fn next_optional(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Category::Work),
            Some(Category::Shopping) => None,
            Some(category) => Some(category.next()),
        }
    }

    pub fn prev_optional(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Category::Shopping),
            Some(Category::Work) => None,
            Some(category) => Some(category.prev()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "shopping" => Ok(Category::Shopping),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: String) -> Self {
        Self {
            id: CommentId::new(),
            text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>, // serialized as YYYY-MM-DD
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Task {
    pub fn new(title: String) -> Self {
        Self {
            id: TaskId::new(),
            title,
            completed: false,
            priority: Priority::default(),
            category: None,
            due_date: None,
            comments: Vec::new(),
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority: Priority::default(),
            category: None,
            due_date: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Replacement values for an in-place edit. Identity, completion and
/// comments are never part of an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: String,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: Option<NaiveDate>,
}

impl TaskEdit {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            priority,
            category: None,
            due_date: None,
        }
    }
}

fn seed_task(
    title: &str,
    priority: Priority,
    category: Category,
    due: (i32, u32, u32),
    completed: bool,
) -> Task {
    Task {
        completed,
        priority,
        category: Some(category),
        due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2),
        ..Task::new(title.to_string())
    }
}

/// Initial state: one task per priority, in priority order.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        seed_task("買い物に行く", Priority::High, Category::Shopping, (2025, 9, 15), false),
        seed_task("レポートを提出する", Priority::Medium, Category::Work, (2025, 9, 16), false),
        seed_task("運動する", Priority::Low, Category::Personal, (2025, 9, 15), true),
    ]
}
