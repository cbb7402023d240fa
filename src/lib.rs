pub mod cli;
pub mod config;
pub mod drafts;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;
pub mod view;

pub use config::Config;
pub use drafts::{CommentDrafts, DraftError, EditDraft, EditSessions, NewTaskForm};
pub use models::{Category, Comment, NewTask, Priority, Task, TaskEdit, TaskId};
pub use store::{Action, TaskStore};
pub use utils::Profile;
pub use view::{project, Features, Filter, SortBy, SortControl, ViewSettings};
