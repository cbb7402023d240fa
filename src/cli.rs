use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::models::{Category, Priority, Task};
use crate::store::TaskStore;
use crate::view::{self, Features, Filter, SortBy, ViewSettings};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo Sample - a small terminal task list")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses a separate dev config)
    #[arg(long)]
    pub dev: bool,

    /// Theme to use instead of the configured one (default, dark, light or a config theme)
    #[arg(long)]
    pub theme: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to todo-sample.log in the temp directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Default,
    Priority,
    DueDate,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Default => SortBy::Default,
            SortArg::Priority => SortBy::Priority,
            SortArg::DueDate => SortBy::DueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Work,
    Personal,
    Shopping,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Work => Category::Work,
            CategoryArg::Personal => Category::Personal,
            CategoryArg::Shopping => Category::Shopping,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Print the task list as it would be displayed
    List {
        /// Sort mode (defaults to the configured one)
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        /// Only show tasks with this priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// Only show tasks in this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Hide completed tasks
        #[arg(long)]
        hide_completed: bool,
        /// Print JSON instead of one line per task
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
    #[error("Failed to serialize tasks: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Options of the list command after parsing
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort: Option<SortArg>,
    pub priority: Option<PriorityArg>,
    pub category: Option<CategoryArg>,
    pub hide_completed: bool,
    pub json: bool,
}

/// Turn list options into view settings on top of the configured defaults
pub fn build_view_settings(
    options: &ListOptions,
    base: &ViewSettings,
    features: &Features,
) -> ViewSettings {
    let mut settings = *base;
    if let Some(sort) = options.sort {
        settings.sort_by = sort.into();
    }
    if let Some(priority) = options.priority {
        settings.filter_priority = Filter::Only(priority.into());
    }
    if let Some(category) = options.category {
        settings.filter_category = Filter::Only(category.into());
    }
    if options.hide_completed {
        settings.show_completed = false;
    }
    settings.constrained(features)
}

/// One display line per task
pub fn format_task_line(task: &Task, features: &Features) -> String {
    let mut line = format!(
        "[{}] {} ({})",
        if task.completed { "x" } else { " " },
        task.title,
        task.priority.label()
    );
    if features.categories {
        if let Some(category) = task.category {
            line.push_str(&format!(" #{}", category));
        }
    }
    if features.due_dates {
        if let Some(due) = task.due_date {
            line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
        }
    }
    if features.comments && !task.comments.is_empty() {
        line.push_str(&format!(" [{} comments]", task.comments.len()));
    }
    line
}

/// Handle the list command
pub fn handle_list(
    options: &ListOptions,
    store: &TaskStore,
    base: &ViewSettings,
    features: &Features,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let settings = build_view_settings(options, base, features);
    let projected = view::project(store.tasks(), &settings);

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &projected)?;
        writeln!(out)?;
    } else {
        for task in projected {
            writeln!(out, "{}", format_task_line(task, features))?;
        }
    }

    Ok(())
}
