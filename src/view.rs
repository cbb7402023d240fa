//! Display projection of the task list.
//!
//! The projection is recomputed from the canonical list on every change and
//! never writes back. Filtering happens before sorting and both sorts are
//! stable, so equal keys keep their store order.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Default,
    #[default]
    Priority,
    DueDate,
}

impl SortBy {
    pub fn label(self) -> &'static str {
        match self {
            SortBy::Default => "Default",
            SortBy::Priority => "Priority",
            SortBy::DueDate => "Due Date",
        }
    }

    /// Next mode among the ones the features allow, wrapping around
    pub fn cycle(self, features: &Features) -> Self {
        let modes = features.sort_modes();
        match modes.iter().position(|mode| *mode == self) {
            Some(index) => modes[(index + 1) % modes.len()],
            None => modes.first().copied().unwrap_or(SortBy::Default),
        }
    }
}

/// A filter that either keeps everything or only one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq + Copy> Filter<T> {
    pub fn matches(&self, value: Option<T>) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => value == Some(*wanted),
        }
    }
}

impl Filter<Priority> {
    /// All -> High -> Medium -> Low -> All
    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Only(Priority::High),
            Filter::Only(Priority::Low) => Filter::All,
            Filter::Only(p) => Filter::Only(p.next()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Filter::All => "All Priorities".to_string(),
            Filter::Only(p) => p.label().to_string(),
        }
    }
}

impl Filter<Category> {
    /// All -> Work -> Personal -> Shopping -> All
    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Only(Category::Work),
            Filter::Only(Category::Shopping) => Filter::All,
            Filter::Only(c) => Filter::Only(c.next()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Filter::All => "All Categories".to_string(),
            Filter::Only(c) => c.label().to_string(),
        }
    }
}

/// How the sort can be controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortControl {
    /// Choose between default order, priority and due date
    #[default]
    Selectable,
    /// Priority sort switched on or off
    Toggle,
    /// Always sorted by priority
    Always,
}

/// Capability flags for the optional parts of the task model and view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "enabled")]
    pub categories: bool,
    #[serde(default = "enabled")]
    pub due_dates: bool,
    #[serde(default = "enabled")]
    pub comments: bool,
    #[serde(default = "enabled")]
    pub filters: bool,
    #[serde(default)]
    pub sort: SortControl,
}

fn enabled() -> bool {
    true
}

impl Default for Features {
    fn default() -> Self {
        Self {
            categories: true,
            due_dates: true,
            comments: true,
            filters: true,
            sort: SortControl::default(),
        }
    }
}

impl Features {
    /// Title and priority only, always sorted by priority
    pub fn minimal() -> Self {
        Self {
            categories: false,
            due_dates: false,
            comments: false,
            filters: false,
            sort: SortControl::Always,
        }
    }

    pub fn sort_modes(&self) -> Vec<SortBy> {
        match self.sort {
            SortControl::Always => vec![SortBy::Priority],
            SortControl::Toggle => vec![SortBy::Default, SortBy::Priority],
            SortControl::Selectable if self.due_dates => {
                vec![SortBy::Default, SortBy::Priority, SortBy::DueDate]
            }
            SortControl::Selectable => vec![SortBy::Default, SortBy::Priority],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub filter_priority: Filter<Priority>,
    #[serde(default)]
    pub filter_category: Filter<Category>,
    #[serde(default = "enabled")]
    pub show_completed: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Priority,
            filter_priority: Filter::All,
            filter_category: Filter::All,
            show_completed: true,
        }
    }
}

impl ViewSettings {
    /// Settings that show every task in store order
    pub fn unsorted() -> Self {
        Self {
            sort_by: SortBy::Default,
            ..Self::default()
        }
    }

    /// Clamp the settings to what the features allow.
    pub fn constrained(&self, features: &Features) -> Self {
        let mut settings = *self;
        if !features.filters {
            settings.filter_priority = Filter::All;
            settings.filter_category = Filter::All;
            settings.show_completed = true;
        }
        if !features.categories {
            settings.filter_category = Filter::All;
        }
        if !features.sort_modes().contains(&settings.sort_by) {
            settings.sort_by = match features.sort {
                SortControl::Always => SortBy::Priority,
                _ => SortBy::Default,
            };
        }
        settings
    }

    pub fn summary(&self) -> String {
        format!(
            "Sort: {} | {} | {} | Completed: {}",
            self.sort_by.label(),
            self.filter_priority.label(),
            self.filter_category.label(),
            if self.show_completed { "shown" } else { "hidden" },
        )
    }
}

/// Missing due dates order after every dated task.
pub fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and sort the tasks for display.
pub fn project<'a>(tasks: &'a [Task], settings: &ViewSettings) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| settings.show_completed || !task.completed)
        .filter(|task| settings.filter_priority.matches(Some(task.priority)))
        .filter(|task| settings.filter_category.matches(task.category))
        .collect();

    // slice::sort_by is stable
    match settings.sort_by {
        SortBy::Priority => visible.sort_by_key(|task| task.priority.rank()),
        SortBy::DueDate => visible.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date)),
        SortBy::Default => {}
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed_tasks, NewTask};
    use crate::store;

    fn titles(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.title.clone()).collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn seed_projection_keeps_seed_order() {
        let seed = seed_tasks();
        let view = project(&seed, &ViewSettings::default());
        assert_eq!(titles(&view), vec!["買い物に行く", "レポートを提出する", "運動する"]);
    }

    #[test]
    fn hiding_completed_drops_them() {
        let seed = seed_tasks();
        let settings = ViewSettings {
            show_completed: false,
            ..ViewSettings::default()
        };
        let view = project(&seed, &settings);
        assert_eq!(titles(&view), vec!["買い物に行く", "レポートを提出する"]);
    }

    #[test]
    fn priority_and_category_filters_combine() {
        let seed = seed_tasks();
        let tasks = store::add(&seed, NewTask::new("牛乳").priority(Priority::High).category(Category::Shopping));
        let settings = ViewSettings {
            filter_priority: Filter::Only(Priority::High),
            filter_category: Filter::Only(Category::Shopping),
            ..ViewSettings::default()
        };
        assert_eq!(titles(&project(&tasks, &settings)), vec!["買い物に行く", "牛乳"]);

        let work_only = ViewSettings {
            filter_category: Filter::Only(Category::Work),
            ..ViewSettings::default()
        };
        assert_eq!(titles(&project(&tasks, &work_only)), vec!["レポートを提出する"]);
    }

    #[test]
    fn uncategorized_task_only_matches_all() {
        let tasks = store::add(&[], NewTask::new("loose"));
        let settings = ViewSettings {
            filter_category: Filter::Only(Category::Personal),
            ..ViewSettings::default()
        };
        assert!(project(&tasks, &settings).is_empty());
        assert_eq!(project(&tasks, &ViewSettings::default()).len(), 1);
    }

    #[test]
    fn due_date_sort_puts_undated_last() {
        let mut tasks = Vec::new();
        tasks = store::add(&tasks, NewTask::new("X").due_date(date("2025-09-16")));
        tasks = store::add(&tasks, NewTask::new("Y"));
        tasks = store::add(&tasks, NewTask::new("Z").due_date(date("2025-09-15")));
        tasks = store::add(&tasks, NewTask::new("W"));
        let settings = ViewSettings {
            sort_by: SortBy::DueDate,
            ..ViewSettings::default()
        };
        assert_eq!(titles(&project(&tasks, &settings)), vec!["Z", "X", "Y", "W"]);
    }

    #[test]
    fn default_sort_follows_store_order() {
        let seed = seed_tasks();
        let tasks = store::add(&seed, NewTask::new("first?").priority(Priority::High));
        let view = project(&tasks, &ViewSettings::unsorted());
        assert_eq!(view.last().map(|t| t.title.as_str()), Some("first?"));
    }

    #[test]
    fn compare_due_dates_orders_none_greatest() {
        let d = Some(date("2025-01-01"));
        assert_eq!(compare_due_dates(d, None), Ordering::Less);
        assert_eq!(compare_due_dates(None, d), Ordering::Greater);
        assert_eq!(compare_due_dates(None, None), Ordering::Equal);
    }

    #[test]
    fn sort_modes_follow_sort_control() {
        let mut features = Features::default();
        assert_eq!(features.sort_modes().len(), 3);
        features.due_dates = false;
        assert_eq!(features.sort_modes(), vec![SortBy::Default, SortBy::Priority]);
        features.sort = SortControl::Always;
        assert_eq!(features.sort_modes(), vec![SortBy::Priority]);
    }

    #[test]
    fn cycle_wraps_through_allowed_modes() {
        let features = Features::default();
        assert_eq!(SortBy::Default.cycle(&features), SortBy::Priority);
        assert_eq!(SortBy::Priority.cycle(&features), SortBy::DueDate);
        assert_eq!(SortBy::DueDate.cycle(&features), SortBy::Default);

        let toggle = Features {
            sort: SortControl::Toggle,
            ..Features::default()
        };
        assert_eq!(SortBy::Priority.cycle(&toggle), SortBy::Default);
        assert_eq!(SortBy::DueDate.cycle(&toggle), SortBy::Default);
    }

    #[test]
    fn constrained_clamps_disabled_features() {
        let settings = ViewSettings {
            sort_by: SortBy::DueDate,
            filter_priority: Filter::Only(Priority::Low),
            filter_category: Filter::Only(Category::Work),
            show_completed: false,
        };
        let minimal = settings.constrained(&Features::minimal());
        assert_eq!(minimal.sort_by, SortBy::Priority);
        assert_eq!(minimal.filter_priority, Filter::All);
        assert_eq!(minimal.filter_category, Filter::All);
        assert!(minimal.show_completed);

        let toggle = Features {
            sort: SortControl::Toggle,
            ..Features::default()
        };
        assert_eq!(settings.constrained(&toggle).sort_by, SortBy::Default);
        assert_eq!(settings.constrained(&Features::default()), settings);
    }

    #[test]
    fn filter_cycles_return_to_all() {
        let mut filter = Filter::<Priority>::All;
        for _ in 0..4 {
            filter = filter.cycle();
        }
        assert_eq!(filter, Filter::All);

        let mut filter = Filter::<Category>::All;
        filter = filter.cycle();
        assert_eq!(filter, Filter::Only(Category::Work));
    }

    #[test]
    fn settings_deserialize_from_toml() {
        let settings: ViewSettings = toml::from_str(
            r#"
            sort_by = "due_date"
            show_completed = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.sort_by, SortBy::DueDate);
        assert!(!settings.show_completed);
        assert_eq!(settings.filter_priority, Filter::All);
    }
}
