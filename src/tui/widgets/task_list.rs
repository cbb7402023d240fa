use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
};
use ratatui::Frame;

use crate::config::Theme;
use crate::drafts::EditSessions;
use crate::models::Task;
use crate::tui::widgets::color::{parse_color, priority_color};
use crate::view::Features;
use crate::Config;

/// Spans of one row: checkbox, title, priority label and whatever the
/// enabled features add (category, due date, comment count).
pub fn task_row_spans(task: &Task, features: &Features, theme: &Theme, editing: bool) -> Vec<Span<'static>> {
    let title_style = if task.completed {
        Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(if task.completed { "[x] " } else { "[ ] " }),
        Span::styled(task.title.clone(), title_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority.label()),
            Style::default().fg(priority_color(theme, task.priority)),
        ),
    ];

    if features.categories {
        if let Some(category) = task.category {
            spans.push(Span::raw(format!(" {}", category.label())));
        }
    }
    if features.due_dates {
        if let Some(due) = task.due_date {
            spans.push(Span::raw(format!(" {}", due.format("%Y-%m-%d"))));
        }
    }
    if features.comments && !task.comments.is_empty() {
        spans.push(Span::raw(format!(" 💬{}", task.comments.len())));
    }
    if editing {
        spans.push(Span::raw(" ✎"));
    }
    spans
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[&Task],
    total_count: usize,
    list_state: &mut ListState,
    config: &Config,
    edits: &EditSessions,
) {
    let theme = config.get_active_theme();
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let spans = task_row_spans(task, &config.features, &theme, edits.is_editing(task.id));
            ListItem::new(Line::from(spans))
        })
        .collect();
    let total_items = items.len();

    // Reserve a column for the scrollbar
    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let title = format!("Tasks ({} of {})", total_items, total_count);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(parse_color(&theme.fg)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let visible_items = list_area.height.saturating_sub(2) as usize;
    if total_items > visible_items && scrollbar_area.width > 0 && visible_items > 0 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1, // below the top border
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = selected_index.saturating_sub(visible_items - 1);
        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_tasks;

    fn row_text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn row_shows_enabled_metadata() {
        let tasks = seed_tasks();
        let spans = task_row_spans(&tasks[0], &Features::default(), &Theme::default(), false);
        assert_eq!(row_text(&spans), "[ ] 買い物に行く [高] 買い物 2025-09-15");
    }

    #[test]
    fn completed_row_is_struck_through() {
        let tasks = seed_tasks();
        let spans = task_row_spans(&tasks[2], &Features::default(), &Theme::default(), true);
        assert!(row_text(&spans).starts_with("[x] 運動する"));
        assert!(row_text(&spans).ends_with(" ✎"));
        assert!(spans[1].style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn minimal_features_hide_metadata() {
        let tasks = seed_tasks();
        let spans = task_row_spans(&tasks[1], &Features::minimal(), &Theme::default(), false);
        assert_eq!(row_text(&spans), "[ ] レポートを提出する [中]");
    }
}
