use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::Theme;
use crate::models::Task;
use crate::tui::widgets::color::{parse_color, priority_color};
use crate::tui::widgets::editor::LineCursor;
use crate::view::Features;
use crate::Config;

pub const NO_COMMENTS: &str = "No comments yet.";
pub const COMMENT_PLACEHOLDER: &str = "Add a comment...";

fn field_line(name: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", name), Style::default().add_modifier(Modifier::BOLD)),
        value,
    ])
}

/// Detail lines of a task, followed by its comments when comments are enabled
pub fn detail_lines(task: &Task, features: &Features, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        field_line("Title", Span::raw(task.title.clone())),
        field_line(
            "Status",
            Span::raw(if task.completed { "完了" } else { "未完了" }),
        ),
        field_line(
            "Priority",
            Span::styled(
                task.priority.label(),
                Style::default().fg(priority_color(theme, task.priority)),
            ),
        ),
    ];
    if features.categories {
        let category = task.category.map(|c| c.label()).unwrap_or("-");
        lines.push(field_line("Category", Span::raw(category)));
    }
    if features.due_dates {
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(field_line("Due", Span::raw(due)));
    }

    if features.comments {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("Comments ({})", task.comments.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if task.comments.is_empty() {
            lines.push(Line::styled(NO_COMMENTS, Style::default().add_modifier(Modifier::DIM)));
        }
        for comment in &task.comments {
            let stamp = comment.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", stamp), Style::default().add_modifier(Modifier::DIM)),
                Span::raw(comment.text.clone()),
            ]));
        }
    }
    lines
}

/// Render the selected task. `comment_cursor` is set while the comment
/// input has focus.
pub fn render_item_view(
    f: &mut Frame,
    area: Rect,
    task: Option<&Task>,
    comment_input: &str,
    comment_cursor: Option<LineCursor>,
    config: &Config,
) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let theme = config.get_active_theme();
    let base_style = Style::default().fg(parse_color(&theme.fg));

    let Some(task) = task else {
        let paragraph = Paragraph::new("Select a task to view details")
            .block(Block::default().borders(Borders::ALL).title("Task"))
            .style(base_style);
        f.render_widget(paragraph, area);
        return;
    };

    let show_input = config.features.comments && area.height >= 8;
    let (details_area, input_area) = if show_input {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let paragraph = Paragraph::new(Text::from(detail_lines(task, &config.features, &theme)))
        .block(Block::default().borders(Borders::ALL).title("Task"))
        .style(base_style)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, details_area);

    if let Some(input_area) = input_area {
        let focused = comment_cursor.is_some();
        let content = if comment_input.is_empty() && !focused {
            Span::styled(COMMENT_PLACEHOLDER, Style::default().add_modifier(Modifier::DIM))
        } else {
            Span::raw(comment_input.to_string())
        };
        let border_style = if focused {
            Style::default().fg(parse_color(&theme.highlight_bg))
        } else {
            base_style
        };
        let input = Paragraph::new(Line::from(content)).style(base_style).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Comment")
                .border_style(border_style),
        );
        f.render_widget(input, input_area);

        if let Some(cursor) = comment_cursor {
            let x = input_area.x + 1 + cursor.display_offset(comment_input);
            let max_x = input_area.x + input_area.width.saturating_sub(2);
            f.set_cursor_position((x.min(max_x), input_area.y + 1));
        }
    }
}
