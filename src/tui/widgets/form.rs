use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::drafts::{EditDraft, NewTaskForm};
use crate::models::{Category, Priority};
use crate::tui::app::FormField;
use crate::tui::widgets::color::{parse_color, priority_color};
use crate::tui::widgets::editor::LineCursor;
use crate::tui::widgets::popup_area;
use crate::Config;

/// Field values shown by the add and edit forms
#[derive(Debug, Clone, Copy)]
pub struct FormValues<'a> {
    pub title: &'a str,
    pub priority: Priority,
    pub category: Option<Category>,
    pub due_date: &'a str,
}

impl<'a> From<&'a NewTaskForm> for FormValues<'a> {
    fn from(form: &'a NewTaskForm) -> Self {
        Self {
            title: &form.title,
            priority: form.priority,
            category: form.category,
            due_date: &form.due_date,
        }
    }
}

impl<'a> From<&'a EditDraft> for FormValues<'a> {
    fn from(draft: &'a EditDraft) -> Self {
        Self {
            title: &draft.title,
            priority: draft.priority,
            category: draft.category,
            due_date: &draft.due_date,
        }
    }
}

const CATEGORY_CHOICES: [Option<Category>; 4] = [
    None,
    Some(Category::Work),
    Some(Category::Personal),
    Some(Category::Shopping),
];

fn category_label(category: Option<Category>) -> Span<'static> {
    Span::raw(category.map_or("なし", Category::label))
}

/// Choice fields show every option with the current one bracketed
fn choice_line<T: Copy + PartialEq>(options: &[T], current: Option<T>, label: impl Fn(T) -> Span<'static>) -> Line<'static> {
    let mut spans = Vec::new();
    for option in options {
        let span = label(*option);
        if Some(*option) == current {
            spans.push(Span::styled(
                format!("[{}]", span.content),
                span.style.add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {} ", span.content), span.style));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

pub fn render_task_form(
    f: &mut Frame,
    area: Rect,
    heading: &str,
    values: FormValues<'_>,
    active: FormField,
    cursor: LineCursor,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let active_border = Style::default().fg(parse_color(&theme.highlight_bg));
    let inactive_border = Style::default().fg(fg).add_modifier(Modifier::DIM);

    let fields = FormField::visible(&config.features);
    let height = (fields.len() as u16) * 3 + 2;
    let popup = popup_area(area, 70, 100);
    let popup = Rect::new(
        popup.x,
        popup.y + popup.height.saturating_sub(height) / 2,
        popup.width,
        height.min(popup.height),
    );
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(heading.to_string())
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)))
        .split(inner);

    for (field, field_area) in fields.iter().zip(field_areas.iter()) {
        let is_active = *field == active;
        let line = match field {
            FormField::Title => Line::raw(values.title.to_string()),
            FormField::DueDate => Line::raw(values.due_date.to_string()),
            FormField::Priority => choice_line(&Priority::ALL, Some(values.priority), |p| {
                Span::styled(p.label(), Style::default().fg(priority_color(&theme, p)))
            }),
            FormField::Category => choice_line(&CATEGORY_CHOICES, Some(values.category), category_label),
        };
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title(field.label())
                .border_style(if is_active { active_border } else { inactive_border }),
        );
        f.render_widget(paragraph, *field_area);

        if is_active && field.is_text() {
            let text = if *field == FormField::Title { values.title } else { values.due_date };
            let x = field_area.x + 1 + cursor.display_offset(text);
            let max_x = field_area.x + field_area.width.saturating_sub(2);
            f.set_cursor_position((x.min(max_x), field_area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn choice_line_brackets_current_value() {
        let line = choice_line(&Priority::ALL, Some(Priority::Medium), |p| Span::raw(p.label()));
        assert_eq!(line_text(&line), " 高  [中]  低  ");
    }

    #[test]
    fn edit_draft_without_category_selects_none() {
        let draft = EditDraft {
            title: "x".to_string(),
            priority: Priority::Low,
            category: None,
            due_date: String::new(),
        };
        let values = FormValues::from(&draft);
        let line = choice_line(&CATEGORY_CHOICES, Some(values.category), category_label);
        assert_eq!(line_text(&line), "[なし]  仕事   個人   買い物  ");
    }

    #[test]
    fn new_task_form_starts_without_category() {
        let form = NewTaskForm::default();
        let values = FormValues::from(&form);
        assert_eq!(values.category, None);
        let line = choice_line(&CATEGORY_CHOICES, Some(values.category), category_label);
        assert!(line_text(&line).starts_with("[なし]"));
    }
}
