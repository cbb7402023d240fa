use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display;
use crate::Config;

pub fn render_filters_box(f: &mut Frame, area: Rect, summary: &str, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);

    let kb = &config.key_bindings;
    let title = if config.features.filters {
        format!(
            "{}: Sort  {}/{}/{}: Filters",
            format_key_binding_for_display(&kb.sort),
            format_key_binding_for_display(&kb.filter_priority),
            format_key_binding_for_display(&kb.filter_category),
            format_key_binding_for_display(&kb.toggle_completed),
        )
    } else {
        format!("{}: Sort", format_key_binding_for_display(&kb.sort))
    };

    let paragraph = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
