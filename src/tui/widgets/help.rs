use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

/// Help text for the configured bindings; sections for disabled features are left out
pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let features = &config.features;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {} or ↑/↓: Move selection\n", display(&kb.list_up), display(&kb.list_down)));
    text.push('\n');

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {}: New task\n", display(&kb.new)));
    text.push_str(&format!("  {} or Enter: Edit selected task\n", display(&kb.edit)));
    text.push_str(&format!("  {}: Toggle completed\n", display(&kb.toggle)));
    text.push_str(&format!("  {}: Delete selected task\n", display(&kb.delete)));
    if features.comments {
        text.push_str(&format!("  {}: Comment on selected task\n", display(&kb.comment)));
    }
    text.push('\n');

    text.push_str("View:\n");
    text.push_str(&format!("  {}: Change sort order\n", display(&kb.sort)));
    if features.filters {
        text.push_str(&format!("  {}: Cycle priority filter\n", display(&kb.filter_priority)));
        if features.categories {
            text.push_str(&format!("  {}: Cycle category filter\n", display(&kb.filter_category)));
        }
        text.push_str(&format!("  {}: Show/hide completed\n", display(&kb.toggle_completed)));
    }
    text.push('\n');

    text.push_str("Forms:\n");
    text.push_str("  Tab / Shift+Tab: Next/previous field\n");
    text.push_str("  ←/→: Change priority or category\n");
    text.push_str("  Enter: Save\n");
    text.push_str("  Esc: Close\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", display(&kb.quit)));
    text.push_str(&format!("  {}: Show help\n", display(&kb.help)));

    text
}
