use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Terminal cells taken by `text`; wide characters count as two
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(display_width(ELLIPSIS));
    let mut kept = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let width = display_width(ch.encode_utf8(&mut [0; 4]));
        if used + width > budget {
            break;
        }
        used += width;
        kept.push(ch);
    }
    kept + ELLIPSIS
}

/// Join as many hints as fit in `max_width`, ending with an ellipsis when
/// some had to be dropped
pub fn fit_key_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for hint in key_hints {
        let candidate = if text.is_empty() {
            hint.clone()
        } else {
            format!("{}{}{}", text, SEPARATOR, hint)
        };
        if display_width(&candidate) > max_width {
            if text.is_empty() {
                return truncate(hint, max_width);
            }
            return truncate(&format!("{}{}", text, ELLIPSIS), max_width);
        }
        text = candidate;
    }
    text
}

pub fn render_status_bar(f: &mut Frame, area: Rect, message: Option<&str>, key_hints: &[String], config: &Config) {
    let theme = config.get_active_theme();
    let max_width = area.width as usize;

    let (content, style) = match message {
        // Messages stand out on the highlight color
        Some(msg) => {
            let highlight_bg = parse_color(&theme.highlight_bg);
            (
                truncate(msg, max_width),
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_key_hints(key_hints, max_width),
            Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["n: New".to_string(), "e: Edit".to_string(), "q: Quit".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_key_hints(&hints(), 80), "n: New • e: Edit • q: Quit");
    }

    #[test]
    fn overflowing_hints_get_ellipsis() {
        assert_eq!(fit_key_hints(&hints(), 20), "n: New • e: Edit...");
        assert_eq!(fit_key_hints(&hints(), 4), "n...");
    }

    #[test]
    fn wide_characters_are_measured_in_cells() {
        let hints = vec!["Enter: 追加".to_string(), "Esc: キャンセル".to_string()];
        // 22 chars but 29 cells
        assert_eq!(fit_key_hints(&hints, 25), "Enter: 追加...");
        assert_eq!(fit_key_hints(&hints, 29), "Enter: 追加 • Esc: キャンセル");
    }

    #[test]
    fn truncation_never_splits_a_wide_character() {
        let hints = vec!["Esc: キャンセル".to_string()];
        assert_eq!(fit_key_hints(&hints, 8), "Esc: ...");
        assert_eq!(fit_key_hints(&hints, 9), "Esc: ...");
        assert_eq!(fit_key_hints(&hints, 10), "Esc: キ...");
        assert_eq!(truncate("買い物に行く", 7), "買い...");
    }
}
