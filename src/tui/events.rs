use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;

use crate::tui::app::Mode;
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::App;
use crate::utils::{parse_key_binding, ParsedKeyBinding};

/// Width of the task list as a share of the inner area
pub const LIST_WIDTH_PERCENT: u16 = 55;

/// Guard that ensures terminal state is restored even on panic.
/// A terminal left in raw mode or on the alternate screen is unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors are ignored, we're already in a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check the size before entering the alternate screen so the message
    // ends up in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::debug!(width, height, "terminal ready");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, LIST_WIDTH_PERCENT);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only Press events, Windows also reports Release
        if event::poll(std::time::Duration::from_millis(16))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    Ok(())
}

/// Route a key press to the handler of the current mode. Returns true when
/// the application should quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.ui.mode {
        Mode::View => handle_view_mode(app, key_event),
        Mode::Create | Mode::Edit(_) => handle_form_mode(app, key_event),
        Mode::Comment(_) => handle_comment_mode(app, key_event),
        Mode::ConfirmDelete(_) => handle_delete_confirmation_modal(app, key_event),
        Mode::Help => {
            app.exit_help_mode();
            Ok(false)
        }
    }
}

fn binding(key: &str) -> Result<ParsedKeyBinding, TuiError> {
    parse_key_binding(key).map_err(TuiError::KeyBindingError)
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let kb = app.config.key_bindings.clone();

    if matches_key_event(key_event, &binding(&kb.quit)?) {
        return Ok(true);
    }

    match key_event.code {
        KeyCode::Down => {
            app.move_selection_down();
            return Ok(false);
        }
        KeyCode::Up => {
            app.move_selection_up();
            return Ok(false);
        }
        KeyCode::Enter => {
            app.enter_edit_mode();
            return Ok(false);
        }
        _ => {}
    }

    if matches_key_event(key_event, &binding(&kb.list_down)?) {
        app.move_selection_down();
    } else if matches_key_event(key_event, &binding(&kb.list_up)?) {
        app.move_selection_up();
    } else if matches_key_event(key_event, &binding(&kb.new)?) {
        app.enter_create_mode();
    } else if matches_key_event(key_event, &binding(&kb.edit)?) {
        app.enter_edit_mode();
    } else if matches_key_event(key_event, &binding(&kb.delete)?) {
        app.request_delete();
    } else if matches_key_event(key_event, &binding(&kb.toggle)?) {
        app.toggle_selected();
    } else if matches_key_event(key_event, &binding(&kb.comment)?) {
        app.enter_comment_mode();
    } else if matches_key_event(key_event, &binding(&kb.sort)?) {
        app.cycle_sort();
    } else if matches_key_event(key_event, &binding(&kb.filter_priority)?) {
        app.cycle_priority_filter();
    } else if matches_key_event(key_event, &binding(&kb.filter_category)?) {
        app.cycle_category_filter();
    } else if matches_key_event(key_event, &binding(&kb.toggle_completed)?) {
        app.toggle_show_completed();
    } else if matches_key_event(key_event, &binding(&kb.help)?) {
        app.enter_help_mode();
    }

    Ok(false)
}

fn handle_form_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let creating = app.ui.mode == Mode::Create;
    match key_event.code {
        KeyCode::Esc => {
            if creating {
                app.exit_create_mode();
            } else {
                app.cancel_edit();
            }
        }
        KeyCode::Enter => {
            if creating {
                app.submit_create_form();
            } else {
                app.save_edit();
            }
        }
        KeyCode::Tab | KeyCode::Down => app.navigate_form_field(true),
        KeyCode::BackTab | KeyCode::Up => app.navigate_form_field(false),
        code if !app.ui.field.is_text() => match code {
            KeyCode::Left => app.cycle_choice(false),
            KeyCode::Right | KeyCode::Char(' ') => app.cycle_choice(true),
            _ => {}
        },
        _ => handle_text_input(app, key_event),
    }
    Ok(false)
}

fn handle_comment_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => app.exit_comment_mode(),
        KeyCode::Enter => app.submit_comment(),
        _ => handle_text_input(app, key_event),
    }
    Ok(false)
}

/// Cursor movement and editing inside the focused single-line input
fn handle_text_input(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Char(c) if !crate::utils::has_primary_modifier(key_event.modifiers) => {
            app.edit_active_text(|cursor, text| cursor.insert_char(text, c));
        }
        KeyCode::Backspace => app.edit_active_text(|cursor, text| cursor.delete_char(text)),
        KeyCode::Delete => app.edit_active_text(|cursor, text| cursor.delete_forward(text)),
        KeyCode::Left => app.edit_active_text(|cursor, _| cursor.move_left()),
        KeyCode::Right => app.edit_active_text(|cursor, text| cursor.move_right(text)),
        KeyCode::Home => app.edit_active_text(|cursor, _| cursor.move_home()),
        KeyCode::End => app.edit_active_text(|cursor, text| cursor.move_end(text)),
        _ => {}
    }
}

fn handle_delete_confirmation_modal(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        // Two buttons, so up and down both flip the selection
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection.min(1);
        }
        KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('y') => {
            app.modals.delete_modal_selection = 0;
            app.confirm_delete();
        }
        KeyCode::Esc | KeyCode::Char('n') => {
            app.modals.delete_modal_selection = 1;
            app.confirm_delete();
        }
        _ => {}
    }
    Ok(false)
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Primary modifier is Ctrl on Windows/Linux, Option/Alt on macOS
    let has_primary_mod = crate::utils::has_primary_modifier(key_event.modifiers);
    if binding.requires_ctrl != has_primary_mod {
        return false;
    }
    binding.key_code == key_event.code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::tui::app::FormField;
    use crate::Config;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        App::new(Config::default(), TaskStore::seeded())
    }

    #[test]
    fn quit_key_ends_loop_only_in_view_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.new_task.title, "q");
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn add_task_from_keyboard() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Write docs");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.ui.field, FormField::Priority);
        press(&mut app, KeyCode::Right); // medium -> low
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-09-20");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ui.mode, Mode::View);
        let task = app.store.tasks().last().cloned().unwrap();
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.priority, crate::models::Priority::Low);
        assert_eq!(task.due_date.map(|d| d.to_string()), Some("2025-09-20".to_string()));
    }

    #[test]
    fn invalid_due_date_keeps_form_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Task");
        app.ui.field = FormField::DueDate;
        type_str(&mut app, "tomorrow");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ui.mode, Mode::Create);
        assert_eq!(app.store.len(), 3);
        assert!(app.status.message.is_some());
    }

    #[test]
    fn space_toggles_and_delete_asks_first() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.tasks()[0].completed);

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.ui.mode, Mode::ConfirmDelete(_)));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.store.len(), 3);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn comment_mode_types_and_submits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        type_str(&mut app, "milk");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.store.tasks()[0].comments[0].text, "mil");
    }

    #[test]
    fn filter_keys_change_projection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.visible_tasks().len(), 2);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.visible_tasks().len(), 1);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view.sort_by, crate::view::SortBy::DueDate);
    }

    #[test]
    fn invalid_binding_is_reported() {
        let mut config = Config::default();
        config.key_bindings.quit = "Hyper".to_string();
        let mut app = App::new(config, TaskStore::seeded());
        let result = handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(matches!(result, Err(TuiError::KeyBindingError(_))));
    }
}
