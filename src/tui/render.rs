use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::tui::app::Mode;
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    filters_box::render_filters_box,
    form::{render_task_form, FormValues},
    help::render_help,
    item_view::render_item_view,
    status_bar::render_status_bar,
    task_list::render_task_list,
};
use crate::tui::{App, Layout};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Todo Sample")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)));
    f.render_widget(outer_block, f.area());

    // Borrow only the store so the list state can be handed out mutably
    let settings = app.view.constrained(&app.config.features);
    let tasks = crate::view::project(app.store.tasks(), &settings);
    render_task_list(
        f,
        layout.list_area,
        &tasks,
        app.store.len(),
        &mut app.ui.list_state,
        &app.config,
        &app.edits,
    );

    let selected = app.ui.selected_id.and_then(|id| app.store.get(id));
    let comment_input = selected.map(|task| app.comments.input(task.id)).unwrap_or("");
    let comment_cursor = match app.ui.mode {
        Mode::Comment(_) => Some(app.ui.cursor),
        _ => None,
    };
    render_item_view(f, layout.detail_area, selected, comment_input, comment_cursor, &app.config);

    render_filters_box(f, layout.filters_area, &app.filter_summary(), &app.config);

    let hints = app.key_hints();
    render_status_bar(f, layout.status_area, app.status.message.as_deref(), &hints, &app.config);

    // Popups go on top of everything else
    match app.ui.mode {
        Mode::Create => {
            let values = FormValues::from(&app.new_task);
            render_task_form(f, layout.inner_area, "新しいタスク", values, app.ui.field, app.ui.cursor, &app.config);
        }
        Mode::Edit(id) => {
            if let Some(draft) = app.edits.draft(id) {
                let values = FormValues::from(draft);
                render_task_form(f, layout.inner_area, "タスクを編集", values, app.ui.field, app.ui.cursor, &app.config);
            }
        }
        Mode::ConfirmDelete(id) => {
            if let Some(task) = app.store.get(id) {
                render_confirm_delete(f, layout.inner_area, task, app.modals.delete_modal_selection, &app.config);
            }
        }
        Mode::Help => render_help(f, layout.inner_area, &app.config),
        Mode::View | Mode::Comment(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTask, Priority};
    use crate::store::{Action, TaskStore};
    use crate::tui::events::LIST_WIDTH_PERCENT;
    use crate::Config;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(Rect::new(0, 0, width, height), LIST_WIDTH_PERCENT);
                render(f, app, &layout);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn ascii_app() -> App {
        let mut app = App::new(Config::default(), TaskStore::new(Vec::new()));
        app.dispatch(Action::Add(NewTask::new("Buy milk").priority(Priority::Low)));
        app.dispatch(Action::Add(NewTask::new("Ship release").priority(Priority::High)));
        app
    }

    #[test]
    fn main_screen_lists_tasks_in_priority_order() {
        let mut app = ascii_app();
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Todo Sample"));
        assert!(screen.contains("Tasks (2 of 2)"));
        let ship = screen.find("[ ] Ship release").unwrap();
        let milk = screen.find("[ ] Buy milk").unwrap();
        assert!(ship < milk);
        assert!(screen.contains("Sort: "));
    }

    #[test]
    fn empty_store_shows_placeholder() {
        let mut app = App::new(Config::default(), TaskStore::new(Vec::new()));
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("Tasks (0 of 0)"));
        assert!(screen.contains("Select a task to view details"));
    }

    #[test]
    fn detail_pane_shows_comment_placeholders() {
        let mut app = ascii_app();
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("No comments yet."));
        assert!(screen.contains("Add a comment..."));
    }

    #[test]
    fn popups_render_over_the_list() {
        let mut app = ascii_app();
        app.request_delete();
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("Confirm Delete"));
        assert!(screen.contains("> Delete"));

        app.modals.delete_modal_selection = 1;
        app.confirm_delete();
        app.enter_help_mode();
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("Help - Key Bindings"));
    }
}
