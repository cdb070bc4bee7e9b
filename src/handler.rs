use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Controls are disabled while a book is loading
    if app.is_loading() {
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_lookup_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Selector movement
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('g') | KeyCode::Home => app.nav_first(),
        KeyCode::Char('G') | KeyCode::End => app.nav_last(),

        // Focus
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => app.focus_next(),
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => app.focus_prev(),

        // Select
        KeyCode::Enter => app.nav_enter(),

        // Clear selection
        KeyCode::Esc | KeyCode::Backspace => app.nav_back(),

        // Previous/next verse
        KeyCode::Char('n') | KeyCode::Char(']') => app.request_step(true),
        KeyCode::Char('p') | KeyCode::Char('[') => app.request_step(false),

        // Lookup prompt
        KeyCode::Char('/') => app.start_lookup(),

        // Context radius
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_radius(true),
        KeyCode::Char('-') => app.change_radius(false),

        // Content scrolling
        KeyCode::PageDown => app.scroll_down(),
        KeyCode::PageUp => app.scroll_up(),

        _ => {}
    }
}

fn handle_lookup_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_lookup(),
        KeyCode::Enter => app.submit_lookup(),
        KeyCode::Backspace => {
            app.lookup_input.pop();
        }
        KeyCode::Char(c) => app.lookup_input.push(c),
        _ => {}
    }
}
