use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any state
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if ctrl && key.code == KeyCode::Char('r') {
        app.reset();
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if app.session.result().is_some() {
                app.reset();
            } else if !app.session.is_loading() {
                app.should_quit = true;
            }
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => {
            app.session.backspace();
        }
        KeyCode::Delete => {
            app.session.delete();
        }
        KeyCode::Left => app.session.move_left(),
        KeyCode::Right => app.session.move_right(),
        KeyCode::Home => app.session.move_home(),
        KeyCode::End => app.session.move_end(),
        KeyCode::Char(c) if !ctrl => {
            app.session.insert_char(c);
        }
        _ => {}
    }
}
