/// Input source: non-blocking key polling.
///
/// One call consumes at most one pending key event and maps it to a logical
/// action; with nothing pending it returns None immediately. Key release
/// events (reported by terminals with the keyboard enhancement) are ignored
/// so a press is never double-counted.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Shoot,
    Quit,
    Restart,
    Confirm,
}

/// Poll for one action. Never blocks; I/O hiccups read as "no key".
pub fn poll_action() -> Option<Action> {
    while event::poll(Duration::ZERO).unwrap_or(false) {
        match event::read() {
            Ok(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    return Some(Action::Quit);
                }
                return map_key(key.code);
            }
            // resize and other events are handled by polling terminal::size
            _ => return None,
        }
    }
    None
}

fn map_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char(' ') => Some(Action::Shoot),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Enter => Some(Action::Confirm),
        _ => None,
    }
}
