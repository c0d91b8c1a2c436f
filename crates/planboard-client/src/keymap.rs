use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::drag::KeyboardAction;

/// Map a terminal key press to a drag action.
///
/// Space and Enter pick up when no card is held and drop otherwise. Movement
/// keys and Esc only mean something while a card is held.
pub fn keyboard_action(key: &KeyEvent, dragging: bool) -> Option<KeyboardAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Enter if dragging => KeyboardAction::Drop,
        KeyCode::Char(' ') | KeyCode::Enter => KeyboardAction::PickUp,
        _ if !dragging => return None,
        KeyCode::Up | KeyCode::Char('k') => KeyboardAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => KeyboardAction::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => KeyboardAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => KeyboardAction::MoveRight,
        KeyCode::Esc => KeyboardAction::Cancel,
        _ => return None,
    };
    Some(action)
}
