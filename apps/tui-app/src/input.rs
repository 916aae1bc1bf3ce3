//! Translation of terminal key events into session input.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use usbmount_core::{Focus, InputEvent};

/// Maps a key event to an [`InputEvent`], or `None` if the key has no meaning.
///
/// `q`, `k` and `j` act as quit/up/down only while the list has focus; in the
/// mount point editor they are ordinary characters.
pub fn map_key(key: KeyEvent, focus: Focus) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Down => Some(InputEvent::Down),
        KeyCode::Tab | KeyCode::BackTab => Some(InputEvent::Tab),
        KeyCode::Enter => Some(InputEvent::Enter),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Char(c) if focus == Focus::List => Some(match c {
            'q' => InputEvent::Quit,
            'k' => InputEvent::Up,
            'j' => InputEvent::Down,
            c => InputEvent::Character(c),
        }),
        KeyCode::Char(c) => Some(InputEvent::Character(c)),
        _ => None,
    }
}
