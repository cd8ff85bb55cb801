use std::ops::Deref;

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

/// Human readable form of a key press, e.g. `ctrl-c`, `space`, `backtab`
pub fn key_event_to_string(key_event: &CrosstermKeyEvent) -> String {
    let code = match key_event.code {
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "backtab".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::F(n) => format!("f({n})"),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => String::new(),
    };

    let modifiers = [
        (KeyModifiers::CONTROL, "ctrl"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::ALT, "alt"),
    ]
    .into_iter()
    .filter(|(modifier, _)| key_event.modifiers.intersects(*modifier))
    .map(|(_, name)| name);

    modifiers
        .chain(std::iter::once(code.as_str()))
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent(pub CrosstermKeyEvent);

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(key_event: CrosstermKeyEvent) -> Self {
        Self(key_event)
    }
}
impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self(CrosstermKeyEvent::new(key_code, KeyModifiers::NONE))
    }
}
impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self(CrosstermKeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }
}
impl Deref for KeyEvent {
    type Target = CrosstermKeyEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", key_event_to_string(self))
    }
}
