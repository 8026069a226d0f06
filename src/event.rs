use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// One key press on its way through the listeners the host picked.
///
/// A listener that consumes the key sets `handled`; the host decides
/// whether later listeners still see it.
#[derive(Debug, Clone)]
pub struct InputEvent {
    key: KeyEvent,
    handled: bool,
}

impl InputEvent {
    pub fn new(key: KeyEvent) -> Self {
        Self {
            key,
            handled: false,
        }
    }

    pub fn key(&self) -> &KeyEvent {
        &self.key
    }

    pub fn handled(&self) -> bool {
        self.handled
    }

    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Release events carry no input for listeners.
    pub fn is_press(&self) -> bool {
        self.key.kind != KeyEventKind::Release
    }

    /// The character a text field would insert, if any. Control and
    /// zero-width characters are not printable.
    pub fn printable(&self) -> Option<char> {
        match self.key.code {
            KeyCode::Char(c)
                if c.width().is_some_and(|width| width > 0)
                    && !self
                        .key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(key: KeyEvent) -> Self {
        Self::new(key)
    }
}

impl From<KeyCode> for InputEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(KeyEvent::new(code, KeyModifiers::NONE))
    }
}

/// Optional capability of controls that react to keys.
///
/// Listeners may be offered keys while unfocused and must leave
/// `handled` untouched for keys they don't own.
pub trait InputListener {
    fn on_input(&mut self, event: &mut InputEvent);
}
