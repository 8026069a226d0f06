use crossterm::event::KeyCode;
use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::color::Color;
use crate::event::{InputEvent, InputListener};
use crate::geometry::{Constraint, Position, Rect, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, Invalidation};

/// Single-line editable text with a cursor.
///
/// The cursor is a char index in `[0, len]`. One extra column after the
/// text keeps the cursor visible when it sits at the end.
pub struct TextBox {
    text: Vec<char>,
    cursor: usize,
    color: Option<Color>,
    cursor_color: Color,
    invalidation: Option<Invalidation>,
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBox {
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            cursor: 0,
            color: None,
            cursor_color: Color::WHITE,
            invalidation: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Self::glyphs(text);
        self.cursor = self.text.len();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_cursor_color(mut self, color: Color) -> Self {
        self.cursor_color = color;
        self
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the whole buffer and puts the cursor at its end.
    pub fn set_text(&mut self, text: &str) {
        self.text = Self::glyphs(text);
        self.cursor = self.text.len();
        self.invalidate(Invalidation::Redraw);
    }

    /// Inserts at the cursor. Zero-width chars have no column to live in
    /// and are ignored.
    pub fn insert(&mut self, ch: char) {
        if Self::glyph_width(ch) == 0 {
            return;
        }
        let from = self.column_of(self.cursor);
        self.text.insert(self.cursor, ch);
        self.cursor += 1;
        self.invalidate_tail(from);
    }

    /// Removes the character before the cursor. Returns whether anything
    /// was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let from = self.column_of(self.cursor);
        self.text.remove(self.cursor);
        self.invalidate_tail(from);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        let from = self.column_of(self.cursor);
        self.text.remove(self.cursor);
        self.invalidate_tail(from);
        true
    }

    /// Moves the cursor to `index`, clamped to the buffer.
    pub fn move_cursor(&mut self, index: usize) {
        let index = index.min(self.text.len());
        if index == self.cursor {
            return;
        }
        let old = self.cursor_cell();
        self.cursor = index;
        let new = self.cursor_cell();
        self.invalidate(Invalidation::Update(old.union(new)));
    }

    fn glyph_width(ch: char) -> u16 {
        ch.width().unwrap_or(0) as u16
    }

    fn glyphs(text: &str) -> Vec<char> {
        text.chars().filter(|ch| Self::glyph_width(*ch) > 0).collect()
    }

    /// Display column where the char at `index` starts.
    fn column_of(&self, index: usize) -> u16 {
        self.text[..index]
            .iter()
            .map(|ch| Self::glyph_width(*ch))
            .fold(0u16, u16::saturating_add)
    }

    fn display_width(&self) -> u16 {
        self.column_of(self.text.len())
    }

    fn cursor_cell(&self) -> Rect {
        let width = self
            .text
            .get(self.cursor)
            .map(|ch| Self::glyph_width(*ch).max(1))
            .unwrap_or(1);
        Rect::new(self.column_of(self.cursor), 0, width, 1)
    }

    /// Everything from `column` to the end shifted; the extra column covers
    /// a glyph that just moved out.
    fn invalidate_tail(&mut self, column: u16) {
        let end = self.display_width().saturating_add(2);
        self.invalidate(Invalidation::Update(Rect::new(
            column,
            0,
            end.saturating_sub(column),
            1,
        )));
    }

    fn invalidate(&mut self, invalidation: Invalidation) {
        self.invalidation = Some(Invalidation::merge(self.invalidation, invalidation));
    }

    /// The char drawn at a display column, with whether it is the cursor.
    fn glyph_at(&self, x: u16) -> (Option<char>, bool) {
        let mut column = 0u16;
        for (index, ch) in self.text.iter().enumerate() {
            let width = Self::glyph_width(*ch);
            if x >= column && x < column + width {
                let content = (x == column).then_some(*ch);
                return (content, index == self.cursor);
            }
            column += width;
        }
        (Some(' '), x == column && self.cursor == self.text.len())
    }
}

impl Control for TextBox {
    fn measure(&self, _layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        Constraint::fixed(Size::new(self.display_width().saturating_add(1), 1))
    }

    fn cell(&self, position: Position, _size: Size, _tree: &ControlTree) -> Cell {
        if position.y != 0 || position.x > self.display_width() {
            return Cell::TRANSPARENT;
        }
        let (content, at_cursor) = self.glyph_at(position.x);
        if at_cursor {
            Cell {
                content,
                foreground: Some(Color::BLACK),
                background: Some(self.cursor_color),
            }
        } else {
            Cell {
                content,
                foreground: self.color,
                background: None,
            }
        }
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}

impl InputListener for TextBox {
    fn on_input(&mut self, event: &mut InputEvent) {
        if event.handled() || !event.is_press() {
            return;
        }
        if let Some(ch) = event.printable() {
            self.insert(ch);
            event.set_handled();
            return;
        }
        match event.key().code {
            KeyCode::Backspace => {
                self.backspace();
            }
            KeyCode::Delete => {
                self.delete();
            }
            KeyCode::Left => self.move_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor(self.cursor + 1),
            KeyCode::Home => self.move_cursor(0),
            KeyCode::End => self.move_cursor(self.text.len()),
            _ => return,
        }
        event.set_handled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn press(text_box: &mut TextBox, code: KeyCode) -> bool {
        let mut event = InputEvent::from(code);
        text_box.on_input(&mut event);
        event.handled()
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut text_box = TextBox::new();
        assert!(press(&mut text_box, KeyCode::Char('a')));
        assert!(press(&mut text_box, KeyCode::Char('c')));
        assert!(press(&mut text_box, KeyCode::Left));
        assert!(press(&mut text_box, KeyCode::Char('b')));
        assert_eq!(text_box.text(), "abc");
        assert_eq!(text_box.cursor(), 2);
    }

    #[test]
    fn insert_then_backspace_round_trips() {
        let mut text_box = TextBox::new().with_text("hello");
        press(&mut text_box, KeyCode::Left);
        press(&mut text_box, KeyCode::Left);
        let (text, cursor) = (text_box.text(), text_box.cursor());
        press(&mut text_box, KeyCode::Char('x'));
        assert_eq!(text_box.text(), "helxlo");
        press(&mut text_box, KeyCode::Backspace);
        assert_eq!((text_box.text(), text_box.cursor()), (text, cursor));
    }

    #[test]
    fn backspace_at_start_is_handled_noop() {
        let mut text_box = TextBox::new().with_text("ab");
        press(&mut text_box, KeyCode::Home);
        text_box.take_invalidation();
        assert!(press(&mut text_box, KeyCode::Backspace));
        assert_eq!(text_box.text(), "ab");
        assert_eq!(text_box.take_invalidation(), None);
    }

    #[test]
    fn arrows_clamp_to_bounds() {
        let mut text_box = TextBox::new().with_text("ab");
        assert!(press(&mut text_box, KeyCode::Right));
        assert_eq!(text_box.cursor(), 2);
        for _ in 0..5 {
            press(&mut text_box, KeyCode::Left);
        }
        assert_eq!(text_box.cursor(), 0);
    }

    #[test]
    fn foreign_keys_stay_unhandled() {
        let mut text_box = TextBox::new();
        assert!(!press(&mut text_box, KeyCode::Up));
        assert!(!press(&mut text_box, KeyCode::PageDown));
        let mut chord = InputEvent::new(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        text_box.on_input(&mut chord);
        assert!(!chord.handled());
        assert_eq!(text_box.text(), "");
    }

    #[test]
    fn already_handled_events_are_left_alone() {
        let mut text_box = TextBox::new();
        let mut event = InputEvent::from(KeyCode::Char('a'));
        event.set_handled();
        text_box.on_input(&mut event);
        assert_eq!(text_box.text(), "");
    }

    #[test]
    fn width_tracks_text_plus_cursor() {
        let layouts = Layouts::default();
        let mut text_box = TextBox::new();
        assert_eq!(text_box.measure(&layouts, None).min(), Size::new(1, 1));
        press(&mut text_box, KeyCode::Char('a'));
        assert_eq!(text_box.measure(&layouts, None).min(), Size::new(2, 1));
    }

    #[test]
    fn cursor_moves_update_old_and_new_cells() {
        let mut text_box = TextBox::new().with_text("abcd");
        text_box.take_invalidation();
        press(&mut text_box, KeyCode::Left);
        assert_eq!(
            text_box.take_invalidation(),
            Some(Invalidation::Update(Rect::new(3, 0, 2, 1)))
        );
    }

    #[test]
    fn edits_update_from_the_edit_point() {
        let mut text_box = TextBox::new().with_text("abcd");
        press(&mut text_box, KeyCode::Home);
        press(&mut text_box, KeyCode::Right);
        text_box.take_invalidation();
        press(&mut text_box, KeyCode::Delete);
        assert_eq!(
            text_box.take_invalidation(),
            Some(Invalidation::Update(Rect::new(1, 0, 4, 1)))
        );
    }

    #[test]
    fn zero_width_chars_are_not_stored() {
        let mut text_box = TextBox::new().with_text("e\u{301}x");
        assert_eq!(text_box.text(), "ex");
        text_box.take_invalidation();
        text_box.insert('\u{301}');
        assert_eq!(text_box.text(), "ex");
        assert_eq!(text_box.take_invalidation(), None);

        press(&mut text_box, KeyCode::Left);
        let tree = ControlTree::new();
        assert_eq!(
            text_box.cell(Position::new(1, 0), Size::new(3, 1), &tree),
            Cell::new('x', Color::BLACK, Color::WHITE)
        );
    }

    #[test]
    fn cursor_cell_is_inverted() {
        let tree = ControlTree::new();
        let text_box = TextBox::new().with_text("ab").with_cursor_color(Color::WHITE);
        assert_eq!(text_box.cell(Position::new(0, 0), Size::new(9, 1), &tree), Cell::glyph('a'));
        assert_eq!(
            text_box.cell(Position::new(2, 0), Size::new(9, 1), &tree),
            Cell::new(' ', Color::BLACK, Color::WHITE)
        );
    }
}
