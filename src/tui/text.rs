use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::color::Color;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, Invalidation};

/// Lays text out one glyph per column. Wide characters take two columns,
/// the second one left transparent; zero-width and control characters are
/// dropped.
pub(crate) fn columns(text: &str) -> Vec<Option<char>> {
    let mut columns = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch.width() {
            None | Some(0) => {}
            Some(width) => {
                columns.push(Some(ch));
                columns.extend(std::iter::repeat_n(None, width - 1));
            }
        }
    }
    columns
}

pub(crate) fn width_of(columns: &[Option<char>]) -> u16 {
    u16::try_from(columns.len()).unwrap_or(Size::UNBOUNDED_DIM - 1)
}

/// A single line of read-only text.
pub struct TextBlock {
    text: String,
    color: Option<Color>,
    columns: Vec<Option<char>>,
    invalidation: Option<Invalidation>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        TextBlock {
            columns: columns(&text),
            text,
            color: None,
            invalidation: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.columns = columns(&text);
        self.text = text;
        self.invalidate();
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        if color != self.color {
            self.color = color;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.invalidation = Some(Invalidation::merge(
            self.invalidation,
            Invalidation::Redraw,
        ));
    }
}

impl Control for TextBlock {
    fn measure(&self, _layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        Constraint::fixed(Size::new(width_of(&self.columns), 1))
    }

    fn cell(&self, position: Position, _size: Size, _tree: &ControlTree) -> Cell {
        match self.columns.get(position.x as usize) {
            Some(content) if position.y == 0 => Cell {
                content: *content,
                foreground: self.color,
                background: None,
            },
            _ => Cell::TRANSPARENT,
        }
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}
