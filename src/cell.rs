//! The colored character cell every control renders.
//!
//! Each channel is optional. An unset channel is transparent: whatever is
//! composited underneath shows through on that channel only.

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub content: Option<char>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Cell {
    /// Transparent on every channel.
    pub const TRANSPARENT: Self = Self {
        content: None,
        foreground: None,
        background: None,
    };

    pub const fn new(content: char, foreground: Color, background: Color) -> Self {
        Self {
            content: Some(content),
            foreground: Some(foreground),
            background: Some(background),
        }
    }

    /// A glyph with transparent colors.
    pub const fn glyph(content: char) -> Self {
        Self {
            content: Some(content),
            foreground: None,
            background: None,
        }
    }

    pub const fn with_foreground(mut self, color: Option<Color>) -> Self {
        self.foreground = color;
        self
    }

    pub const fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    pub const fn is_transparent(&self) -> bool {
        self.content.is_none() && self.foreground.is_none() && self.background.is_none()
    }

    pub const fn is_opaque(&self) -> bool {
        self.content.is_some() && self.foreground.is_some() && self.background.is_some()
    }

    /// Composites this cell on top of `below`, channel by channel.
    pub fn over(self, below: Cell) -> Cell {
        Cell {
            content: self.content.or(below.content),
            foreground: self.foreground.or(below.foreground),
            background: self.background.or(below.background),
        }
    }

    /// Fills transparent color channels with defaults, leaving the glyph
    /// alone.
    pub fn tinted(self, foreground: Option<Color>, background: Option<Color>) -> Cell {
        Cell {
            content: self.content,
            foreground: self.foreground.or(foreground),
            background: self.background.or(background),
        }
    }
}
