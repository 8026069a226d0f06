//! The boundary between the toolkit and a physical display.
//!
//! Cells crossing this boundary are fully resolved: every transparent
//! channel has been filled from a [`Palette`].

use crate::cell::Cell;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Constraint, Position, Rect, Size};

/// A cell as the device shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedCell {
    pub content: char,
    pub foreground: Color,
    pub background: Color,
}

/// What transparent channels turn into at the output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Color,
    pub background: Color,
    pub glyph: char,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color::WHITE,
            background: Color::BLACK,
            glyph: ' ',
        }
    }
}

impl Palette {
    pub fn resolve(&self, cell: Cell) -> ResolvedCell {
        ResolvedCell {
            content: cell.content.unwrap_or(self.glyph),
            foreground: cell.foreground.unwrap_or(self.foreground),
            background: cell.background.unwrap_or(self.background),
        }
    }
}

/// A device the context flushes damaged regions to.
pub trait OutputSurface {
    /// Physical size limits of the device.
    fn constraint(&self) -> Constraint;

    /// Writes `cells`, row-major, into `rect` at absolute device
    /// coordinates.
    fn write(&mut self, rect: Rect, cells: &[ResolvedCell]) -> Result<()>;
}

/// An in-memory grid, mostly for tests and headless hosts.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    size: Size,
    cells: Vec<ResolvedCell>,
    writes: usize,
}

impl MemorySurface {
    pub fn new(size: Size) -> Self {
        Self::with_palette(size, Palette::default())
    }

    pub fn with_palette(size: Size, palette: Palette) -> Self {
        Self {
            size,
            cells: vec![palette.resolve(Cell::TRANSPARENT); size.width as usize * size.height as usize],
            writes: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cell(&self, position: Position) -> Option<ResolvedCell> {
        if !self.size.as_rect().contains(position) {
            return None;
        }
        self.cells
            .get(position.y as usize * self.size.width as usize + position.x as usize)
            .copied()
    }

    /// Glyphs of one row.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.size.width)
            .filter_map(|x| self.cell(Position::new(x, y)))
            .map(|cell| cell.content)
            .collect()
    }

    /// Every row, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.height).map(|y| self.row_text(y)).collect()
    }

    /// Number of `write` calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl OutputSurface for MemorySurface {
    fn constraint(&self) -> Constraint {
        Constraint::fixed(self.size)
    }

    fn write(&mut self, rect: Rect, cells: &[ResolvedCell]) -> Result<()> {
        self.writes += 1;
        let width = self.size.width as usize;
        for (position, cell) in rect.into_iter().zip(cells) {
            if self.size.as_rect().contains(position) {
                self.cells[position.y as usize * width + position.x as usize] = *cell;
            }
        }
        Ok(())
    }
}
