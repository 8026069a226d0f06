//! Crossterm output for a real terminal.

use std::io::{Stdout, Write, stdout};

use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use unicode_width::UnicodeWidthChar;

use crate::color::{Color, ColorLevel, color_level};
use crate::error::Result;
use crate::geometry::{Constraint, Rect, Size};
use crate::surface::{OutputSurface, ResolvedCell};

/// Writes resolved cells as cursor moves, color changes and glyphs,
/// downgrading colors to what the terminal supports.
pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
    size: Size,
    level: ColorLevel,
}

impl TerminalSurface<Stdout> {
    /// Stdout at the terminal's current size and detected color level.
    pub fn stdout() -> Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(stdout(), Size::new(width, height), color_level()))
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, size: Size, level: ColorLevel) -> Self {
        Self { out, size, level }
    }

    pub fn level(&self) -> ColorLevel {
        self.level
    }

    /// Records a new terminal size, as reported by a resize event.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn set_colors(&mut self, foreground: Color, background: Color) -> Result<()> {
        if let Some(color) = foreground.to_terminal(self.level) {
            self.out.queue(SetForegroundColor(color))?;
        }
        if let Some(color) = background.to_terminal(self.level) {
            self.out.queue(SetBackgroundColor(color))?;
        }
        Ok(())
    }
}

impl<W: Write> OutputSurface for TerminalSurface<W> {
    fn constraint(&self) -> Constraint {
        Constraint::fixed(self.size)
    }

    fn write(&mut self, rect: Rect, cells: &[ResolvedCell]) -> Result<()> {
        if rect.intersection(self.size.as_rect()).is_none() || cells.is_empty() {
            return Ok(());
        }
        let visible = usize::from(self.size.width.saturating_sub(rect.x));
        let mut colors = None;
        for (y, row) in (rect.y..rect.bottom()).zip(cells.chunks(usize::from(rect.width))) {
            if y >= self.size.height {
                break;
            }
            self.out.queue(MoveTo(rect.x, y))?;
            // A wide glyph already covers the column after it.
            let mut covered = 0;
            for cell in &row[..row.len().min(visible)] {
                if covered > 0 {
                    covered -= 1;
                    continue;
                }
                if colors != Some((cell.foreground, cell.background)) {
                    self.set_colors(cell.foreground, cell.background)?;
                    colors = Some((cell.foreground, cell.background));
                }
                self.out.queue(Print(cell.content))?;
                covered = cell.content.width().unwrap_or(1).saturating_sub(1);
            }
        }
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}
