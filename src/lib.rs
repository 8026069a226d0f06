//! Retained-mode widgets for colored character grids.
//!
//! Controls live in a [`DrawingContext`], negotiate their sizes through
//! [`Constraint`]s and are rendered cell by cell on demand. Changes turn
//! into damage rectangles that the context flushes to an
//! [`OutputSurface`].

pub mod cell;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod surface;
pub mod terminal;
pub mod tui;

pub use cell::Cell;
pub use color::Color;
pub use error::{Error, Result};
pub use event::{InputEvent, InputListener};
pub use geometry::{Constraint, Offset, Position, Rect, Size};
pub use surface::{MemorySurface, OutputSurface, Palette, ResolvedCell};
pub use terminal::TerminalSurface;
pub use tui::context::{ContextConfig, DrawingContext};
pub use tui::{ControlId, ControlNode, Invalidation};
