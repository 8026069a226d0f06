use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::geometry::{Constraint, Position, Rect, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Placement};

/// Free-form compositor: children sit at explicit rectangles and may
/// overlap. Later entries paint above earlier ones.
#[derive(Debug)]
pub struct Canvas {
    constraint: Constraint,
    entries: Vec<(ControlId, Rect)>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_constraint(Constraint::UNCONSTRAINED)
    }

    /// The canvas accepts exactly these sizes, whatever it holds.
    pub fn with_constraint(constraint: Constraint) -> Self {
        Self {
            constraint,
            entries: Vec::new(),
        }
    }

    /// Paint order, bottom first
    pub fn entries(&self) -> &[(ControlId, Rect)] {
        &self.entries
    }

    pub fn rect_of(&self, child: ControlId) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(id, _)| *id == child)
            .map(|(_, rect)| *rect)
    }

    pub(crate) fn push_entry(&mut self, child: ControlId, rect: Rect) -> Result<()> {
        if rect.is_empty() {
            return Err(Error::EmptyCanvasEntry { rect });
        }
        self.entries.push((child, rect));
        Ok(())
    }

    /// false when `child` is not an entry
    pub(crate) fn set_rect(&mut self, child: ControlId, rect: Rect) -> bool {
        match self.entries.iter_mut().find(|(id, _)| *id == child) {
            Some(entry) => {
                entry.1 = rect;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_entry(&mut self, child: ControlId) {
        self.entries.retain(|(id, _)| *id != child);
    }
}

impl Control for Canvas {
    fn measure(&self, _layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        self.constraint
    }

    fn arrange(&mut self, _size: Size, layouts: &Layouts) -> Vec<Placement> {
        self.entries
            .iter()
            .map(|(child, rect)| {
                let size = layouts.constraint(*child).clamp(rect.size());
                Placement::clipped(*child, rect.origin().into(), size, *rect)
            })
            .collect()
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        let mut cell = Cell::TRANSPARENT;
        for (child, _) in self.entries.iter().rev() {
            cell = cell.over(tree.child_cell(*child, position));
            if cell.is_opaque() {
                break;
            }
        }
        cell
    }

    fn children(&self) -> Vec<ControlId> {
        self.entries.iter().map(|(child, _)| *child).collect()
    }
}
