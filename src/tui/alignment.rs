use crate::cell::Cell;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Decorator, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
    Both,
}

impl Axis {
    fn horizontal(self) -> bool {
        matches!(self, Axis::Horizontal | Axis::Both)
    }

    fn vertical(self) -> bool {
        matches!(self, Axis::Vertical | Axis::Both)
    }
}

/// Centers its content along one or both axes.
///
/// An aligned axis accepts any length from the content's minimum up; the
/// content keeps its minimum and the leftover is split around it, the odd
/// cell going after.
pub struct Alignment {
    content: ControlId,
    axis: Axis,
}

impl Alignment {
    pub fn new(content: ControlId, axis: Axis) -> Self {
        Self { content, axis }
    }

    pub fn horizontal(content: ControlId) -> Self {
        Self::new(content, Axis::Horizontal)
    }

    pub fn vertical(content: ControlId) -> Self {
        Self::new(content, Axis::Vertical)
    }

    pub fn both(content: ControlId) -> Self {
        Self::new(content, Axis::Both)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

/// Child length and leading offset along one axis.
fn place(aligned: bool, assigned: u16, min: u16, max: u16) -> (u16, u16) {
    if aligned {
        let length = min.min(assigned);
        (length, (assigned - length) / 2)
    } else {
        (assigned.clamp(min, max), 0)
    }
}

impl Control for Alignment {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        let child = layouts.constraint(self.content);
        let mut max = child.max();
        if self.axis.horizontal() {
            max.width = Size::UNBOUNDED_DIM;
        }
        if self.axis.vertical() {
            max.height = Size::UNBOUNDED_DIM;
        }
        Constraint::derived(child.min(), max)
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let child = layouts.constraint(self.content);
        let (width, x) = place(
            self.axis.horizontal(),
            size.width,
            child.min().width,
            child.max().width,
        );
        let (height, y) = place(
            self.axis.vertical(),
            size.height,
            child.min().height,
            child.max().height,
        );
        vec![Placement::at(
            self.content,
            Position::new(x, y),
            Size::new(width, height),
        )]
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        tree.child_cell(self.content, position)
    }

    fn children(&self) -> Vec<ControlId> {
        vec![self.content]
    }
}

impl Alignment {
    pub fn content(&self) -> ControlId {
        self.content
    }
}

impl Decorator for Alignment {
    fn replace_content(&mut self, content: ControlId) -> ControlId {
        std::mem::replace(&mut self.content, content)
    }
}
