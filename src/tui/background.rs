use crate::cell::Cell;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Decorator, Invalidation, Placement};

/// Fill cell under the content
pub struct Background {
    content: ControlId,
    fill: Cell,
    invalidation: Option<Invalidation>,
}

impl Background {
    pub fn new(content: ControlId, fill: Cell) -> Self {
        Self {
            content,
            fill,
            invalidation: None,
        }
    }

    pub fn fill(&self) -> Cell {
        self.fill
    }

    pub fn set_fill(&mut self, fill: Cell) {
        if fill != self.fill {
            self.fill = fill;
            self.invalidation = Some(Invalidation::Redraw);
        }
    }
}

impl Control for Background {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        layouts.constraint(self.content)
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let size = layouts.constraint(self.content).clamp(size);
        vec![Placement::at(self.content, Position::default(), size)]
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        tree.child_cell(self.content, position).over(self.fill)
    }

    fn children(&self) -> Vec<ControlId> {
        vec![self.content]
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}

impl Background {
    pub fn content(&self) -> ControlId {
        self.content
    }
}

impl Decorator for Background {
    fn replace_content(&mut self, content: ControlId) -> ControlId {
        std::mem::replace(&mut self.content, content)
    }
}
