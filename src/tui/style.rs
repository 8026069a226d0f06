use crate::cell::Cell;
use crate::color::Color;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Decorator, Invalidation, Placement};

/// Default colors for whatever its content leaves transparent.
pub struct Style {
    content: ControlId,
    foreground: Option<Color>,
    background: Option<Color>,
    invalidation: Option<Invalidation>,
}

impl Style {
    pub fn new(content: ControlId) -> Self {
        Self {
            content,
            foreground: None,
            background: None,
            invalidation: None,
        }
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn foreground(&self) -> Option<Color> {
        self.foreground
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_foreground(&mut self, color: Option<Color>) {
        if color != self.foreground {
            self.foreground = color;
            self.invalidation = Some(Invalidation::Redraw);
        }
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        if color != self.background {
            self.background = color;
            self.invalidation = Some(Invalidation::Redraw);
        }
    }
}

impl Control for Style {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        layouts.constraint(self.content)
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let size = layouts.constraint(self.content).clamp(size);
        vec![Placement::at(self.content, Position::default(), size)]
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        tree.child_cell(self.content, position)
            .tinted(self.foreground, self.background)
    }

    fn children(&self) -> Vec<ControlId> {
        vec![self.content]
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}

impl Style {
    pub fn content(&self) -> ControlId {
        self.content
    }
}

impl Decorator for Style {
    fn replace_content(&mut self, content: ControlId) -> ControlId {
        std::mem::replace(&mut self.content, content)
    }
}
