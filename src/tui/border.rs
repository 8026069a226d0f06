use crate::cell::Cell;
use crate::color::Color;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Decorator, Invalidation, Placement};

bitflags::bitflags! {
    /// Which edges of a [`Border`] are drawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BorderPlacement: u8 {
        const TOP    = 1 << 0;
        const BOTTOM = 1 << 1;
        const LEFT   = 1 << 2;
        const RIGHT  = 1 << 3;
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Default for BorderPlacement {
    fn default() -> Self {
        Self::ALL
    }
}

impl BorderPlacement {
    fn edge(self, flag: Self) -> u16 {
        u16::from(self.contains(flag))
    }

    /// (columns, rows) the edges take up
    fn overhead(self) -> (u16, u16) {
        (
            self.edge(Self::LEFT) + self.edge(Self::RIGHT),
            self.edge(Self::TOP) + self.edge(Self::BOTTOM),
        )
    }
}

const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';

/// Box-drawing frame around one child.
pub struct Border {
    content: ControlId,
    placement: BorderPlacement,
    color: Option<Color>,
    invalidation: Option<Invalidation>,
}

impl Border {
    pub fn new(content: ControlId) -> Self {
        Self {
            content,
            placement: BorderPlacement::ALL,
            color: None,
            invalidation: None,
        }
    }

    pub fn with_placement(mut self, placement: BorderPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn placement(&self) -> BorderPlacement {
        self.placement
    }

    pub fn set_placement(&mut self, placement: BorderPlacement) {
        if placement != self.placement {
            self.placement = placement;
            self.invalidation = Some(Invalidation::Redraw);
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        if color != self.color {
            self.color = color;
            self.invalidation = Some(Invalidation::Redraw);
        }
    }

    fn glyph(&self, position: Position, size: Size) -> Option<char> {
        let top = self.placement.contains(BorderPlacement::TOP) && position.y == 0;
        let bottom = self.placement.contains(BorderPlacement::BOTTOM)
            && position.y + 1 == size.height;
        let left = self.placement.contains(BorderPlacement::LEFT) && position.x == 0;
        let right =
            self.placement.contains(BorderPlacement::RIGHT) && position.x + 1 == size.width;

        match (top, bottom, left, right) {
            (true, _, true, _) => Some(TOP_LEFT),
            (true, _, _, true) => Some(TOP_RIGHT),
            (_, true, true, _) => Some(BOTTOM_LEFT),
            (_, true, _, true) => Some(BOTTOM_RIGHT),
            (true, _, _, _) | (_, true, _, _) => Some(HORIZONTAL),
            (_, _, true, _) | (_, _, _, true) => Some(VERTICAL),
            _ => None,
        }
    }
}

impl Control for Border {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        let (width, height) = self.placement.overhead();
        layouts.constraint(self.content).grow(width, height)
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let (width, height) = self.placement.overhead();
        let inner = layouts
            .constraint(self.content)
            .clamp(size.shrink(width, height));
        let origin = Position::new(
            self.placement.edge(BorderPlacement::LEFT),
            self.placement.edge(BorderPlacement::TOP),
        );
        vec![Placement::at(self.content, origin, inner)]
    }

    fn cell(&self, position: Position, size: Size, tree: &ControlTree) -> Cell {
        match self.glyph(position, size) {
            Some(glyph) => Cell::glyph(glyph).with_foreground(self.color),
            None => tree.child_cell(self.content, position),
        }
    }

    fn children(&self) -> Vec<ControlId> {
        vec![self.content]
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}

impl Border {
    pub fn content(&self) -> ControlId {
        self.content
    }
}

impl Decorator for Border {
    fn replace_content(&mut self, content: ControlId) -> ControlId {
        std::mem::replace(&mut self.content, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyphs(border: &Border, size: Size) -> Vec<String> {
        (0..size.height)
            .map(|y| {
                (0..size.width)
                    .map(|x| border.glyph(Position::new(x, y), size).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }

    fn border(placement: BorderPlacement) -> Border {
        let id = ControlId {
            index: 0,
            generation: 0,
        };
        Border::new(id).with_placement(placement)
    }

    #[test]
    fn full_frame() {
        assert_eq!(
            glyphs(&border(BorderPlacement::ALL), Size::new(4, 3)),
            vec!["┌──┐", "│..│", "└──┘"]
        );
    }

    #[test]
    fn partial_frames_pick_corners_per_edge_pair() {
        assert_eq!(
            glyphs(
                &border(BorderPlacement::ALL ^ BorderPlacement::BOTTOM),
                Size::new(4, 2)
            ),
            vec!["┌──┐", "│..│"]
        );
        assert_eq!(
            glyphs(
                &border(BorderPlacement::TOP | BorderPlacement::LEFT),
                Size::new(3, 2)
            ),
            vec!["┌──", "│.."]
        );
    }

    #[test]
    fn opposite_edges_have_no_corners() {
        assert_eq!(
            glyphs(
                &border(BorderPlacement::LEFT | BorderPlacement::RIGHT),
                Size::new(3, 2)
            ),
            vec!["│.│", "│.│"]
        );
        assert_eq!(
            glyphs(
                &border(BorderPlacement::TOP | BorderPlacement::BOTTOM),
                Size::new(3, 3)
            ),
            vec!["───", "...", "───"]
        );
    }

    #[test]
    fn overhead_counts_active_edges() {
        assert_eq!(BorderPlacement::ALL.overhead(), (2, 2));
        assert_eq!(BorderPlacement::LEFT.overhead(), (1, 0));
        assert_eq!(BorderPlacement::empty().overhead(), (0, 0));
    }
}
