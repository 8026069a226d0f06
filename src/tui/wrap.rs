use crate::cell::Cell;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Panel, Placement};

/// Children left to right at their minimum size, breaking into a new row
/// whenever the next one would overflow the width.
///
/// Its minimum height depends on the width it was given, so a layout can
/// change its constraint and take another pass.
#[derive(Debug, Default)]
pub struct WrapPanel {
    children: Vec<ControlId>,
}

impl WrapPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: impl IntoIterator<Item = ControlId>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    /// (origin, size) per child at `width`, and the total height
    fn flow(&self, width: u16, layouts: &Layouts) -> (Vec<(Position, Size)>, u16) {
        let mut cells = Vec::with_capacity(self.children.len());
        let (mut x, mut y, mut row_height) = (0u16, 0u16, 0u16);
        for child in &self.children {
            let size = layouts.constraint(*child).min();
            if x > 0 && x.saturating_add(size.width) > width {
                y = y.saturating_add(row_height);
                x = 0;
                row_height = 0;
            }
            cells.push((Position::new(x, y), size));
            x = x.saturating_add(size.width);
            row_height = row_height.max(size.height);
        }
        (cells, y.saturating_add(row_height))
    }
}

impl Control for WrapPanel {
    fn measure(&self, layouts: &Layouts, assigned: Option<Size>) -> Constraint {
        let (widest, total) = self
            .children
            .iter()
            .map(|child| layouts.constraint(*child).min().width)
            .fold((0u16, 0u16), |(widest, total), width| {
                (widest.max(width), total.saturating_add(width))
            });
        let width = assigned.map_or(total, |size| size.width);
        let (_, height) = self.flow(width, layouts);
        Constraint::derived(
            Size::new(widest, height),
            Size::new(total, Size::UNBOUNDED_DIM),
        )
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let (cells, _) = self.flow(size.width, layouts);
        self.children
            .iter()
            .zip(cells)
            .map(|(child, (position, child_size))| Placement::at(*child, position, child_size))
            .collect()
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        self.children
            .iter()
            .find(|child| {
                tree.layouts()
                    .clip(**child)
                    .is_some_and(|clip| clip.contains(position))
            })
            .map(|child| tree.child_cell(*child, position))
            .unwrap_or(Cell::TRANSPARENT)
    }

    fn children(&self) -> Vec<ControlId> {
        self.children.clone()
    }
}

impl Panel for WrapPanel {
    fn children_mut(&mut self) -> &mut Vec<ControlId> {
        &mut self.children
    }
}
