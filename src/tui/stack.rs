use crate::cell::Cell;
use crate::geometry::{Constraint, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Panel, Placement};

/// Children top to bottom, each at its minimum height
#[derive(Debug, Default)]
pub struct VerticalStackPanel {
    children: Vec<ControlId>,
}

impl VerticalStackPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(children: impl IntoIterator<Item = ControlId>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }
}

impl Control for VerticalStackPanel {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        let (min, max) = self
            .children
            .iter()
            .map(|child| layouts.constraint(*child))
            .fold((Size::ZERO, Size::ZERO), |(min, max), child| {
                (
                    Size::new(
                        min.width.max(child.min().width),
                        min.height.saturating_add(child.min().height),
                    ),
                    Size::new(
                        max.width.max(child.max().width),
                        max.height.saturating_add(child.max().height),
                    ),
                )
            });
        Constraint::derived(min, max)
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let mut y = 0u16;
        self.children
            .iter()
            .map(|child| {
                let constraint = layouts.constraint(*child);
                let child_size = Size::new(
                    size.width
                        .clamp(constraint.min().width, constraint.max().width),
                    constraint.min().height,
                );
                let placement = Placement::at(*child, Position::new(0, y), child_size);
                y = y.saturating_add(child_size.height);
                placement
            })
            .collect()
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        // Rows are disjoint, so the first child whose clip holds the row wins.
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

impl Panel for VerticalStackPanel {
    fn children_mut(&mut self) -> &mut Vec<ControlId> {
        &mut self.children
    }
}
