use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::geometry::{Constraint, Offset, Position, Rect, Size};
use crate::tui::{ControlId, ControlNode, Placement, Widget};
use tracing::debug;

/// Per-control layout state, kept beside the controls themselves.
#[derive(Debug, Clone)]
struct LayoutSlot {
    generation: u32,
    live: bool,
    parent: Option<ControlId>,
    constraint: Constraint,
    /// Assigned size; `None` until the control is first laid out.
    size: Option<Size>,
    origin: Offset,
    clip: Rect,
}

/// Read access to the layout state of every control.
///
/// Handed to [`crate::tui::Control::measure`] and
/// [`crate::tui::Control::arrange`] so containers can read their
/// children's constraints while being mutated themselves.
#[derive(Debug, Default)]
pub struct Layouts {
    slots: Vec<LayoutSlot>,
}

impl Layouts {
    fn slot(&self, id: ControlId) -> Option<&LayoutSlot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.live && slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: ControlId) -> Option<&mut LayoutSlot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.live && slot.generation == id.generation)
    }

    /// Constraint of a live control; nothing fits an unknown one.
    pub fn constraint(&self, id: ControlId) -> Constraint {
        self.slot(id)
            .map(|slot| slot.constraint)
            .unwrap_or(Constraint::fixed(Size::ZERO))
    }

    pub fn size(&self, id: ControlId) -> Option<Size> {
        self.slot(id).and_then(|slot| slot.size)
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    pub fn origin(&self, id: ControlId) -> Option<Offset> {
        self.slot(id).map(|slot| slot.origin)
    }

    pub fn clip(&self, id: ControlId) -> Option<Rect> {
        self.slot(id).map(|slot| slot.clip)
    }
}

/// Arena holding every control of a context.
///
/// Controls are stored in a flat vector and referenced by [`ControlId`];
/// layout state lives in a parallel vector so a container can be mutated
/// while its children's constraints are read.
#[derive(Default)]
pub struct ControlTree {
    controls: Vec<Option<ControlNode>>,
    layouts: Layouts,
    free: Vec<u32>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached control. Children it references become attached to
    /// it and must not already have a parent.
    pub fn insert(&mut self, node: ControlNode) -> Result<ControlId> {
        let children = node.children();
        for (i, child) in children.iter().enumerate() {
            if self.layouts.slot(*child).is_none() {
                return Err(Error::UnknownControl(*child));
            }
            if self.layouts.parent(*child).is_some() || children[..i].contains(child) {
                return Err(Error::AlreadyAttached(*child));
            }
        }

        let constraint = node.measure(&self.layouts, None);
        let id = self.allocate(constraint);
        self.controls[id.index as usize] = Some(node);
        for child in children {
            if let Some(slot) = self.layouts.slot_mut(child) {
                slot.parent = Some(id);
            }
        }
        debug!("insert {id}: constraint={constraint:?}");
        Ok(id)
    }

    fn allocate(&mut self, constraint: Constraint) -> ControlId {
        let fresh = |generation| LayoutSlot {
            generation,
            live: true,
            parent: None,
            constraint,
            size: None,
            origin: Offset::default(),
            clip: Rect::default(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.layouts.slots[index as usize];
                let generation = slot.generation + 1;
                *slot = fresh(generation);
                ControlId { index, generation }
            }
            None => {
                let index = self.controls.len() as u32;
                self.controls.push(None);
                self.layouts.slots.push(fresh(0));
                ControlId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.layouts.slot(id).is_some()
    }

    pub fn get(&self, id: ControlId) -> Result<&ControlNode> {
        self.layouts
            .slot(id)
            .and_then(|_| self.controls.get(id.index as usize))
            .and_then(Option::as_ref)
            .ok_or(Error::UnknownControl(id))
    }

    pub fn get_mut(&mut self, id: ControlId) -> Result<&mut ControlNode> {
        if self.layouts.slot(id).is_none() {
            return Err(Error::UnknownControl(id));
        }
        self.controls
            .get_mut(id.index as usize)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownControl(id))
    }

    pub fn widget<W: Widget>(&self, id: ControlId) -> Result<&W> {
        W::downcast(self.get(id)?).ok_or(Error::WrongKind {
            control: id,
            expected: W::KIND,
        })
    }

    pub fn widget_mut<W: Widget>(&mut self, id: ControlId) -> Result<&mut W> {
        W::downcast_mut(self.get_mut(id)?).ok_or(Error::WrongKind {
            control: id,
            expected: W::KIND,
        })
    }

    pub fn layouts(&self) -> &Layouts {
        &self.layouts
    }

    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.layouts.parent(id)
    }

    pub fn size(&self, id: ControlId) -> Option<Size> {
        self.layouts.size(id)
    }

    pub fn constraint(&self, id: ControlId) -> Constraint {
        self.layouts.constraint(id)
    }

    /// `id` followed by each of its ancestors, innermost first.
    pub fn ancestry(&self, id: ControlId) -> impl Iterator<Item = ControlId> + '_ {
        std::iter::successors(Some(id), |current| self.layouts.parent(*current))
    }

    /// Cell of `id` at a position in its own coordinates. Positions outside
    /// the assigned size are transparent.
    pub fn cell(&self, id: ControlId, position: Position) -> Cell {
        let Some(size) = self.layouts.size(id) else {
            return Cell::TRANSPARENT;
        };
        if !size.as_rect().contains(position) {
            return Cell::TRANSPARENT;
        }
        match self.controls.get(id.index as usize) {
            Some(Some(node)) => node.cell(position, size, self),
            _ => Cell::TRANSPARENT,
        }
    }

    /// Cell of a child at a position in its parent's coordinates, through
    /// the child's placement and clip.
    pub fn child_cell(&self, child: ControlId, position: Position) -> Cell {
        let Some(slot) = self.layouts.slot(child) else {
            return Cell::TRANSPARENT;
        };
        if !slot.clip.contains(position) {
            return Cell::TRANSPARENT;
        }
        match slot.origin.to_local(position) {
            Some(local) => self.cell(child, local),
            None => Cell::TRANSPARENT,
        }
    }

    pub(crate) fn attach(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        if !self.contains(child) {
            return Err(Error::UnknownControl(child));
        }
        if !self.contains(parent) {
            return Err(Error::UnknownControl(parent));
        }
        if self.layouts.parent(child).is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if self.ancestry(parent).any(|ancestor| ancestor == child) {
            return Err(Error::Cycle { parent, child });
        }
        if let Some(slot) = self.layouts.slot_mut(child) {
            slot.parent = Some(parent);
        }
        debug!("attach {child} under {parent}");
        Ok(())
    }

    /// Unlinks a subtree from its parent. The subtree keeps its own
    /// structure and can be attached elsewhere.
    pub(crate) fn detach(&mut self, child: ControlId) {
        if let Some(slot) = self.layouts.slot_mut(child) {
            slot.parent = None;
            slot.origin = Offset::default();
            slot.clip = Rect::default();
            debug!("detach {child}");
        }
    }

    /// Frees a parentless subtree.
    pub(crate) fn remove(&mut self, id: ControlId) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::UnknownControl(id));
        }
        if self.layouts.parent(id).is_some() {
            return Err(Error::StillAttached(id));
        }
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.controls[current.index as usize].take() {
                pending.extend(node.children());
            }
            if let Some(slot) = self.layouts.slot_mut(current) {
                slot.live = false;
                slot.parent = None;
                self.free.push(current.index);
            }
        }
        debug!("remove {id}");
        Ok(())
    }

    /// Re-measures `id`, true when its constraint moved
    pub(crate) fn remeasure(&mut self, id: ControlId) -> bool {
        let Self {
            controls, layouts, ..
        } = self;
        let Some(Some(node)) = controls.get(id.index as usize) else {
            return false;
        };
        let Some(slot) = layouts.slot(id) else {
            return false;
        };
        let constraint = node.measure(layouts, slot.size);
        match layouts.slot_mut(id) {
            Some(slot) if slot.constraint != constraint => {
                slot.constraint = constraint;
                true
            }
            _ => false,
        }
    }

    /// Assigns `size` to `id` and lays out its subtree. Controls whose
    /// constraint depends on the size they got are collected in
    /// `remeasured` when that constraint moved.
    pub(crate) fn layout(
        &mut self,
        id: ControlId,
        size: Size,
        remeasured: &mut Vec<ControlId>,
    ) -> Result<()> {
        let constraint = self.constraint(id);
        if !constraint.contains(size) {
            return Err(Error::SizeOutOfBounds {
                control: id,
                size,
                constraint,
            });
        }
        match self.layouts.slot_mut(id) {
            Some(slot) => slot.size = Some(size),
            None => return Err(Error::UnknownControl(id)),
        }

        let Self {
            controls, layouts, ..
        } = self;
        let placements: Vec<Placement> = match controls.get_mut(id.index as usize) {
            Some(Some(node)) => node.arrange(size, layouts),
            _ => return Err(Error::UnknownControl(id)),
        };

        let bounds = size.as_rect();
        for placement in placements {
            if let Some(slot) = self.layouts.slot_mut(placement.child) {
                slot.origin = placement.origin;
                slot.clip = placement.clip.intersection(bounds).unwrap_or_default();
            }
            self.layout(placement.child, placement.size, remeasured)?;
        }

        if self.remeasure(id) {
            remeasured.push(id);
        }
        Ok(())
    }

    /// Maps a rectangle in `id`'s coordinates to the coordinates of the top
    /// of its ancestry, clipping through every placement on the way.
    pub(crate) fn to_top(&self, id: ControlId, rect: Rect) -> Option<(ControlId, Rect)> {
        let size = self.layouts.size(id)?;
        let mut current = id;
        let mut rect = rect.intersection(size.as_rect())?;
        while let Some(parent) = self.layouts.parent(current) {
            let slot = self.layouts.slot(current)?;
            rect = slot.origin.to_parent(rect)?.intersection(slot.clip)?;
            current = parent;
        }
        Some((current, rect))
    }

    /// Visible area of `id` in its parent's coordinates
    pub(crate) fn placed(&self, id: ControlId) -> Option<Rect> {
        let slot = self.layouts.slot(id)?;
        slot.origin
            .to_parent(slot.size?.as_rect())?
            .intersection(slot.clip)
    }
}
