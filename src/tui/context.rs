//! Hosting a control tree on a display.
//!
//! The context owns every control, lays the displayed tree out against its
//! physical constraint, and turns Redraw/Update requests into damage
//! rectangles in absolute coordinates. Writing those rectangles to a device
//! is left to an [`OutputSurface`].

use tracing::{debug, trace, warn};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::event::InputEvent;
use crate::geometry::{Constraint, Position, Rect};
use crate::surface::{OutputSurface, Palette, ResolvedCell};
use crate::tui::canvas::Canvas;
use crate::tui::tree::ControlTree;
use crate::tui::{ControlId, ControlNode, Invalidation, Widget};

#[derive(Debug, Clone, Copy)]
pub struct ContextConfig {
    /// Resolves transparent channels on flush.
    pub palette: Palette,
    /// Upper bound on layout passes caused by size-dependent constraints.
    pub max_layout_passes: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            max_layout_passes: 8,
        }
    }
}

pub struct DrawingContext {
    constraint: Constraint,
    config: ContextConfig,
    tree: ControlTree,
    root: Option<ControlId>,
    damage: Vec<Rect>,
}

impl DrawingContext {
    pub fn new(constraint: Constraint) -> Self {
        Self::with_config(constraint, ContextConfig::default())
    }

    pub fn with_config(constraint: Constraint, config: ContextConfig) -> Self {
        Self {
            constraint,
            config,
            tree: ControlTree::new(),
            root: None,
            damage: Vec::new(),
        }
    }

    /// A context sized to the device it will be flushed to.
    pub fn for_surface(surface: &impl OutputSurface) -> Self {
        Self::new(surface.constraint())
    }

    pub fn constraint(&self) -> Constraint {
        self.constraint
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    pub fn root(&self) -> Option<ControlId> {
        self.root
    }

    /// Adds a detached control; it shows once attached to the displayed
    /// tree.
    pub fn insert(&mut self, control: impl Into<ControlNode>) -> Result<ControlId> {
        let node = control.into();
        if let Some(root) = self.root {
            if node.children().contains(&root) {
                return Err(Error::AlreadyAttached(root));
            }
        }
        self.tree.insert(node)
    }

    /// Displays `id`, replacing the current root. Returns the previous root,
    /// which is now detached.
    pub fn set_root(&mut self, id: ControlId) -> Result<Option<ControlId>> {
        if !self.tree.contains(id) {
            return Err(Error::UnknownControl(id));
        }
        if self.tree.parent(id).is_some() {
            return Err(Error::AlreadyAttached(id));
        }
        let previous = self.root.replace(id);
        if let Some(old) = previous.and_then(|old| self.tree.size(old)) {
            self.push_damage(old.as_rect());
        }
        debug!("root {previous:?} -> {id}");
        self.layout_root()?;
        self.redraw(id);
        Ok(previous)
    }

    /// Stops displaying anything.
    pub fn clear_root(&mut self) -> Option<ControlId> {
        let previous = self.root.take();
        if let Some(old) = previous.and_then(|old| self.tree.size(old)) {
            self.push_damage(old.as_rect());
        }
        previous
    }

    /// Whether `id` is part of the tree currently shown.
    pub fn is_displayed(&self, id: ControlId) -> bool {
        match self.root {
            Some(root) if self.tree.contains(id) => self.tree.ancestry(id).last() == Some(root),
            _ => false,
        }
    }

    pub fn widget<W: Widget>(&self, id: ControlId) -> Result<&W> {
        self.tree.widget(id)
    }

    /// Mutates a control in place. Constraint changes are propagated and
    /// the affected region is invalidated before this returns.
    pub fn modify<W: Widget, R>(&mut self, id: ControlId, f: impl FnOnce(&mut W) -> R) -> Result<R> {
        let widget = self.tree.widget_mut::<W>(id)?;
        let output = f(&mut *widget);
        let invalidation = widget.take_invalidation();
        self.settle(id, invalidation)?;
        Ok(output)
    }

    /// Swaps the content of a single-child control, returning the detached
    /// previous content.
    pub fn set_content(&mut self, decorator: ControlId, content: ControlId) -> Result<ControlId> {
        if self.tree.get_mut(decorator)?.as_decorator_mut().is_none() {
            return Err(Error::NotAContainer(decorator));
        }
        self.ensure_not_root(content)?;
        self.tree.attach(decorator, content)?;
        let previous = self
            .tree
            .get_mut(decorator)?
            .as_decorator_mut()
            .map(|decorator| decorator.replace_content(content))
            .ok_or(Error::NotAContainer(decorator))?;
        self.tree.detach(previous);
        self.settle(decorator, Some(Invalidation::Redraw))?;
        Ok(previous)
    }

    /// Appends a child to a stack or wrap panel.
    pub fn push_child(&mut self, panel: ControlId, child: ControlId) -> Result<()> {
        if self.tree.get_mut(panel)?.as_panel_mut().is_none() {
            return Err(Error::NotAContainer(panel));
        }
        self.ensure_not_root(child)?;
        self.tree.attach(panel, child)?;
        if let Some(panel) = self.tree.get_mut(panel)?.as_panel_mut() {
            panel.children_mut().push(child);
        }
        self.settle(panel, Some(Invalidation::Redraw))
    }

    /// Adds a child to a canvas, painted above every earlier entry.
    pub fn add_to_canvas(&mut self, canvas: ControlId, child: ControlId, rect: Rect) -> Result<()> {
        if rect.is_empty() {
            return Err(Error::EmptyCanvasEntry { rect });
        }
        self.tree.widget::<Canvas>(canvas)?;
        self.ensure_not_root(child)?;
        self.tree.attach(canvas, child)?;
        self.tree.widget_mut::<Canvas>(canvas)?.push_entry(child, rect)?;
        self.settle(canvas, Some(Invalidation::Redraw))
    }

    /// Moves (and resizes) an existing canvas entry, keeping its paint
    /// order.
    pub fn move_in_canvas(&mut self, canvas: ControlId, child: ControlId, rect: Rect) -> Result<()> {
        if rect.is_empty() {
            return Err(Error::EmptyCanvasEntry { rect });
        }
        if !self.tree.widget_mut::<Canvas>(canvas)?.set_rect(child, rect) {
            return Err(Error::NotAChild {
                parent: canvas,
                child,
            });
        }
        self.settle(canvas, Some(Invalidation::Redraw))
    }

    /// Detaches a child from a panel or canvas. Single-child controls
    /// always need content; use [`Self::set_content`] for those.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        if self.tree.parent(child) != Some(parent) {
            return Err(Error::NotAChild { parent, child });
        }
        let node = self.tree.get_mut(parent)?;
        if let Some(panel) = node.as_panel_mut() {
            panel.children_mut().retain(|existing| *existing != child);
        } else if let Some(canvas) = Canvas::downcast_mut(node) {
            canvas.remove_entry(child);
        } else {
            return Err(Error::NotAContainer(parent));
        }
        self.tree.detach(child);
        self.settle(parent, Some(Invalidation::Redraw))
    }

    /// Frees a detached subtree. Its ids stop resolving.
    pub fn remove(&mut self, id: ControlId) -> Result<()> {
        if self.root == Some(id) {
            return Err(Error::StillAttached(id));
        }
        self.tree.remove(id)
    }

    /// Host resize: lays the root out again against the new limits.
    pub fn resize(&mut self, constraint: Constraint) -> Result<()> {
        debug!("resize {:?} -> {:?}", self.constraint, constraint);
        self.constraint = constraint;
        self.damage
            .retain(|rect| constraint.max().as_rect().covers(*rect));
        self.layout_root()?;
        if let Some(root) = self.root {
            self.redraw(root);
        }
        Ok(())
    }

    /// Offers `event` to one control. Controls that don't listen for input
    /// decline silently.
    pub fn deliver(&mut self, id: ControlId, event: &mut InputEvent) -> Result<()> {
        let node = self.tree.get_mut(id)?;
        let Some(listener) = node.as_listener_mut() else {
            return Ok(());
        };
        listener.on_input(event);
        match node.take_invalidation() {
            Some(invalidation) => self.settle(id, Some(invalidation)),
            None => Ok(()),
        }
    }

    /// Offers `event` to each control in `order` until one handles it.
    pub fn dispatch(&mut self, order: &[ControlId], event: &mut InputEvent) -> Result<()> {
        for id in order {
            if event.handled() {
                break;
            }
            self.deliver(*id, event)?;
        }
        Ok(())
    }

    /// Requests a repaint of everything `id` covers.
    pub fn redraw(&mut self, id: ControlId) {
        match self.tree.size(id) {
            Some(size) => self.update(id, size.as_rect()),
            None => trace!("dropping redraw of {id}: never laid out"),
        }
    }

    /// Requests a repaint of `rect`, given in `id`'s coordinates. Requests
    /// from controls outside the displayed tree are dropped.
    pub fn update(&mut self, id: ControlId, rect: Rect) {
        if !self.is_displayed(id) {
            trace!("dropping update of {id}: not displayed");
            return;
        }
        if let Some((_, absolute)) = self.tree.to_top(id, rect) {
            self.push_damage(absolute);
        }
    }

    /// The displayed cell at an absolute position.
    pub fn cell(&self, position: Position) -> Cell {
        match self.root {
            Some(root) => self.tree.cell(root, position),
            None => Cell::TRANSPARENT,
        }
    }

    /// Pending damage, in absolute coordinates.
    pub fn damage(&self) -> &[Rect] {
        &self.damage
    }

    pub fn take_damage(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.damage)
    }

    /// Writes every damaged region to `surface`.
    pub fn flush(&mut self, surface: &mut impl OutputSurface) -> Result<()> {
        for rect in self.take_damage() {
            let cells: Vec<ResolvedCell> = rect
                .into_iter()
                .map(|position| self.config.palette.resolve(self.cell(position)))
                .collect();
            trace!("flush {rect:?}");
            surface.write(rect, &cells)?;
        }
        Ok(())
    }

    fn ensure_not_root(&self, id: ControlId) -> Result<()> {
        if self.root == Some(id) {
            return Err(Error::AlreadyAttached(id));
        }
        Ok(())
    }

    /// Queues `rect`, clipped to the physical bounds, unless queued damage
    /// already covers it.
    fn push_damage(&mut self, rect: Rect) {
        let Some(rect) = rect.intersection(self.constraint.max().as_rect()) else {
            return;
        };
        if self.damage.iter().any(|queued| queued.covers(rect)) {
            return;
        }
        trace!("damage {rect:?}");
        self.damage.retain(|queued| !rect.covers(*queued));
        self.damage.push(rect);
    }

    /// Brings layout up to date after `id` changed, then queues its
    /// repaint.
    fn settle(&mut self, id: ControlId, invalidation: Option<Invalidation>) -> Result<()> {
        let entry = self.canvas_entry(id);
        let before = entry.and_then(|(_, child)| self.tree.placed(child));
        match (self.reflow(id)?, invalidation) {
            (Some(anchor), _) if anchor != id => match entry {
                // Canvas entries are laid out independently; only the
                // moved entry needs paint.
                Some((canvas, child)) if canvas == anchor => {
                    let after = self.tree.placed(child);
                    match before.into_iter().chain(after).reduce(|a, b| a.union(b)) {
                        Some(area) => self.update(canvas, area),
                        None => self.redraw(canvas),
                    }
                }
                _ => self.redraw(anchor),
            },
            (_, Some(Invalidation::Update(rect))) => self.update(id, rect),
            (_, Some(Invalidation::Redraw)) => self.redraw(id),
            _ => {}
        }
        Ok(())
    }

    /// Nearest canvas above `id`, with the entry that leads down to it.
    fn canvas_entry(&self, id: ControlId) -> Option<(ControlId, ControlId)> {
        self.tree.ancestry(id).find_map(|child| {
            let parent = self.tree.parent(child)?;
            self.tree.widget::<Canvas>(parent).ok().map(|_| (parent, child))
        })
    }

    /// Re-measures `id` and its ancestors, then lays out again from the
    /// control that absorbed the change. Returns that control when it is
    /// displayed.
    fn reflow(&mut self, id: ControlId) -> Result<Option<ControlId>> {
        let anchor = if self.tree.remeasure(id) {
            self.propagate(id)
        } else {
            id
        };
        if !self.is_displayed(anchor) {
            return Ok(None);
        }
        self.relayout(anchor).map(Some)
    }

    /// Walks a constraint change up the ancestry. Returns the first
    /// ancestor whose own constraint held, or the top of the ancestry.
    fn propagate(&mut self, id: ControlId) -> ControlId {
        let mut current = id;
        while let Some(parent) = self.tree.parent(current) {
            current = parent;
            if !self.tree.remeasure(parent) {
                break;
            }
        }
        current
    }

    fn relayout(&mut self, anchor: ControlId) -> Result<ControlId> {
        let size = match self.tree.size(anchor) {
            Some(size) if self.root != Some(anchor) => size,
            _ => {
                self.layout_root()?;
                return Ok(self.root.unwrap_or(anchor));
            }
        };
        let mut remeasured = Vec::new();
        self.tree.layout(anchor, size, &mut remeasured)?;
        if remeasured.is_empty() {
            return Ok(anchor);
        }
        for id in remeasured {
            self.propagate(id);
        }
        self.layout_root()?;
        Ok(self.root.unwrap_or(anchor))
    }

    /// Lays the root out against the physical limits until no
    /// size-dependent constraint moves.
    fn layout_root(&mut self) -> Result<()> {
        let Some(root) = self.root else {
            return Ok(());
        };
        for pass in 0..self.config.max_layout_passes {
            let previous = self.tree.size(root);
            let size = self.tree.constraint(root).clamp(self.constraint.max());
            let mut remeasured = Vec::new();
            self.tree.layout(root, size, &mut remeasured)?;
            if let Some(previous) = previous.filter(|previous| *previous != size) {
                self.push_damage(previous.as_rect().union(size.as_rect()));
            }
            debug!("layout pass {pass}: root {root} at {size:?}");
            if remeasured.is_empty() {
                return Ok(());
            }
            for id in remeasured {
                self.propagate(id);
            }
        }
        warn!(
            "layout did not settle after {} passes",
            self.config.max_layout_passes
        );
        Ok(())
    }
}
