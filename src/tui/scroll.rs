use crossterm::event::KeyCode;

use crate::cell::Cell;
use crate::event::{InputEvent, InputListener};
use crate::geometry::{Constraint, Offset, Position, Size};
use crate::tui::tree::{ControlTree, Layouts};
use crate::tui::{Control, ControlId, Decorator, Invalidation, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    LineUp,
    LineDown,
    /// One viewport less one line, so a line of context stays visible.
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Keys a [`VerticalScrollPanel`] reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollKeymap {
    bindings: Vec<(KeyCode, ScrollAction)>,
}

impl Default for ScrollKeymap {
    fn default() -> Self {
        Self::empty()
            .bind(KeyCode::Up, ScrollAction::LineUp)
            .bind(KeyCode::Down, ScrollAction::LineDown)
            .bind(KeyCode::PageUp, ScrollAction::PageUp)
            .bind(KeyCode::PageDown, ScrollAction::PageDown)
            .bind(KeyCode::Home, ScrollAction::Top)
            .bind(KeyCode::End, ScrollAction::Bottom)
    }
}

impl ScrollKeymap {
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds `code`, replacing any earlier binding for it.
    pub fn bind(mut self, code: KeyCode, action: ScrollAction) -> Self {
        self.bindings.retain(|(bound, _)| *bound != code);
        self.bindings.push((code, action));
        self
    }

    pub fn action(&self, code: KeyCode) -> Option<ScrollAction> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, action)| *action)
    }
}

/// Shows a window of its content, which is laid out at its full minimum
/// height and shifted up by `top` rows.
pub struct VerticalScrollPanel {
    content: ControlId,
    top: u16,
    viewport_height: u16,
    content_height: u16,
    keymap: ScrollKeymap,
    invalidation: Option<Invalidation>,
}

impl VerticalScrollPanel {
    pub fn new(content: ControlId) -> Self {
        Self {
            content,
            top: 0,
            viewport_height: 0,
            content_height: 0,
            keymap: ScrollKeymap::default(),
            invalidation: None,
        }
    }

    pub fn with_keymap(mut self, keymap: ScrollKeymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn keymap(&self) -> &ScrollKeymap {
        &self.keymap
    }

    /// First content row shown
    pub fn top(&self) -> u16 {
        self.top
    }

    pub fn viewport_height(&self) -> u16 {
        self.viewport_height
    }

    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    fn max_top(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Scrolls to `top`, clamped to the content. Returns whether the view
    /// moved.
    pub fn set_top(&mut self, top: u16) -> bool {
        let top = top.min(self.max_top());
        if top == self.top {
            return false;
        }
        self.top = top;
        self.invalidation = Some(Invalidation::Redraw);
        true
    }

    pub fn scroll(&mut self, action: ScrollAction) -> bool {
        let page = self.viewport_height.saturating_sub(1).max(1);
        let top = match action {
            ScrollAction::LineUp => self.top.saturating_sub(1),
            ScrollAction::LineDown => self.top.saturating_add(1),
            ScrollAction::PageUp => self.top.saturating_sub(page),
            ScrollAction::PageDown => self.top.saturating_add(page),
            ScrollAction::Top => 0,
            ScrollAction::Bottom => self.max_top(),
        };
        self.set_top(top)
    }
}

impl Control for VerticalScrollPanel {
    fn measure(&self, layouts: &Layouts, _assigned: Option<Size>) -> Constraint {
        let content = layouts.constraint(self.content);
        Constraint::derived(
            Size::new(content.min().width, 1),
            Size::new(content.max().width, Size::UNBOUNDED_DIM),
        )
    }

    fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        let content = layouts.constraint(self.content);
        let content_size = Size::new(
            size.width
                .clamp(content.min().width, content.max().width),
            content.min().height,
        );
        self.viewport_height = size.height;
        self.content_height = content_size.height;
        self.top = self.top.min(self.max_top());
        vec![Placement::clipped(
            self.content,
            Offset::new(0, -i32::from(self.top)),
            content_size,
            size.as_rect(),
        )]
    }

    fn cell(&self, position: Position, _size: Size, tree: &ControlTree) -> Cell {
        tree.child_cell(self.content, position)
    }

    fn children(&self) -> Vec<ControlId> {
        vec![self.content]
    }

    fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.invalidation.take()
    }
}

impl VerticalScrollPanel {
    pub fn content(&self) -> ControlId {
        self.content
    }
}

impl Decorator for VerticalScrollPanel {
    fn replace_content(&mut self, content: ControlId) -> ControlId {
        std::mem::replace(&mut self.content, content)
    }
}

impl InputListener for VerticalScrollPanel {
    fn on_input(&mut self, event: &mut InputEvent) {
        if event.handled() || !event.is_press() {
            return;
        }
        let Some(action) = self.keymap.action(event.key().code) else {
            return;
        };
        if self.scroll(action) {
            event.set_handled();
        }
    }
}
