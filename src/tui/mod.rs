//! The control contract and the widgets that implement it.

use std::fmt;

use crate::cell::Cell;
use crate::event::InputListener;
use crate::geometry::{Constraint, Offset, Position, Rect, Size};

pub mod alignment;
pub mod background;
pub mod border;
pub mod canvas;
pub mod context;
pub mod scroll;
pub mod stack;
pub mod style;
pub mod text;
pub mod text_box;
pub mod tree;
pub mod wrap;

use alignment::Alignment;
use background::Background;
use border::Border;
use canvas::Canvas;
use scroll::VerticalScrollPanel;
use stack::VerticalStackPanel;
use style::Style;
use text::TextBlock;
use text_box::TextBox;
use tree::{ControlTree, Layouts};

/// Handle to a control living in a [`context::DrawingContext`].
///
/// Ids are never reused: a freed slot bumps its generation, so handles to
/// removed controls stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}v{}", self.index, self.generation)
    }
}

/// Where a parent puts one child for its current size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub child: ControlId,
    /// Child origin in the parent's coordinates.
    pub origin: Offset,
    /// Size assigned to the child; must satisfy the child's constraint.
    pub size: Size,
    /// Part of the parent through which the child is visible.
    pub clip: Rect,
}

impl Placement {
    /// Child fully visible at `position`
    pub fn at(child: ControlId, position: Position, size: Size) -> Self {
        Self {
            child,
            origin: position.into(),
            size,
            clip: Rect::from_parts(position, size),
        }
    }

    pub fn clipped(child: ControlId, origin: Offset, size: Size, clip: Rect) -> Self {
        Self {
            child,
            origin,
            size,
            clip,
        }
    }
}

/// Repaint request a control raises on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Everything inside the control's assigned size.
    Redraw,
    /// Only this rectangle, in the control's coordinates.
    Update(Rect),
}

impl Invalidation {
    /// Folds a new request into a pending one.
    pub fn merge(pending: Option<Self>, next: Self) -> Self {
        match (pending, next) {
            (Some(Self::Update(a)), Self::Update(b)) => Self::Update(a.union(b)),
            (None, next) => next,
            _ => Self::Redraw,
        }
    }
}

/// Size negotiation and pull-based rendering.
///
/// Controls live in the context's arena and see their children only
/// through ids; the arena answers child constraints and child cells.
pub trait Control {
    /// The sizes this control accepts, given its children's constraints
    /// and, for width-dependent layouts, the size it currently holds.
    fn measure(&self, layouts: &Layouts, assigned: Option<Size>) -> Constraint;

    /// Places the children for an assigned size.
    fn arrange(&mut self, _size: Size, _layouts: &Layouts) -> Vec<Placement> {
        Vec::new()
    }

    /// The cell shown at `position`, which lies inside the assigned `size`.
    fn cell(&self, position: Position, size: Size, tree: &ControlTree) -> Cell;

    fn children(&self) -> Vec<ControlId> {
        Vec::new()
    }

    /// Pending repaint request, if any
    fn take_invalidation(&mut self) -> Option<Invalidation> {
        None
    }
}

/// Single-child wrapper whose content can be swapped.
/// Content only changes through the context, which keeps parent links in
/// step.
pub(crate) trait Decorator {
    /// Installs new content, returning the previous one.
    fn replace_content(&mut self, content: ControlId) -> ControlId;
}

/// Multi-child flow container
pub(crate) trait Panel {
    fn children_mut(&mut self) -> &mut Vec<ControlId>;
}

/// A concrete control type that can be looked up by id.
pub trait Widget: Control + Into<ControlNode> {
    const KIND: &'static str;

    fn downcast(node: &ControlNode) -> Option<&Self>;

    fn downcast_mut(node: &mut ControlNode) -> Option<&mut Self>;
}

macro_rules! control_nodes {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Every kind of control the arena can hold.
        pub enum ControlNode {
            $($variant($ty)),*
        }

        impl ControlNode {
            pub fn kind(&self) -> &'static str {
                match self {
                    $(ControlNode::$variant(_) => <$ty as Widget>::KIND),*
                }
            }

            fn control(&self) -> &dyn Control {
                match self {
                    $(ControlNode::$variant(control) => control as &dyn Control),*
                }
            }

            fn control_mut(&mut self) -> &mut dyn Control {
                match self {
                    $(ControlNode::$variant(control) => control as &mut dyn Control),*
                }
            }
        }

        $(
            impl From<$ty> for ControlNode {
                fn from(control: $ty) -> Self {
                    ControlNode::$variant(control)
                }
            }

            impl Widget for $ty {
                const KIND: &'static str = stringify!($variant);

                fn downcast(node: &ControlNode) -> Option<&Self> {
                    match node {
                        ControlNode::$variant(control) => Some(control),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn downcast_mut(node: &mut ControlNode) -> Option<&mut Self> {
                    match node {
                        ControlNode::$variant(control) => Some(control),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}

control_nodes! {
    TextBlock(TextBlock),
    TextBox(TextBox),
    Border(Border),
    Background(Background),
    Style(Style),
    Alignment(Alignment),
    VerticalStackPanel(VerticalStackPanel),
    WrapPanel(wrap::WrapPanel),
    Canvas(Canvas),
    VerticalScrollPanel(VerticalScrollPanel),
}

impl ControlNode {
    pub fn measure(&self, layouts: &Layouts, assigned: Option<Size>) -> Constraint {
        self.control().measure(layouts, assigned)
    }

    pub fn arrange(&mut self, size: Size, layouts: &Layouts) -> Vec<Placement> {
        self.control_mut().arrange(size, layouts)
    }

    pub fn cell(&self, position: Position, size: Size, tree: &ControlTree) -> Cell {
        self.control().cell(position, size, tree)
    }

    pub fn children(&self) -> Vec<ControlId> {
        self.control().children()
    }

    pub fn take_invalidation(&mut self) -> Option<Invalidation> {
        self.control_mut().take_invalidation()
    }

    pub fn as_listener_mut(&mut self) -> Option<&mut dyn InputListener> {
        match self {
            ControlNode::TextBox(text_box) => Some(text_box as &mut dyn InputListener),
            ControlNode::VerticalScrollPanel(scroll) => Some(scroll as &mut dyn InputListener),
            _ => None,
        }
    }

    pub(crate) fn as_decorator_mut(&mut self) -> Option<&mut dyn Decorator> {
        match self {
            ControlNode::Border(border) => Some(border as &mut dyn Decorator),
            ControlNode::Background(background) => Some(background as &mut dyn Decorator),
            ControlNode::Style(style) => Some(style as &mut dyn Decorator),
            ControlNode::Alignment(alignment) => Some(alignment as &mut dyn Decorator),
            ControlNode::VerticalScrollPanel(scroll) => Some(scroll as &mut dyn Decorator),
            _ => None,
        }
    }

    pub(crate) fn as_panel_mut(&mut self) -> Option<&mut dyn Panel> {
        match self {
            ControlNode::VerticalStackPanel(stack) => Some(stack as &mut dyn Panel),
            ControlNode::WrapPanel(wrap) => Some(wrap as &mut dyn Panel),
            _ => None,
        }
    }
}
