//! Toolkit error types.

use thiserror::Error;

use crate::geometry::{Constraint, Rect, Size};
use crate::tui::ControlId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid constraint: min {min:?} exceeds max {max:?}")]
    InvalidConstraint { min: Size, max: Size },

    #[error("{control} assigned {size:?} outside its constraint {constraint:?}")]
    SizeOutOfBounds {
        control: ControlId,
        size: Size,
        constraint: Constraint,
    },

    #[error("canvas entry {rect:?} has no area")]
    EmptyCanvasEntry { rect: Rect },

    #[error("unknown control: {0}")]
    UnknownControl(ControlId),

    #[error("{control} is not a {expected}")]
    WrongKind {
        control: ControlId,
        expected: &'static str,
    },

    #[error("{0} cannot hold children")]
    NotAContainer(ControlId),

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: ControlId, child: ControlId },

    #[error("{0} is already attached")]
    AlreadyAttached(ControlId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: ControlId, child: ControlId },

    #[error("{0} is still attached")]
    StillAttached(ControlId),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
