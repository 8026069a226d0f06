//! Positions, sizes, rectangles and size constraints.
//!
//! All coordinates are cell units local to the control that owns them.

use crate::error::{Error, Result};

/// Cell coordinate inside a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    /// No upper bound
    pub const UNBOUNDED_DIM: u16 = u16::MAX;

    pub const ZERO: Self = Self::new(0, 0);
    pub const UNBOUNDED: Self = Self::new(Self::UNBOUNDED_DIM, Self::UNBOUNDED_DIM);

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Same size, anchored at the origin
    pub const fn as_rect(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Componentwise `self <= other`.
    pub const fn fits_in(self, other: Self) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Adds to both dimensions; unbounded dimensions stay unbounded.
    pub fn grow(self, width: u16, height: u16) -> Self {
        Self::new(
            self.width.saturating_add(width),
            self.height.saturating_add(height),
        )
    }

    pub fn shrink(self, width: u16, height: u16) -> Self {
        Self::new(
            shrink_dim(self.width, width),
            shrink_dim(self.height, height),
        )
    }
}

fn shrink_dim(value: u16, by: u16) -> u16 {
    if value == Size::UNBOUNDED_DIM {
        value
    } else {
        value.saturating_sub(by)
    }
}

/// Signed displacement of a child's origin inside its parent.
///
/// Scrolled content sits above its viewport, hence the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Maps a parent position into the child's space, if it lands at a
    /// non-negative coordinate.
    pub fn to_local(self, position: Position) -> Option<Position> {
        let x = i32::from(position.x) - self.dx;
        let y = i32::from(position.y) - self.dy;
        Some(Position::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }

    /// Moves a child-space rectangle into the parent's space, dropping the
    /// part that falls at negative coordinates.
    pub fn to_parent(self, rect: Rect) -> Option<Rect> {
        let x0 = (i32::from(rect.x) + self.dx).max(0);
        let y0 = (i32::from(rect.y) + self.dy).max(0);
        let x1 = (i32::from(rect.x) + i32::from(rect.width) + self.dx).min(i32::from(u16::MAX));
        let y1 = (i32::from(rect.y) + i32::from(rect.height) + self.dy).min(i32::from(u16::MAX));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        // All four bounds are in [0, u16::MAX] here.
        Some(Rect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }
}

impl From<Position> for Offset {
    fn from(position: Position) -> Self {
        Self::new(i32::from(position.x), i32::from(position.y))
    }
}

/// An axis-aligned rectangle of cells.
///
/// Iterating a `Rect` yields every covered [`Position`] in row-major order.
/// The rectangle is `Copy`, so the sequence can be restarted at will.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Extents past the end of the coordinate space are cut off.
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width: clamp_extent(x, width),
            height: clamp_extent(y, height),
        }
    }

    pub const fn from_parts(origin: Position, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.right()
            && position.y >= self.y
            && position.y < self.bottom()
    }

    /// Overlapping region, or `None` when the rectangles only touch or are
    /// disjoint.
    pub fn intersection(&self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Bounding box of both
    pub fn union(&self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Whether `other` lies entirely within this rectangle.
    pub fn covers(&self, other: Rect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    pub fn positions(&self) -> Positions {
        Positions {
            rect: Rect::new(self.x, self.y, self.width, self.height),
            index: 0,
        }
    }
}

const fn clamp_extent(start: u16, extent: u16) -> u16 {
    let room = u16::MAX - start;
    if extent > room { room } else { extent }
}

impl IntoIterator for Rect {
    type Item = Position;
    type IntoIter = Positions;

    fn into_iter(self) -> Positions {
        self.positions()
    }
}

/// Row-major walk over the cells of a [`Rect`].
#[derive(Debug, Clone)]
pub struct Positions {
    rect: Rect,
    index: usize,
}

impl Iterator for Positions {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.index >= self.rect.area() {
            return None;
        }
        let width = self.rect.width as usize;
        let x = self.rect.x as usize + self.index % width;
        let y = self.rect.y as usize + self.index / width;
        self.index += 1;
        // Clamped in Rect::new, so x < right() and y < bottom().
        Some(Position::new(x as u16, y as u16))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rect.area() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

/// The range of sizes a control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    min: Size,
    max: Size,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::UNCONSTRAINED
    }
}

impl Constraint {
    pub const UNCONSTRAINED: Self = Self {
        min: Size::ZERO,
        max: Size::UNBOUNDED,
    };

    /// Fails with [`Error::InvalidConstraint`] when `min` exceeds `max` on
    /// either axis.
    pub fn new(min: Size, max: Size) -> Result<Self> {
        if !min.fits_in(max) {
            return Err(Error::InvalidConstraint { min, max });
        }
        Ok(Self { min, max })
    }

    /// Exactly one size
    pub const fn fixed(size: Size) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    /// Builds a constraint from bounds derived from other valid
    /// constraints, lifting `max` up to `min` where arithmetic saturated.
    pub(crate) fn derived(min: Size, max: Size) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub const fn min(&self) -> Size {
        self.min
    }

    pub const fn max(&self) -> Size {
        self.max
    }

    pub const fn contains(&self, size: Size) -> bool {
        self.min.fits_in(size) && size.fits_in(self.max)
    }

    /// Closest accepted size
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min.width, self.max.width),
            size.height.clamp(self.min.height, self.max.height),
        )
    }

    pub fn grow(&self, width: u16, height: u16) -> Self {
        Self::derived(self.min.grow(width, height), self.max.grow(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rect_iterates_row_major() {
        let rect = Rect::new(2, 3, 3, 2);
        let positions: Vec<_> = rect.into_iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(
            positions,
            vec![(2, 3), (3, 3), (4, 3), (2, 4), (3, 4), (4, 4)]
        );
    }

    #[test]
    fn rect_iteration_is_restartable_and_exact() {
        let rect = Rect::new(7, 1, 5, 4);
        let first: Vec<_> = rect.into_iter().collect();
        let second: Vec<_> = rect.into_iter().collect();
        assert_eq!(first.len(), 20);
        assert_eq!(rect.positions().len(), 20);
        assert_eq!(first, second);
        assert!(first.iter().all(|p| rect.contains(*p)));
    }

    #[test]
    fn rect_at_the_edge_of_the_coordinate_space() {
        let rect = Rect::new(65530, 0, 10, 1);
        assert_eq!(rect.width, 5);
        let positions: Vec<_> = rect.into_iter().collect();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions.first(), Some(&Position::new(65530, 0)));
        assert_eq!(positions.last(), Some(&Position::new(65534, 0)));
        assert!(positions.iter().all(|p| rect.contains(*p)));

        let literal = Rect {
            x: 0,
            y: 65534,
            width: 2,
            height: 4,
        };
        let positions: Vec<_> = literal.into_iter().collect();
        assert_eq!(positions, vec![Position::new(0, 65534), Position::new(1, 65534)]);
        assert!(positions.iter().all(|p| literal.contains(*p)));
    }

    #[test]
    fn empty_rect_yields_nothing() {
        assert_eq!(Rect::new(3, 3, 0, 9).into_iter().count(), 0);
        assert_eq!(Rect::new(3, 3, 9, 0).into_iter().count(), 0);
    }

    #[test]
    fn intersection_and_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.union(b), Rect::new(0, 0, 15, 15));
        assert_eq!(a.intersection(Rect::new(10, 0, 3, 3)), None);
        assert!(a.covers(Rect::new(2, 2, 8, 8)));
        assert!(!a.covers(b));
    }

    #[test]
    fn offset_maps_between_spaces() {
        let scrolled = Offset::new(0, -3);
        assert_eq!(
            scrolled.to_local(Position::new(1, 0)),
            Some(Position::new(1, 3))
        );
        assert_eq!(
            scrolled.to_parent(Rect::new(0, 2, 4, 4)),
            Some(Rect::new(0, 0, 4, 3))
        );
        assert_eq!(scrolled.to_parent(Rect::new(0, 0, 4, 3)), None);
        assert_eq!(Offset::new(2, 2).to_local(Position::new(1, 5)), None);
    }

    #[test]
    fn constraint_rejects_inverted_bounds() {
        let err = Constraint::new(Size::new(4, 1), Size::new(3, 5)).unwrap_err();
        assert!(matches!(err, Error::InvalidConstraint { .. }));
        assert!(Constraint::new(Size::new(3, 1), Size::new(3, 1)).is_ok());
    }

    #[test]
    fn unbounded_survives_growth_and_shrink() {
        let c = Constraint::new(Size::new(1, 1), Size::new(5, Size::UNBOUNDED_DIM)).unwrap();
        let grown = c.grow(2, 2);
        assert_eq!(grown.min(), Size::new(3, 3));
        assert_eq!(grown.max(), Size::new(7, Size::UNBOUNDED_DIM));
        assert_eq!(
            grown.max().shrink(2, 2),
            Size::new(5, Size::UNBOUNDED_DIM)
        );
    }

    #[test]
    fn clamp_lands_inside() {
        let c = Constraint::new(Size::new(2, 2), Size::new(4, 4)).unwrap();
        assert_eq!(c.clamp(Size::new(0, 9)), Size::new(2, 4));
        assert!(c.contains(c.clamp(Size::new(3, 100))));
    }
}
