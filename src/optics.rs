//! Optical rules: how each block kind redirects an incoming beam.
//!
//! A beam always sits on the midpoint of a cell edge when it meets a block,
//! so the edge it is about to cross decides which velocity component a
//! reflection negates.

use crate::board::{BlockKind, Direction, Point};

/// Orientation of the cell edge a beam is crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Edge between horizontally adjacent cells (even `x`, odd `y`).
    Vertical,
    /// Edge between vertically adjacent cells (odd `x`, even `y`).
    Horizontal,
}

impl Boundary {
    /// Classifies the edge a boundary-midpoint lies on.
    #[inline]
    pub fn of(point: Point) -> Self {
        debug_assert!(
            point.is_boundary_midpoint(),
            "beam left the edge lattice at ({}, {})",
            point.x,
            point.y
        );
        if point.x % 2 == 0 {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Interior point of the cell a beam at `point` enters when heading `direction`.
    #[inline]
    pub fn cell_ahead(self, point: Point, direction: Direction) -> Point {
        match self {
            Self::Vertical => Point::new(point.x + direction.dx, point.y),
            Self::Horizontal => Point::new(point.x, point.y + direction.dy),
        }
    }
}

/// Negates the velocity component perpendicular to the crossed edge.
#[inline]
pub const fn reflect(direction: Direction, boundary: Boundary) -> Direction {
    match boundary {
        Boundary::Vertical => Direction::new(-direction.dx, direction.dy),
        Boundary::Horizontal => Direction::new(direction.dx, -direction.dy),
    }
}

/// Result of a beam meeting a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outgoing {
    /// The beam ends.
    Absorbed,
    /// The beam continues in a new direction.
    Redirected(Direction),
    /// The beam continues straight and a reflected copy is emitted.
    Split {
        straight: Direction,
        reflected: Direction,
    },
}

impl Outgoing {
    /// Outgoing directions, straight continuation first.
    pub fn directions(self) -> Vec<Direction> {
        match self {
            Self::Absorbed => Vec::new(),
            Self::Redirected(direction) => vec![direction],
            Self::Split {
                straight,
                reflected,
            } => vec![straight, reflected],
        }
    }
}

/// Applies the rule for `kind` to a beam heading `direction` across `boundary`.
#[inline]
pub const fn interact(kind: BlockKind, direction: Direction, boundary: Boundary) -> Outgoing {
    match kind {
        BlockKind::Opaque => Outgoing::Absorbed,
        BlockKind::Reflective => Outgoing::Redirected(reflect(direction, boundary)),
        BlockKind::Refractive => Outgoing::Split {
            straight: direction,
            reflected: reflect(direction, boundary),
        },
    }
}
