//! Board definitions: block kinds, lattice coordinates, lasers and inventory.
//!
//! Two coordinate systems are in play. Cells are addressed in block space by
//! [`CellCoord`]; beams move on the doubled-resolution fine lattice addressed
//! by [`Point`], where cell `(row, col)` has its interior at
//! `(x = 2 * col + 1, y = 2 * row + 1)` and even coordinates are cell edges.

use std::ops::Add;

use crate::error::BoardError;
use crate::grid::Grid;

/// Optical block kinds, ordered the way the board file letters them (A, B, C).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    /// Mirror: reflects the beam.
    Reflective,
    /// Absorbs the beam.
    Opaque,
    /// Half mirror: lets the beam through and reflects a copy.
    Refractive,
}

impl BlockKind {
    pub const ALL: [Self; 3] = [Self::Reflective, Self::Opaque, Self::Refractive];

    /// Board file letter for this kind.
    pub const fn letter(self) -> char {
        match self {
            Self::Reflective => 'A',
            Self::Opaque => 'B',
            Self::Refractive => 'C',
        }
    }

    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(Self::Reflective),
            'B' => Some(Self::Opaque),
            'C' => Some(Self::Refractive),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Reflective => 0,
            Self::Opaque => 1,
            Self::Refractive => 2,
        }
    }
}

/// State of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// May receive a movable block.
    Open,
    /// Never receives a block; beams pass through it as empty space.
    Blocked,
    /// Permanently holds a block.
    Fixed(BlockKind),
    /// An open cell that a placement has filled.
    Occupied(BlockKind),
}

impl Cell {
    /// The block in this cell, if any.
    #[inline]
    pub const fn block(self) -> Option<BlockKind> {
        match self {
            Self::Fixed(kind) | Self::Occupied(kind) => Some(kind),
            Self::Open | Self::Blocked => None,
        }
    }
}

/// A cell address in block space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Fine-lattice point at the interior of this cell.
    pub const fn center(self) -> Point {
        Point::new(2 * self.col as i32 + 1, 2 * self.row as i32 + 1)
    }
}

/// A point on the fine lattice. `x` runs along columns, `y` along rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when exactly one coordinate is odd, i.e. the midpoint of a cell edge.
    #[inline]
    pub const fn is_boundary_midpoint(self) -> bool {
        (self.x + self.y) % 2 != 0
    }

    /// The cell whose interior is at this point, if this is a cell interior.
    pub fn cell(self) -> Option<CellCoord> {
        if self.x < 0 || self.y < 0 || self.x % 2 == 0 || self.y % 2 == 0 {
            return None;
        }
        Some(CellCoord::new((self.y / 2) as usize, (self.x / 2) as usize))
    }
}

impl Add<Direction> for Point {
    type Output = Self;

    #[inline]
    fn add(self, direction: Direction) -> Self {
        Self::new(self.x + direction.dx, self.y + direction.dy)
    }
}

/// A unit step on the fine lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Lasers only ever move diagonally.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.dx.abs() == 1 && self.dy.abs() == 1
    }
}

/// A beam source: where it starts and which way it heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Laser {
    pub origin: Point,
    pub direction: Direction,
}

impl Laser {
    pub const fn new(origin: Point, direction: Direction) -> Self {
        Self { origin, direction }
    }
}

/// Movable block counts per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: [usize; 3],
}

impl Inventory {
    pub const fn new(reflective: usize, opaque: usize, refractive: usize) -> Self {
        Self {
            counts: [reflective, opaque, refractive],
        }
    }

    #[inline]
    pub const fn count(&self, kind: BlockKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn set(&mut self, kind: BlockKind, count: usize) {
        self.counts[kind.index()] = count;
    }

    /// Number of cells a placement must fill.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The inventory as a sorted multiset of kinds.
    pub fn kinds(&self) -> Vec<BlockKind> {
        BlockKind::ALL
            .iter()
            .flat_map(|&kind| std::iter::repeat(kind).take(self.count(kind)))
            .collect()
    }
}

/// Checks that a laser starts on a boundary midpoint inside the board and
/// moves diagonally.
fn validate_laser(grid: &Grid, laser: &Laser) -> Result<(), BoardError> {
    if !grid.contains(laser.origin) {
        return Err(BoardError::LaserOutOfBounds {
            origin: laser.origin,
        });
    }
    if !laser.origin.is_boundary_midpoint() {
        return Err(BoardError::LaserNotOnBoundary {
            origin: laser.origin,
        });
    }
    if !laser.direction.is_diagonal() {
        return Err(BoardError::InvalidDirection {
            dx: laser.direction.dx,
            dy: laser.direction.dy,
        });
    }
    Ok(())
}

/// Checks every laser and target against the grid's lattice extent.
pub fn validate_inputs(grid: &Grid, lasers: &[Laser], targets: &[Point]) -> Result<(), BoardError> {
    for laser in lasers {
        validate_laser(grid, laser)?;
    }
    if let Some(&target) = targets.iter().find(|&&target| !grid.contains(target)) {
        return Err(BoardError::TargetOutOfBounds { target });
    }
    Ok(())
}

/// A validated puzzle. Read-only once built; placements are applied to copies
/// of [`Board::grid`].
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    lasers: Vec<Laser>,
    targets: Vec<Point>,
    inventory: Inventory,
    open_cells: Vec<CellCoord>,
}

impl Board {
    /// Builds a board, rejecting anything internally inconsistent.
    pub fn new(
        grid: Grid,
        lasers: Vec<Laser>,
        targets: Vec<Point>,
        inventory: Inventory,
    ) -> Result<Self, BoardError> {
        validate_inputs(&grid, &lasers, &targets)?;

        let open_cells = grid.open_cells();
        if inventory.total() > open_cells.len() {
            return Err(BoardError::InsufficientOpenCells {
                needed: inventory.total(),
                available: open_cells.len(),
            });
        }

        Ok(Self {
            grid,
            lasers,
            targets,
            inventory,
            open_cells,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        self.grid.get(coord)
    }

    /// Dimensions in block space as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid.rows(), self.grid.cols())
    }

    pub fn open_cells(&self) -> &[CellCoord] {
        &self.open_cells
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    pub fn inventory(&self) -> Inventory {
        self.inventory
    }
}
