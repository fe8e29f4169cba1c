//! Grid representation and text formatting.
//!
//! The grid is a flat row-major array of [`Cell`]s. Index order is
//! `idx = row * cols + col`.

use crate::board::{BlockKind, Cell, CellCoord, Point};
use crate::enumerate::Placement;
use crate::error::BoardError;
use crate::solver::Solution;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from rows of cells. Rows must be non-empty and equally long.
    pub fn new(rows: Vec<Vec<Cell>>) -> Result<Self, BoardError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(BoardError::EmptyGrid);
        }

        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for (row, row_cells) in rows.into_iter().enumerate() {
            if row_cells.len() != cols {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: cols,
                    found: row_cells.len(),
                });
            }
            cells.extend(row_cells);
        }

        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a cell coordinate to a linear index.
    #[inline(always)]
    const fn coord_to_idx(&self, coord: CellCoord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Converts a linear index to a cell coordinate.
    #[inline(always)]
    const fn idx_to_coord(&self, idx: usize) -> CellCoord {
        CellCoord::new(idx / self.cols, idx % self.cols)
    }

    #[inline]
    pub fn get(&self, coord: CellCoord) -> Option<Cell> {
        if coord.row >= self.rows || coord.col >= self.cols {
            return None;
        }
        Some(self.cells[self.coord_to_idx(coord)])
    }

    /// Block held by the cell whose interior is at `point`.
    ///
    /// Returns `None` for empty cells and for points that are not cell interiors.
    #[inline]
    pub fn block_at(&self, point: Point) -> Option<BlockKind> {
        point
            .cell()
            .and_then(|coord| self.get(coord))
            .and_then(Cell::block)
    }

    /// Largest fine-lattice `x` (the right edge of the board).
    #[inline]
    pub fn lattice_width(&self) -> i32 {
        2 * self.cols as i32
    }

    /// Largest fine-lattice `y` (the bottom edge of the board).
    #[inline]
    pub fn lattice_height(&self) -> i32 {
        2 * self.rows as i32
    }

    /// True when `point` lies within the fine-lattice extent, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        (0..=self.lattice_width()).contains(&point.x)
            && (0..=self.lattice_height()).contains(&point.y)
    }

    /// Number of cell-edge midpoints on the fine lattice.
    pub fn boundary_midpoints(&self) -> usize {
        self.rows * (self.cols + 1) + self.cols * (self.rows + 1)
    }

    /// Coordinates of every open cell in row-major order.
    pub fn open_cells(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| matches!(cell, Cell::Open))
            .map(|(idx, _)| self.idx_to_coord(idx))
            .collect()
    }

    /// Returns a copy of this grid with the placement's blocks written into it.
    pub fn with_placement(&self, placement: &Placement) -> Self {
        let mut grid = self.clone();
        for &(coord, kind) in placement.blocks() {
            let idx = grid.coord_to_idx(coord);
            debug_assert_eq!(grid.cells[idx], Cell::Open, "placement onto non-open cell");
            grid.cells[idx] = Cell::Occupied(kind);
        }
        grid
    }
}

/// Board-file token for a cell.
fn cell_token(cell: Cell) -> char {
    match cell {
        Cell::Open => 'o',
        Cell::Blocked => 'x',
        Cell::Fixed(kind) | Cell::Occupied(kind) => kind.letter(),
    }
}

/// Formats a grid in the board-file alphabet, one row per line.
pub fn format_grid(grid: &Grid) -> String {
    let mut output = String::new();
    for row in 0..grid.rows() {
        let tokens: Vec<String> = (0..grid.cols())
            .filter_map(|col| grid.get(CellCoord::new(row, col)))
            .map(|cell| cell_token(cell).to_string())
            .collect();
        output.push_str(&tokens.join(" "));
        output.push('\n');
    }
    output
}

/// Formats a solution: the placement list, the solved grid and every beam path.
pub fn format_solution(solution: &Solution) -> String {
    let mut output = String::from("Placements:\n");
    for &(coord, kind) in solution.placement.blocks() {
        output.push_str(&format!("  {} at ({}, {})\n", kind.letter(), coord.row, coord.col));
    }

    output.push_str("\nGrid:\n");
    output.push_str(&format_grid(&solution.grid));

    output.push_str("\nBeams:\n");
    for (i, beam) in solution.trace.beams.iter().enumerate() {
        let points: Vec<String> = beam
            .points
            .iter()
            .map(|point| format!("({},{})", point.x, point.y))
            .collect();
        let origin = if beam.spawned { "split" } else { "laser" };
        output.push_str(&format!(
            "  {} [{origin}, {:?}]: {}\n",
            i + 1,
            beam.end,
            points.join(" ")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        Grid::new(vec![
            vec![Cell::Open, Cell::Blocked, Cell::Fixed(BlockKind::Reflective)],
            vec![Cell::Open, Cell::Open, Cell::Open],
        ])
        .unwrap()
    }

    #[test]
    fn test_coordinate_conversion_roundtrip() {
        let grid = sample_grid();
        for idx in 0..6 {
            let coord = grid.idx_to_coord(idx);
            assert!(coord.row < 2 && coord.col < 3);
            assert_eq!(grid.coord_to_idx(coord), idx, "Roundtrip failed for index {idx}");
        }
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Grid::new(vec![vec![Cell::Open, Cell::Open], vec![Cell::Open]]).unwrap_err();
        assert_eq!(
            err,
            BoardError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert_eq!(Grid::new(vec![]).unwrap_err(), BoardError::EmptyGrid);
        assert_eq!(Grid::new(vec![vec![]]).unwrap_err(), BoardError::EmptyGrid);
    }

    #[test]
    fn test_block_at_reads_cell_interiors_only() {
        let grid = sample_grid();
        assert_eq!(grid.block_at(Point::new(5, 1)), Some(BlockKind::Reflective));
        assert_eq!(grid.block_at(Point::new(4, 1)), None);
        assert_eq!(grid.block_at(Point::new(1, 1)), None);
        assert_eq!(grid.block_at(Point::new(7, 1)), None);
    }

    #[test]
    fn test_lattice_extent() {
        let grid = sample_grid();
        assert_eq!(grid.lattice_width(), 6);
        assert_eq!(grid.lattice_height(), 4);
        assert!(grid.contains(Point::new(6, 4)));
        assert!(grid.contains(Point::new(0, 0)));
        assert!(!grid.contains(Point::new(7, 1)));
        assert!(!grid.contains(Point::new(1, -1)));
        assert_eq!(grid.boundary_midpoints(), 2 * 4 + 3 * 3);
    }

    #[test]
    fn test_open_cells_and_placement() {
        let grid = sample_grid();
        assert_eq!(
            grid.open_cells(),
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(1, 2)
            ]
        );

        let placement = Placement::new(vec![
            (CellCoord::new(0, 0), BlockKind::Opaque),
            (CellCoord::new(1, 2), BlockKind::Refractive),
        ]);
        let placed = grid.with_placement(&placement);
        assert_eq!(
            placed.get(CellCoord::new(0, 0)),
            Some(Cell::Occupied(BlockKind::Opaque))
        );
        assert_eq!(placed.open_cells().len(), 2);
        // the source grid is untouched
        assert_eq!(grid.get(CellCoord::new(0, 0)), Some(Cell::Open));
    }

    #[test]
    fn test_format_grid_snapshot() {
        let grid = sample_grid().with_placement(&Placement::new(vec![(
            CellCoord::new(1, 1),
            BlockKind::Opaque,
        )]));
        insta::assert_snapshot!(format_grid(&grid), @r"
        o x A
        o B o
        ");
    }

    #[test]
    fn test_format_solution_lists_placements_grid_and_beams() {
        use crate::board::{Board, Direction, Inventory, Laser};
        use crate::solver::{solve, SolverConfig};

        let board = Board::new(
            Grid::new(vec![vec![Cell::Open, Cell::Blocked]]).unwrap(),
            vec![Laser::new(Point::new(2, 1), Direction::new(-1, 1))],
            vec![Point::new(3, 2)],
            Inventory::new(1, 0, 0),
        )
        .unwrap();
        let solution = solve(&board, &SolverConfig::default())
            .into_solution()
            .unwrap();

        insta::assert_snapshot!(format_solution(&solution), @r"
        Placements:
          A at (0, 0)

        Grid:
        A x

        Beams:
          1 [laser, Exited]: (2,1) (3,2)
        ");
    }
}
