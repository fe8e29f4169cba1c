//! Board file (`.bff`) parser.
//!
//! ```text
//! GRID START
//! o o x
//! A o o
//! GRID STOP
//! A 2          movable reflective blocks (B opaque, C refractive)
//! L 2 7 1 -1   laser at fine-lattice (x, y) heading (dx, dy)
//! P 3 0        target point
//! ```
//!
//! Grid tokens are `o` (open), `x` (no block allowed) and `A`/`B`/`C` for
//! fixed blocks; spaces between them are optional. `#` starts a comment.

use std::fs;
use std::path::Path;

use crate::board::{BlockKind, Board, Cell, Direction, Inventory, Laser, Point};
use crate::error::{BoardError, Error, Result};
use crate::grid::Grid;

const GRID_START: &str = "GRID START";
const GRID_STOP: &str = "GRID STOP";

/// Reads and parses a board file.
pub fn load(path: &Path) -> Result<Board> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parses board file text into a validated [`Board`].
pub fn parse(text: &str) -> Result<Board> {
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut grid_opened_at: Option<usize> = None;
    let mut grid_closed = false;
    let mut inventory = Inventory::default();
    let mut lasers = Vec::new();
    let mut targets = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        // inside the grid section every line is a row until GRID STOP
        if grid_opened_at.is_some() && !grid_closed {
            if line == GRID_STOP {
                grid_closed = true;
            } else {
                rows.push(parse_grid_row(line, line_number)?);
            }
            continue;
        }

        if line == GRID_STOP {
            return Err(Error::parse(line_number, "GRID STOP without GRID START"));
        }
        if line == GRID_START {
            if grid_opened_at.is_some() {
                return Err(Error::parse(line_number, "second GRID START"));
            }
            grid_opened_at = Some(line_number);
            continue;
        }

        let mut fields = line.split_whitespace();
        let tag = fields.next().unwrap_or_default();
        let values: Vec<&str> = fields.collect();
        match tag {
            "A" | "B" | "C" => {
                let [count] = parse_values::<i64, 1>(&values, line_number, "block count")?;
                let letter = tag.chars().next().unwrap_or_default();
                let Some(kind) = BlockKind::from_letter(letter) else {
                    return Err(Error::parse(line_number, format!("unknown block '{tag}'")));
                };
                let count = usize::try_from(count)
                    .map_err(|_| BoardError::NegativeInventory { letter, count })?;
                inventory.set(kind, count);
            }
            "L" => {
                let [x, y, dx, dy] = parse_values::<i32, 4>(&values, line_number, "laser")?;
                lasers.push(Laser::new(Point::new(x, y), Direction::new(dx, dy)));
            }
            "P" => {
                let [x, y] = parse_values::<i32, 2>(&values, line_number, "target")?;
                targets.push(Point::new(x, y));
            }
            other => {
                return Err(Error::parse(
                    line_number,
                    format!("unrecognised line starting with '{other}'"),
                ))
            }
        }
    }

    match grid_opened_at {
        None => Err(Error::parse(text.lines().count(), "no GRID START section")),
        Some(line_number) if !grid_closed => {
            Err(Error::parse(line_number, "GRID START without GRID STOP"))
        }
        Some(_) => {
            let grid = Grid::new(rows)?;
            Ok(Board::new(grid, lasers, targets, inventory)?)
        }
    }
}

fn parse_grid_row(line: &str, line_number: usize) -> Result<Vec<Cell>> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|token| match token {
            'o' => Ok(Cell::Open),
            'x' => Ok(Cell::Blocked),
            _ => BlockKind::from_letter(token)
                .map(Cell::Fixed)
                .ok_or_else(|| Error::parse(line_number, format!("unknown grid token '{token}'"))),
        })
        .collect()
}

/// Parses exactly `N` whitespace-separated numbers.
fn parse_values<T: std::str::FromStr, const N: usize>(
    values: &[&str],
    line_number: usize,
    what: &str,
) -> Result<[T; N]> {
    if values.len() != N {
        return Err(Error::parse(
            line_number,
            format!("{what} needs {N} values, found {}", values.len()),
        ));
    }
    let parsed = values
        .iter()
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| Error::parse(line_number, format!("invalid number '{value}'")))
        })
        .collect::<Result<Vec<T>>>()?;
    parsed
        .try_into()
        .map_err(|_| Error::parse(line_number, format!("{what} needs {N} values")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellCoord;
    use crate::solver::{solve, SolverConfig};

    const FORK: &str = include_str!("../boards/fork.bff");

    fn parse_err(text: &str) -> Error {
        match parse(text) {
            Ok(_) => panic!("expected parse failure"),
            Err(err) => err,
        }
    }

    #[test]
    fn test_parses_all_sections() {
        let text = "\
# sample
GRID START
o B x
oAo
GRID STOP
A 2   # mirrors
C 1
L 0 1 1 1
P 3 4
P 5 0
";
        let board = parse(text).unwrap();
        assert_eq!(board.dimensions(), (2, 3));
        assert_eq!(
            board.cell(CellCoord::new(0, 1)),
            Some(Cell::Fixed(BlockKind::Opaque))
        );
        assert_eq!(board.cell(CellCoord::new(0, 2)), Some(Cell::Blocked));
        assert_eq!(
            board.cell(CellCoord::new(1, 1)),
            Some(Cell::Fixed(BlockKind::Reflective))
        );
        assert_eq!(board.inventory(), Inventory::new(2, 0, 1));
        assert_eq!(
            board.lasers(),
            &[Laser::new(Point::new(0, 1), Direction::new(1, 1))]
        );
        assert_eq!(board.targets(), &[Point::new(3, 4), Point::new(5, 0)]);
        assert_eq!(board.open_cells().len(), 3);
    }

    #[test]
    fn test_bundled_board_solves() {
        let board = parse(FORK).unwrap();
        let solution = solve(&board, &SolverConfig::default())
            .into_solution()
            .unwrap();
        assert!(solution.trace.all_targets_hit);
        assert_eq!(solution.placement.len(), 2);
    }

    #[test]
    fn test_rejects_unknown_grid_token() {
        let err = parse_err("GRID START\no z\nGRID STOP\n");
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_rejects_bad_number() {
        let err = parse_err("GRID START\no\nGRID STOP\nL 0 1 one 1\n");
        assert!(matches!(err, Error::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_rejects_wrong_field_count() {
        let err = parse_err("GRID START\no\nGRID STOP\nP 1\n");
        assert!(matches!(err, Error::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_rejects_negative_inventory() {
        let err = parse_err("GRID START\no\nGRID STOP\nB -1\n");
        assert!(
            matches!(
                err,
                Error::MalformedBoard(BoardError::NegativeInventory {
                    letter: 'B',
                    count: -1
                })
            ),
            "{err}"
        );
    }

    #[test]
    fn test_rejects_unterminated_grid() {
        let err = parse_err("\nGRID START\no o\n");
        assert!(matches!(err, Error::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_rejects_missing_grid() {
        let err = parse_err("A 1\n");
        assert!(matches!(err, Error::Parse { .. }), "{err}");
    }

    #[test]
    fn test_rejects_unknown_line() {
        let err = parse_err("GRID START\no\nGRID STOP\nQ 1 2\n");
        assert!(matches!(err, Error::Parse { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_ragged_grid_is_malformed() {
        let err = parse_err("GRID START\no o\no\nGRID STOP\n");
        assert!(
            matches!(err, Error::MalformedBoard(BoardError::RaggedRow { row: 1, .. })),
            "{err}"
        );
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/board.bff")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
