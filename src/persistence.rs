//! Writes solved boards to disk.
//!
//! A solution for `boards/foo.bff` is written to `boards/foo_solution.txt`:
//! a title line, then the placement list, solved grid and beam paths as
//! produced by [`format_solution`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::grid::format_solution;
use crate::solver::Solution;

/// Path of the solution file that belongs next to `board_path`.
pub fn solution_path(board_path: &Path) -> PathBuf {
    let stem = board_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    board_path.with_file_name(format!("{stem}_solution.txt"))
}

/// Saves a solution beside its board file and returns where it was written.
pub fn save_solution(board_path: &Path, solution: &Solution) -> std::io::Result<PathBuf> {
    let path = solution_path(board_path);
    let mut file = BufWriter::new(File::create(&path)?);

    let title = format!(
        "Solution for {}",
        board_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    );
    writeln!(file, "{title}")?;
    writeln!(file, "{}\n", "=".repeat(title.len()))?;
    write!(file, "{}", format_solution(solution))?;
    file.flush()?;

    Ok(path)
}
