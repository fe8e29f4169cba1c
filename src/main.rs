//! Laser Puzzle Solver
//!
//! Solves laser-and-mirror grid puzzles described in `.bff` board files:
//! places the available blocks so that every target point is crossed by a
//! beam, then prints, saves or displays the solved board.

mod visualization;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use lazor::grid::{format_grid, format_solution};
use lazor::{bff, enumerate, logging, persistence, solve, Outcome, SolverConfig};

/// Solves laser grid puzzles.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug detail (step cap, beam splits).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one board file.
    Solve {
        board: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
        /// Write `<board>_solution.txt` next to the board.
        #[arg(long)]
        save: bool,
        /// Show the solution in an interactive 3D viewer.
        #[arg(long)]
        display: bool,
    },
    /// Solve every `.bff` file in a directory.
    SolveAll {
        #[arg(default_value = ".")]
        dir: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
        /// Write a solution file next to each solved board.
        #[arg(long)]
        save: bool,
    },
    /// Show how many candidate placements a board has.
    Count { board: PathBuf },
}

#[derive(Args)]
struct SearchArgs {
    /// Evaluate placements on all cores.
    #[arg(long)]
    parallel: bool,
    /// Override the per-beam step cap.
    #[arg(long)]
    step_cap: Option<usize>,
}

impl From<&SearchArgs> for SolverConfig {
    fn from(args: &SearchArgs) -> Self {
        Self {
            parallel: args.parallel,
            step_cap: args.step_cap,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Command::Solve {
            board,
            search,
            save,
            display,
        } => run_solve(board, &search.into(), *save, *display),
        Command::SolveAll { dir, search, save } => run_solve_all(dir, &search.into(), *save),
        Command::Count { board } => run_count(board),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Solves one board and reports, saves or displays the result.
fn run_solve(path: &Path, config: &SolverConfig, save: bool, display: bool) -> lazor::Result<()> {
    let board = bff::load(path)?;

    match solve(&board, config) {
        Outcome::Solved(solution) => {
            print!("{}", format_solution(&solution));
            if save {
                let written = persistence::save_solution(path, &solution)?;
                println!("Wrote {}", written.display());
            }
            if display {
                println!("Controls: Left/Right pick beam, Up/Down lift placed blocks, R reset");
                visualization::display(&solution, board.targets());
            }
        }
        Outcome::NoSolution { evaluated } => {
            println!("No solution found ({evaluated} placements tried)");
        }
    }

    Ok(())
}

/// Solves every board file in `dir`, continuing past boards that fail to load.
fn run_solve_all(dir: &Path, config: &SolverConfig, save: bool) -> lazor::Result<()> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "bff"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        println!("No .bff files in {}", dir.display());
        return Ok(());
    }

    let mut solved = 0;
    for path in &paths {
        println!("Solving {}...", path.display());
        let board = match bff::load(path) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                continue;
            }
        };

        match solve(&board, config) {
            Outcome::Solved(solution) => {
                solved += 1;
                for &(coord, kind) in solution.placement.blocks() {
                    println!("  {} at ({}, {})", kind.letter(), coord.row, coord.col);
                }
                print!("{}", format_grid(&solution.grid));
                if save {
                    match persistence::save_solution(path, &solution) {
                        Ok(written) => println!("Wrote {}", written.display()),
                        Err(e) => eprintln!("Failed to save solution: {e}"),
                    }
                }
            }
            Outcome::NoSolution { .. } => println!("No solution found for {}", path.display()),
        }
        println!();
    }

    println!("Solved {solved} of {} boards", paths.len());
    Ok(())
}

/// Prints the number of candidate placements without searching.
fn run_count(path: &Path) -> lazor::Result<()> {
    let board = bff::load(path)?;
    let count = enumerate::count(board.open_cells().len(), &board.inventory());
    println!(
        "{count} placements ({} blocks, {} open cells)",
        board.inventory().total(),
        board.open_cells().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_flags_populate_config() {
        let cli = Cli::try_parse_from([
            "lazor",
            "-v",
            "solve",
            "boards/fork.bff",
            "--parallel",
            "--step-cap",
            "500",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Solve { board, search, .. } = cli.command else {
            panic!("expected solve command");
        };
        assert_eq!(board, PathBuf::from("boards/fork.bff"));
        let config = SolverConfig::from(&search);
        assert!(config.parallel);
        assert_eq!(config.step_cap, Some(500));
    }

    #[test]
    fn test_solve_all_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["lazor", "solve-all"]).unwrap();
        let Command::SolveAll { dir, save, .. } = cli.command else {
            panic!("expected solve-all command");
        };
        assert_eq!(dir, PathBuf::from("."));
        assert!(!save);
    }

    #[test]
    fn test_solve_bundled_boards() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("boards");
        for name in ["mirror_turn", "split", "crossfire", "fork"] {
            let path = dir.join(format!("{name}.bff"));
            let (_, outcome) = lazor::solve_file(&path, &SolverConfig::default()).unwrap();
            assert!(outcome.solution().is_some(), "{name} should be solvable");
        }
    }
}
