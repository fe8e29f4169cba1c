//! 3D view of a solved board using kiss3d.

use kiss3d::prelude::*;

use lazor::board::{BlockKind, Cell, CellCoord, Point};
use lazor::grid::Grid;
use lazor::solver::Solution;

/// Tile color for a cell; movable blocks share their fixed counterpart's hue.
fn cell_color(cell: Cell) -> Color {
    match cell {
        Cell::Open => Color::new(0.85, 0.85, 0.85, 1.0),
        Cell::Blocked => Color::new(0.35, 0.35, 0.35, 1.0),
        Cell::Fixed(kind) | Cell::Occupied(kind) => match kind {
            BlockKind::Reflective => Color::new(0.3, 0.5, 1.0, 1.0),
            BlockKind::Opaque => Color::new(0.1, 0.1, 0.1, 1.0),
            BlockKind::Refractive => Color::new(0.3, 0.9, 0.5, 1.0),
        },
    }
}

/// Beam color; the highlighted beam (or every beam when none is) is bright red.
fn beam_color(lit: bool) -> Color {
    if lit {
        Color::new(1.0, 0.15, 0.15, 1.0)
    } else {
        Color::new(0.5, 0.25, 0.25, 1.0)
    }
}

/// Maps a fine-lattice point to world space.
///
/// One cell is one world unit. The board is centered at the origin with row 0
/// at the top, so lattice `y` grows downward.
fn lattice_to_world(grid: &Grid, point: Point, z: f32) -> Vec3 {
    Vec3::new(
        point.x as f32 * 0.5 - grid.cols() as f32 * 0.5,
        grid.rows() as f32 * 0.5 - point.y as f32 * 0.5,
        z,
    )
}

/// A movable block node and its resting position, for lifting placed blocks.
struct PlacedNode {
    node: SceneNode3d,
    base_position: Vec3,
}

/// Nodes making up one rendering of the board.
struct RenderedBoard {
    nodes: Vec<SceneNode3d>,
    placed: Vec<PlacedNode>,
}

/// Builds the scene: cell tiles, raised blocks, target markers and beam paths.
fn build_scene(
    scene: &mut SceneNode3d,
    solution: &Solution,
    targets: &[Point],
    highlighted: Option<usize>,
) -> RenderedBoard {
    /// Tile width (slightly smaller than a cell for visible gaps).
    const TILE_SIZE: f32 = 0.92;
    const TILE_DEPTH: f32 = 0.1;
    const BLOCK_DEPTH: f32 = 0.5;
    const BEAM_SIZE: f32 = 0.1;
    const TARGET_SIZE: f32 = 0.22;

    let grid = &solution.grid;
    let mut rendered = RenderedBoard {
        nodes: Vec::new(),
        placed: Vec::new(),
    };

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let coord = CellCoord::new(row, col);
            let Some(cell) = grid.get(coord) else {
                continue;
            };
            let depth = if cell.block().is_some() {
                BLOCK_DEPTH
            } else {
                TILE_DEPTH
            };
            let position = lattice_to_world(grid, coord.center(), depth * 0.5);
            let node = scene
                .add_cube(TILE_SIZE, TILE_SIZE, depth)
                .set_color(cell_color(cell))
                .set_position(position);
            if matches!(cell, Cell::Occupied(_)) {
                rendered.placed.push(PlacedNode {
                    node,
                    base_position: position,
                });
            } else {
                rendered.nodes.push(node);
            }
        }
    }

    for &target in targets {
        let hit = solution.trace.hit_targets.contains(&target);
        let color = if hit {
            Color::new(1.0, 1.0, 0.2, 1.0)
        } else {
            Color::new(1.0, 1.0, 1.0, 1.0)
        };
        let node = scene
            .add_cube(TARGET_SIZE, TARGET_SIZE, TARGET_SIZE)
            .set_color(color)
            .set_position(lattice_to_world(grid, target, BLOCK_DEPTH + TARGET_SIZE));
        rendered.nodes.push(node);
    }

    for (beam_index, beam) in solution.trace.beams.iter().enumerate() {
        let lit = highlighted.map_or(true, |index| index == beam_index);
        for &point in &beam.points {
            let node = scene
                .add_cube(BEAM_SIZE, BEAM_SIZE, BEAM_SIZE)
                .set_color(beam_color(lit))
                .set_position(lattice_to_world(grid, point, BLOCK_DEPTH + BEAM_SIZE));
            rendered.nodes.push(node);
        }
    }

    rendered
}

fn window_title(solution: &Solution, highlighted: Option<usize>) -> String {
    let beams = solution.trace.beams.len();
    let focus = match highlighted {
        Some(index) => format!("beam {}/{beams}", index + 1),
        None => format!("all {beams} beams"),
    };
    format!("{focus} - [Left/Right] beam, [Up/Down] lift placed blocks, [R] reset")
}

/// Displays a solved board in an interactive 3D viewer.
pub fn display(solution: &Solution, targets: &[Point]) {
    pollster::block_on(display_async(solution, targets));
}

async fn display_async(solution: &Solution, targets: &[Point]) {
    let beam_count = solution.trace.beams.len();
    let mut highlighted: Option<usize> = None;

    let mut window = Window::new(&window_title(solution, highlighted)).await;

    let mut camera = OrbitCamera3d::default();
    let extent = solution.grid.rows().max(solution.grid.cols()) as f32;
    camera.set_dist(2.0 * extent + 4.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(extent, extent, 2.0 * extent + 5.0));

    let mut rendered = build_scene(&mut scene, solution, targets, highlighted);

    // how far placed blocks float above the board
    let mut lift: f32 = 0.0;
    const LIFT_SPEED: f32 = 0.1;
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Up => lift += LIFT_SPEED,
                        Key::Down => lift = (lift - LIFT_SPEED).max(0.0),
                        Key::R => {
                            lift = 0.0;
                            highlighted = None;
                            needs_rebuild = true;
                        }
                        Key::Right if beam_count > 0 => {
                            highlighted =
                                Some(highlighted.map_or(0, |index| (index + 1) % beam_count));
                            needs_rebuild = true;
                        }
                        Key::Left if beam_count > 0 => {
                            highlighted = Some(
                                highlighted
                                    .and_then(|index| index.checked_sub(1))
                                    .unwrap_or(beam_count - 1),
                            );
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut node in rendered.nodes.drain(..) {
                node.remove();
            }
            for mut placed in rendered.placed.drain(..) {
                placed.node.remove();
            }
            rendered = build_scene(&mut scene, solution, targets, highlighted);
            window.set_title(&window_title(solution, highlighted));
            needs_rebuild = false;
        }

        for placed in &mut rendered.placed {
            placed
                .node
                .set_position(placed.base_position + Vec3::new(0.0, 0.0, lift));
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}
