//! Beam tracer.
//!
//! Beams advance one diagonal step at a time across cell-edge midpoints.
//! Before each step the beam looks at the cell across the edge it sits on and
//! applies the optical rule for whatever block is there. Splits are handled
//! with an explicit work-list rather than recursion; each spawned beam carries
//! a copy of its parent's path and visited set.

use std::collections::VecDeque;

use log::{debug, warn};
use rustc_hash::FxHashSet;

use crate::board::{validate_inputs, BlockKind, Board, Direction, Laser, Point};
use crate::error::BoardError;
use crate::grid::Grid;
use crate::optics::{self, Boundary, Outgoing};

/// Loop iterations allowed per distinct edge midpoint before a beam is
/// declared divergent. Each midpoint has four headings and every step can be
/// preceded by at most one redirect, so cycle detection always fires first.
/// The cap scales with board area, not perimeter: mirrors can fold a beam
/// across every interior edge before it repeats a state.
pub const STEP_CAP_FACTOR: usize = 8;

/// A beam's position and heading; revisiting one means the beam is looping.
type BeamState = (Point, Direction);

/// How a beam's trace ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeamEnd {
    /// Left the board.
    Exited,
    /// Hit an opaque block.
    Absorbed,
    /// Reflected straight into a second mirror with no room to move.
    Trapped,
    /// Re-entered a position and heading it had already visited.
    Cycle,
    /// Ran into the step cap. Indicates a pathological board or a tracer bug.
    Diverged,
}

/// The full path of one beam, from a laser or from a split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeamPath {
    pub points: Vec<Point>,
    /// True for beams produced by a refractive split.
    pub spawned: bool,
    pub end: BeamEnd,
}

/// Output of tracing every laser on one grid.
#[derive(Clone, Debug)]
pub struct Trace {
    pub beams: Vec<BeamPath>,
    /// Targets touched by any beam, in target order.
    pub hit_targets: Vec<Point>,
    pub all_targets_hit: bool,
}

impl Trace {
    /// Number of beams abandoned at the step cap.
    pub fn diverged(&self) -> usize {
        self.beams
            .iter()
            .filter(|beam| beam.end == BeamEnd::Diverged)
            .count()
    }
}

/// Default per-beam iteration cap for a grid.
pub fn default_step_cap(grid: &Grid) -> usize {
    STEP_CAP_FACTOR * grid.boundary_midpoints()
}

/// True when a beam at `point` heading `direction` leaves the board on its next step.
#[inline]
fn exits(grid: &Grid, point: Point, direction: Direction) -> bool {
    if !grid.contains(point) {
        return true;
    }
    (point.x == 0 && direction.dx < 0)
        || (point.x == grid.lattice_width() && direction.dx > 0)
        || (point.y == 0 && direction.dy < 0)
        || (point.y == grid.lattice_height() && direction.dy > 0)
}

/// True when a beam just redirected at `point` would head straight into a mirror.
#[inline]
fn trapped(grid: &Grid, point: Point, direction: Direction, boundary: Boundary) -> bool {
    grid.block_at(boundary.cell_ahead(point, direction)) == Some(BlockKind::Reflective)
}

/// A beam still being advanced.
struct ActiveBeam {
    position: Point,
    direction: Direction,
    path: Vec<Point>,
    visited: FxHashSet<BeamState>,
    spawned: bool,
}

impl ActiveBeam {
    fn from_laser(laser: &Laser) -> Self {
        let mut visited = FxHashSet::default();
        visited.insert((laser.origin, laser.direction));
        Self {
            position: laser.origin,
            direction: laser.direction,
            path: vec![laser.origin],
            visited,
            spawned: false,
        }
    }

    /// A copy of this beam's lineage heading off in `direction`.
    fn split(&self, direction: Direction) -> Self {
        let mut visited = self.visited.clone();
        visited.insert((self.position, direction));
        Self {
            position: self.position,
            direction,
            path: self.path.clone(),
            visited,
            spawned: true,
        }
    }

    fn finish(self, end: BeamEnd) -> BeamPath {
        BeamPath {
            points: self.path,
            spawned: self.spawned,
            end,
        }
    }
}

/// Traces a fixed set of lasers against any grid of one board's shape.
pub struct Tracer<'a> {
    lasers: &'a [Laser],
    targets: &'a [Point],
    target_set: FxHashSet<Point>,
    step_cap: usize,
}

impl<'a> Tracer<'a> {
    /// Validates lasers and targets against `grid` before any tracing.
    pub fn new(
        grid: &Grid,
        lasers: &'a [Laser],
        targets: &'a [Point],
        step_cap: Option<usize>,
    ) -> Result<Self, BoardError> {
        validate_inputs(grid, lasers, targets)?;
        Ok(Self::new_unchecked(grid, lasers, targets, step_cap))
    }

    /// Tracer for a board; the board has already validated its lasers and targets.
    pub fn for_board(board: &'a Board, step_cap: Option<usize>) -> Self {
        Self::new_unchecked(board.grid(), board.lasers(), board.targets(), step_cap)
    }

    fn new_unchecked(
        grid: &Grid,
        lasers: &'a [Laser],
        targets: &'a [Point],
        step_cap: Option<usize>,
    ) -> Self {
        Self {
            lasers,
            targets,
            target_set: targets.iter().copied().collect(),
            step_cap: step_cap.unwrap_or_else(|| default_step_cap(grid)),
        }
    }

    pub fn step_cap(&self) -> usize {
        self.step_cap
    }

    /// Runs every laser, and every beam split off from it, to termination.
    pub fn run(&self, grid: &Grid) -> Trace {
        let mut run = TraceRun {
            grid,
            target_set: &self.target_set,
            step_cap: self.step_cap,
            queue: self.lasers.iter().map(ActiveBeam::from_laser).collect(),
            finished: Vec::new(),
            hits: FxHashSet::default(),
            spawn_states: FxHashSet::default(),
        };

        for laser in self.lasers {
            run.record_hit(laser.origin);
        }

        while let Some(mut beam) = run.queue.pop_front() {
            let end = run.advance(&mut beam);
            run.finished.push(beam.finish(end));
        }

        let mut hit_targets: Vec<Point> = Vec::new();
        for target in self.targets {
            if run.hits.contains(target) && !hit_targets.contains(target) {
                hit_targets.push(*target);
            }
        }
        let all_targets_hit = self.targets.iter().all(|target| run.hits.contains(target));

        Trace {
            beams: run.finished,
            hit_targets,
            all_targets_hit,
        }
    }
}

/// Work-list state for a single [`Tracer::run`].
struct TraceRun<'r> {
    grid: &'r Grid,
    target_set: &'r FxHashSet<Point>,
    step_cap: usize,
    queue: VecDeque<ActiveBeam>,
    finished: Vec<BeamPath>,
    hits: FxHashSet<Point>,
    /// Split states already emitted; motion is deterministic, so a repeat
    /// could only retrace points already recorded.
    spawn_states: FxHashSet<BeamState>,
}

impl TraceRun<'_> {
    #[inline]
    fn record_hit(&mut self, point: Point) {
        if self.target_set.contains(&point) {
            self.hits.insert(point);
        }
    }

    /// Advances one beam until it ends, queueing any beams it splits off.
    fn advance(&mut self, beam: &mut ActiveBeam) -> BeamEnd {
        for _ in 0..self.step_cap {
            if exits(self.grid, beam.position, beam.direction) {
                return BeamEnd::Exited;
            }

            let boundary = Boundary::of(beam.position);
            let ahead = boundary.cell_ahead(beam.position, beam.direction);
            if let Some(kind) = self.grid.block_at(ahead) {
                match optics::interact(kind, beam.direction, boundary) {
                    Outgoing::Absorbed => return BeamEnd::Absorbed,
                    Outgoing::Redirected(direction) => {
                        if trapped(self.grid, beam.position, direction, boundary) {
                            return BeamEnd::Trapped;
                        }
                        beam.direction = direction;
                        // look again at the cell on the new heading before moving
                        continue;
                    }
                    Outgoing::Split {
                        straight,
                        reflected,
                    } => {
                        self.spawn(beam, reflected, boundary);
                        beam.direction = straight;
                    }
                }
            }

            beam.position = beam.position + beam.direction;
            if !beam.visited.insert((beam.position, beam.direction)) {
                return BeamEnd::Cycle;
            }
            beam.path.push(beam.position);
            self.record_hit(beam.position);
        }

        warn!(
            "beam at ({}, {}) still running after {} steps; abandoning it",
            beam.position.x, beam.position.y, self.step_cap
        );
        BeamEnd::Diverged
    }

    /// Emits the reflected half of a refractive split.
    fn spawn(&mut self, parent: &ActiveBeam, direction: Direction, boundary: Boundary) {
        if !self.spawn_states.insert((parent.position, direction)) {
            return;
        }
        let child = parent.split(direction);
        if trapped(self.grid, parent.position, direction, boundary) {
            self.finished.push(child.finish(BeamEnd::Trapped));
            return;
        }
        debug!(
            "split at ({}, {}) heading ({}, {})",
            parent.position.x, parent.position.y, direction.dx, direction.dy
        );
        self.queue.push_back(child);
    }
}

/// Validates the lasers against `grid` and traces them.
pub fn trace(
    grid: &Grid,
    lasers: &[Laser],
    targets: &[Point],
    step_cap: Option<usize>,
) -> Result<Trace, BoardError> {
    Ok(Tracer::new(grid, lasers, targets, step_cap)?.run(grid))
}
