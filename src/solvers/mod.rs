mod astar;
mod bfs;
mod dfs;
mod dijkstra;

use crate::{
    error::{MazeError, Result},
    generators::get_rng,
    maze::{Coord, Maze, Terrain},
};
use astar::solve_astar;
use bfs::solve_bfs;
use dfs::solve_dfs;
use dijkstra::solve_dijkstra;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Bfs, Solver::Dfs, Solver::Dijkstra, Solver::AStar];

    /// Whether the solver minimizes terrain cost rather than step count.
    pub fn is_weighted(self) -> bool {
        matches!(self, Solver::Dijkstra | Solver::AStar)
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

impl std::str::FromStr for Solver {
    type Err = MazeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Solver::Bfs),
            "dfs" => Ok(Solver::Dfs),
            "dijkstra" => Ok(Solver::Dijkstra),
            "astar" | "a*" => Ok(Solver::AStar),
            other => Err(MazeError::InvalidConfiguration(format!(
                "unknown solver '{}', expected bfs, dfs, dijkstra or astar",
                other
            ))),
        }
    }
}

/// How many cells of each terrain kind a path steps onto.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TerrainBreakdown {
    counts: [usize; 4],
}

impl TerrainBreakdown {
    pub fn add(&mut self, terrain: Terrain) {
        self.counts[terrain as usize] += 1;
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.counts[terrain as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl std::fmt::Display for TerrainBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = Terrain::ALL
            .iter()
            .map(|&t| format!("{} {}", t, self.count(t)))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join(", "))
    }
}

/// Outcome of one solve pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub solver: Solver,
    /// Cells from start to exit inclusive; empty when the exit was never reached
    pub path: Vec<Coord>,
    /// Sum of terrain costs of every path cell after the start
    pub cost: u32,
    /// Number of cells expanded during the search
    pub expanded: usize,
    /// Terrain of every path cell after the start
    pub terrain: TerrainBreakdown,
}

impl SolveReport {
    fn new(maze: &Maze, solver: Solver, outcome: SearchOutcome) -> Self {
        let mut terrain = TerrainBreakdown::default();
        outcome
            .path
            .iter()
            .skip(1)
            .for_each(|&c| terrain.add(maze[c].terrain()));
        SolveReport {
            solver,
            cost: path_cost(maze, &outcome.path),
            path: outcome.path,
            expanded: outcome.expanded,
            terrain,
        }
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl std::fmt::Display for SolveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.found() && self.solver.is_weighted() {
            // Cost is what these solvers minimize, so it leads
            write!(
                f,
                "{}: cheapest route costs {} over {} steps, {} cells expanded ({})",
                self.solver,
                self.cost,
                self.steps(),
                self.expanded,
                self.terrain
            )
        } else if self.found() {
            write!(
                f,
                "{}: exit reached in {} steps, cost {}, {} cells expanded ({})",
                self.solver,
                self.steps(),
                self.cost,
                self.expanded,
                self.terrain
            )
        } else {
            write!(
                f,
                "{}: no path found after {} cells expanded",
                self.solver, self.expanded
            )
        }
    }
}

/// What a single search strategy hands back.
struct SearchOutcome {
    path: Vec<Coord>,
    expanded: usize,
}

/// Sum of terrain costs of every cell on `path` after the first.
pub fn path_cost(maze: &Maze, path: &[Coord]) -> u32 {
    path.iter().skip(1).map(|&c| maze[c].terrain().cost()).sum()
}

/// Mark `coord` as the cell being expanded, which is what observers animate.
fn expand(maze: &mut Maze, coord: Coord) {
    maze.set_processing(Some(coord));
    maze.mark_visited(coord);
}

/// Walk parent links back from `goal` and return the path in start-to-goal order.
fn reconstruct_path(maze: &Maze, parents: &[Option<usize>], goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = maze.grid().index_of(goal);
    while let Some(parent) = parents[current] {
        path.push(maze.grid().coord_of(parent));
        current = parent;
    }
    path.reverse();
    path
}

/// Solve the maze from its start to its exit.
///
/// Returns [`MazeError::NotReady`] if no maze with endpoints has been generated yet.
/// Not finding the exit is a normal outcome, reported with an empty path.
pub fn solve_maze(maze: &mut Maze, solver: Solver, seed: Option<u64>) -> Result<SolveReport> {
    let (Some(start), Some(exit)) = (maze.start(), maze.exit()) else {
        return Err(MazeError::NotReady);
    };
    Ok(solve_between(maze, solver, start, exit, seed))
}

/// Solve from `start` to `goal`, both of which must be in bounds.
///
/// Clears the visited flags and the previous path first. `seed` only matters for
/// DFS, which shuffles neighbor order.
pub fn solve_between(
    maze: &mut Maze,
    solver: Solver,
    start: Coord,
    goal: Coord,
    seed: Option<u64>,
) -> SolveReport {
    tracing::info!("[solve] {} from {:?} to {:?}", solver, start, goal);
    maze.clear_visited();
    maze.set_processing(None);
    maze.set_path(Vec::new());

    let outcome = match solver {
        Solver::Bfs => solve_bfs(maze, start, goal),
        Solver::Dfs => solve_dfs(maze, start, goal, &mut get_rng(seed)),
        Solver::Dijkstra => solve_dijkstra(maze, start, goal),
        Solver::AStar => solve_astar(maze, start, goal),
    };

    maze.set_processing(None);
    maze.set_path(outcome.path.clone());
    let report = SolveReport::new(maze, solver, outcome);
    tracing::info!("[solve] {}", report);
    report
}
