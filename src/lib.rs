//! Terrain-weighted maze generation and pathfinding.
//!
//! Mazes are carved with randomized Prim's or Kruskal's algorithm, given terrain,
//! optionally braided, and solved with BFS, DFS, Dijkstra or A*. The [`Engine`]
//! runs one job at a time on a worker thread and streams [`MazeEvent`]s so a front
//! end can animate every step.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod maze;
pub mod solvers;

#[cfg(test)]
mod test_utils;

pub use config::{MazeConfig, TerrainDistribution};
pub use engine::Engine;
pub use error::{MazeError, Result};
pub use generators::{GenerationReport, Generator, generate_maze};
pub use maze::{Cell, Coord, Direction, Label, Maze, MazeEvent, RunReport, Terrain};
pub use solvers::{SolveReport, Solver, solve_maze};
