use super::{SearchOutcome, dijkstra::weighted_search};
use crate::maze::{Coord, Maze};

/// Manhattan distance. Every step costs at least 1, so this never overestimates.
pub(super) fn manhattan(a: Coord, b: Coord) -> u32 {
    (a.0.abs_diff(b.0) as u32) + (a.1.abs_diff(b.1) as u32)
}

/// A* search guided by Manhattan distance to the goal.
pub(super) fn solve_astar(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    weighted_search(maze, start, goal, |c| manhattan(c, goal))
}
