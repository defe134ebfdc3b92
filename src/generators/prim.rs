use rand::Rng;

use super::WallEdge;
use crate::maze::{Coord, Maze};

/// Push every wall of `cell` that leads to a cell not yet in the maze.
fn add_frontier_walls(maze: &Maze, cell: Coord, in_maze: &[bool], frontier: &mut Vec<WallEdge>) {
    frontier.extend(
        maze.grid()
            .neighbors(cell)
            .filter(|&(_, next)| !in_maze[maze.grid().index_of(next)])
            .filter_map(|(dir, _)| WallEdge::between(maze, cell, dir)),
    );
}

/// Randomized Prim's algorithm over walls, growing the maze from the top-left cell.
///
/// Expects a maze with every wall closed.
pub fn randomized_prim<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let mut in_maze = vec![false; maze.len()];

    let start: Coord = (0, 0);
    in_maze[maze.grid().index_of(start)] = true;
    maze.mark_visited(start);
    maze.set_processing(Some(start));

    let mut frontier = Vec::new();
    add_frontier_walls(maze, start, &in_maze, &mut frontier);

    while !frontier.is_empty() {
        // Pick a random wall; order doesn't matter so swap_remove keeps it O(1)
        let idx = rng.random_range(0..frontier.len());
        let wall = frontier.swap_remove(idx);

        let next = maze.grid().index_of(wall.to);
        if in_maze[next] {
            // Both sides already carved, opening it would close a loop
            continue;
        }

        wall.open(maze);
        in_maze[next] = true;
        maze.mark_visited(wall.to);
        maze.set_processing(Some(wall.to));

        add_frontier_walls(maze, wall.to, &in_maze, &mut frontier);
    }
    tracing::debug!("[prim] carved {} cells", in_maze.len());
}
