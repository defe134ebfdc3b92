use rand::{Rng, seq::SliceRandom};

use super::{DisjointSet, WallEdge};
use crate::maze::{Direction, Maze};

/// Every internal wall of the maze exactly once: the right and bottom side of each cell
/// that has a neighbor there.
fn internal_walls(maze: &Maze) -> Vec<WallEdge> {
    maze.grid()
        .coords()
        .flat_map(|coord| {
            [Direction::Right, Direction::Bottom]
                .into_iter()
                .filter_map(move |dir| WallEdge::between(maze, coord, dir))
        })
        .collect()
}

/// Randomized Kruskal's algorithm: open shuffled walls whenever they join two cells
/// that are not connected yet.
///
/// Expects a maze with every wall closed.
pub fn randomized_kruskal<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let mut walls = internal_walls(maze);
    walls.shuffle(rng);
    tracing::debug!("[kruskal] {} candidate walls", walls.len());

    let mut sets = DisjointSet::new(maze.len());
    for wall in walls {
        let from = maze.grid().index_of(wall.from);
        let to = maze.grid().index_of(wall.to);

        // If cells are not yet connected, remove the wall between them
        if sets.union(from, to) {
            wall.open(maze);
            maze.mark_visited(wall.from);
            maze.mark_visited(wall.to);
            maze.set_processing(Some(wall.to));
        }
    }
}
