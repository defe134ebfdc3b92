//! Graph checks shared by the unit tests.

use std::collections::VecDeque;

use crate::maze::{Coord, Direction, Maze};

/// Every shared wall has the same state on both sides, and the outer border is closed.
pub fn walls_are_symmetric(maze: &Maze) -> bool {
    maze.grid().coords().all(|coord| {
        Direction::ALL
            .iter()
            .all(|&dir| match maze.neighbor_of(coord, dir) {
                Some(next) => maze[coord].is_open(dir) == maze[next].is_open(dir.opposite()),
                None => maze[coord].has_wall(dir),
            })
    })
}

/// Fewest steps between two cells through open walls.
pub fn graph_distance(maze: &Maze, from: Coord, to: Coord) -> Option<usize> {
    let mut distance = vec![None; maze.len()];
    distance[maze.grid().index_of(from)] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        let d = distance[maze.grid().index_of(current)]?;
        if current == to {
            return Some(d);
        }
        for next in maze.open_neighbors(current) {
            let slot = &mut distance[maze.grid().index_of(next)];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Every cell is reachable from the top-left corner.
pub fn is_connected(maze: &Maze) -> bool {
    maze.grid()
        .coords()
        .all(|coord| graph_distance(maze, (0, 0), coord).is_some())
}

/// Connected with exactly one passage fewer than cells, i.e. a spanning tree, which
/// is the same as one simple path between every pair of cells.
pub fn has_unique_paths(maze: &Maze) -> bool {
    is_connected(maze) && maze.open_passages() == maze.len() - 1
}

/// Consecutive cells are neighbors joined by an open wall, and no cell repeats.
pub fn is_valid_path(maze: &Maze, path: &[Coord]) -> bool {
    let joined = path.windows(2).all(|pair| {
        maze.open_neighbors(pair[0]).any(|next| next == pair[1])
    });
    let mut seen = vec![false; maze.len()];
    let simple = path.iter().all(|&c| {
        let idx = maze.grid().index_of(c);
        !std::mem::replace(&mut seen[idx], true)
    });
    !path.is_empty() && joined && simple
}
