use std::collections::VecDeque;

use super::{SearchOutcome, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Breadth-first search: fewest steps, terrain ignored.
pub(super) fn solve_bfs(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    let mut visited = vec![false; maze.len()];
    let mut parents: Vec<Option<usize>> = vec![None; maze.len()];
    let mut expanded = 0;

    // Cells are marked when queued, not when dequeued, so nothing is queued twice
    let mut queue = VecDeque::from([start]);
    visited[maze.grid().index_of(start)] = true;

    while let Some(current) = queue.pop_front() {
        expand(maze, current);
        expanded += 1;

        if current == goal {
            return SearchOutcome {
                path: reconstruct_path(maze, &parents, goal),
                expanded,
            };
        }

        let current_idx = maze.grid().index_of(current);
        for next in maze.open_neighbors(current) {
            let next_idx = maze.grid().index_of(next);
            if !visited[next_idx] {
                visited[next_idx] = true;
                parents[next_idx] = Some(current_idx);
                queue.push_back(next);
            }
        }
    }

    SearchOutcome {
        path: Vec::new(),
        expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;

    #[test]
    fn test_bfs_prefers_fewer_steps() {
        // 2x2 loop: both routes to the far corner take two steps, Top/Right first wins
        let mut maze = Maze::new(2, 2, None).unwrap();
        maze.open_wall((0, 0), Direction::Right);
        maze.open_wall((0, 0), Direction::Bottom);
        maze.open_wall((1, 0), Direction::Bottom);
        maze.open_wall((0, 1), Direction::Right);
        let outcome = solve_bfs(&mut maze, (0, 0), (1, 1));
        assert_eq!(outcome.path, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_bfs_expands_in_rings() {
        let mut maze = Maze::new(4, 1, None).unwrap();
        for x in 0..3 {
            maze.open_wall((x, 0), Direction::Right);
        }
        let outcome = solve_bfs(&mut maze, (0, 0), (3, 0));
        assert_eq!(outcome.expanded, 4);
        assert_eq!(outcome.path.len(), 4);
    }
}
