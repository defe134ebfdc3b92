use rand::{Rng, seq::SliceRandom};

use super::{SearchOutcome, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Depth-first search with shuffled neighbor order. Finds a path, not necessarily a
/// short one.
pub(super) fn solve_dfs<R: Rng>(
    maze: &mut Maze,
    start: Coord,
    goal: Coord,
    rng: &mut R,
) -> SearchOutcome {
    let mut visited = vec![false; maze.len()];
    let mut parents: Vec<Option<usize>> = vec![None; maze.len()];
    let mut expanded = 0;

    let mut stack = vec![start];
    visited[maze.grid().index_of(start)] = true;

    while let Some(current) = stack.pop() {
        expand(maze, current);
        expanded += 1;

        if current == goal {
            return SearchOutcome {
                path: reconstruct_path(maze, &parents, goal),
                expanded,
            };
        }

        let current_idx = maze.grid().index_of(current);
        let mut neighbors = maze.open_neighbors(current).collect::<Vec<_>>();
        // Avoid always diving in the same direction
        neighbors.shuffle(rng);
        for next in neighbors {
            let next_idx = maze.grid().index_of(next);
            if !visited[next_idx] {
                visited[next_idx] = true;
                parents[next_idx] = Some(current_idx);
                stack.push(next);
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
    use crate::generators::get_rng;
    use crate::maze::Direction;
    use crate::test_utils::is_valid_path;

    fn open_field(size: u16) -> Maze {
        let mut maze = Maze::new(size, size, None).unwrap();
        for y in 0..size {
            for x in 0..size {
                maze.open_wall((x, y), Direction::Right);
                maze.open_wall((x, y), Direction::Bottom);
            }
        }
        maze
    }

    #[test]
    fn test_dfs_finds_valid_path() {
        let mut maze = open_field(6);
        maze.set_start((0, 0));
        maze.set_exit((5, 5));
        let outcome = solve_dfs(&mut maze, (0, 0), (5, 5), &mut get_rng(Some(3)));
        assert!(is_valid_path(&maze, &outcome.path));
        assert!(outcome.path.len() >= 11);
    }

    #[test]
    fn test_dfs_is_reproducible_with_seed() {
        let mut maze = open_field(6);
        let first = solve_dfs(&mut maze, (0, 0), (5, 5), &mut get_rng(Some(9)));
        let second = solve_dfs(&mut maze, (0, 0), (5, 5), &mut get_rng(Some(9)));
        assert_eq!(first.path, second.path);
        assert_eq!(first.expanded, second.expanded);
    }

    #[test]
    fn test_dfs_route_depends_on_seed() {
        let mut maze = open_field(6);
        let outcomes = (0..10)
            .map(|seed| solve_dfs(&mut maze, (0, 0), (5, 5), &mut get_rng(Some(seed))))
            .map(|outcome| (outcome.path, outcome.expanded))
            .collect::<Vec<_>>();
        assert!(
            outcomes.iter().any(|o| *o != outcomes[0]),
            "every seed took the same route"
        );
    }
}
