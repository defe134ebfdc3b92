use std::{cmp::Reverse, collections::BinaryHeap};

use super::{SearchOutcome, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Entry of the priority frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchNode {
    index: usize,
    /// Cost from the start
    g: u32,
    /// Estimated cost to the goal
    h: u32,
    /// Insertion order, breaks ties between equal priorities
    seq: u64,
}

impl SearchNode {
    fn priority(&self) -> u32 {
        self.g + self.h
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search over terrain cost, ordered by `g + heuristic`.
///
/// With a zero heuristic this is Dijkstra's algorithm. Any heuristic that never
/// overestimates keeps the result optimal.
pub(super) fn weighted_search(
    maze: &mut Maze,
    start: Coord,
    goal: Coord,
    heuristic: impl Fn(Coord) -> u32,
) -> SearchOutcome {
    let mut best = vec![u32::MAX; maze.len()];
    let mut parents: Vec<Option<usize>> = vec![None; maze.len()];
    let mut expanded = 0;
    let mut stale = 0;
    let mut seq = 0;

    // Using Reverse to turn the max-heap into a min-heap
    let mut frontier = BinaryHeap::new();
    let start_idx = maze.grid().index_of(start);
    best[start_idx] = 0;
    frontier.push(Reverse(SearchNode {
        index: start_idx,
        g: 0,
        h: heuristic(start),
        seq,
    }));

    while let Some(Reverse(node)) = frontier.pop() {
        // A cheaper route to this cell was queued after this entry
        if node.g > best[node.index] {
            stale += 1;
            continue;
        }

        let current = maze.grid().coord_of(node.index);
        expand(maze, current);
        expanded += 1;

        if current == goal {
            tracing::debug!("[search] goal popped, {} stale entries skipped", stale);
            return SearchOutcome {
                path: reconstruct_path(maze, &parents, goal),
                expanded,
            };
        }

        for next in maze.open_neighbors(current) {
            let next_idx = maze.grid().index_of(next);
            let g = node.g + maze[next].terrain().cost();
            if g < best[next_idx] {
                best[next_idx] = g;
                parents[next_idx] = Some(node.index);
                seq += 1;
                frontier.push(Reverse(SearchNode {
                    index: next_idx,
                    g,
                    h: heuristic(next),
                    seq,
                }));
            }
        }
    }

    SearchOutcome {
        path: Vec::new(),
        expanded,
    }
}

/// Dijkstra's algorithm: cheapest path by terrain cost.
pub(super) fn solve_dijkstra(maze: &mut Maze, start: Coord, goal: Coord) -> SearchOutcome {
    weighted_search(maze, start, goal, |_| 0)
}
