use rand::{SeedableRng, rngs::StdRng};

mod disjoint_set;
mod finishing;
mod kruskal;
mod prim;

pub use disjoint_set::DisjointSet;

use crate::{
    config::MazeConfig,
    error::MazeError,
    maze::{Coord, Direction, Maze},
};
use kruskal::randomized_kruskal;
use prim::randomized_prim;

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Prim,
    Kruskal,
}

impl Generator {
    pub const ALL: [Generator; 2] = [Generator::Prim, Generator::Kruskal];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
        }
    }
}

impl std::str::FromStr for Generator {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prim" => Ok(Generator::Prim),
            "kruskal" => Ok(Generator::Kruskal),
            other => Err(MazeError::InvalidConfiguration(format!(
                "unknown generator '{}', expected prim or kruskal",
                other
            ))),
        }
    }
}

/// Wall between two adjacent cells, the unit both generators open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WallEdge {
    from: Coord,
    to: Coord,
    /// Side of `from` the wall sits on
    direction: Direction,
}

impl WallEdge {
    /// The wall on the `direction` side of `from`, if `from` has a neighbor there.
    fn between(maze: &Maze, from: Coord, direction: Direction) -> Option<WallEdge> {
        maze.neighbor_of(from, direction).map(|to| WallEdge {
            from,
            to,
            direction,
        })
    }

    fn open(&self, maze: &mut Maze) -> bool {
        maze.open_wall(self.from, self.direction)
    }
}

/// Summary of a finished generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub generator: Generator,
    /// Open walls between cells once everything is carved
    pub open_passages: usize,
    /// Extra walls opened by braiding
    pub braid_openings: usize,
    pub start: Coord,
    pub exit: Coord,
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dungeon ready ({}): {} passages, {} braided, start {:?}, exit {:?}",
            self.generator, self.open_passages, self.braid_openings, self.start, self.exit
        )
    }
}

/// Carve a fresh maze in place.
///
/// The maze is reset to all walls first, then carved into a spanning tree with the
/// chosen algorithm. Terrain is rolled for every cell, extra passages are opened if
/// braiding is enabled, and finally the start and exit are placed.
pub fn generate_maze(maze: &mut Maze, generator: Generator, config: &MazeConfig) -> GenerationReport {
    let mut rng = get_rng(config.seed);
    tracing::info!(
        "[generate] {} on a {}x{} grid",
        generator,
        maze.width(),
        maze.height()
    );

    maze.reset();
    match generator {
        Generator::Prim => randomized_prim(maze, &mut rng),
        Generator::Kruskal => randomized_kruskal(maze, &mut rng),
    }
    maze.set_processing(None);
    maze.clear_visited();

    finishing::assign_terrain(maze, &config.terrain, &mut rng);
    let braid_openings = finishing::braid(maze, config.braid_attempts(), &mut rng);
    let (start, exit) = finishing::place_endpoints(maze, &mut rng);

    let report = GenerationReport {
        generator,
        open_passages: maze.open_passages(),
        braid_openings,
        start,
        exit,
    };
    tracing::info!("[generate] {}", report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Label;
    use crate::test_utils::{has_unique_paths, is_connected, walls_are_symmetric};

    fn generated(width: u16, height: u16, generator: Generator, config: &MazeConfig) -> Maze {
        let mut maze = Maze::new(width, height, None).unwrap();
        generate_maze(&mut maze, generator, config);
        maze
    }

    #[test]
    fn test_perfect_maze_is_spanning_tree() {
        for generator in Generator::ALL {
            for seed in 0..10 {
                let config = MazeConfig::new(9, 7).with_seed(Some(seed));
                let maze = generated(9, 7, generator, &config);
                assert_eq!(maze.open_passages(), 9 * 7 - 1, "{} seed {}", generator, seed);
                assert!(is_connected(&maze));
                assert!(walls_are_symmetric(&maze));
            }
        }
    }

    #[test]
    fn test_unique_paths_between_all_pairs() {
        for generator in Generator::ALL {
            let config = MazeConfig::new(5, 4).with_seed(Some(3));
            let maze = generated(5, 4, generator, &config);
            assert!(has_unique_paths(&maze));
        }
    }

    #[test]
    fn test_braiding_only_adds_passages() {
        for generator in Generator::ALL {
            let perfect = MazeConfig::new(12, 10).with_seed(Some(11));
            let braided = perfect.clone().with_braid(true);
            let tree = generated(12, 10, generator, &perfect);
            let loopy = generated(12, 10, generator, &braided);

            // Same seed, so braiding starts from the identical tree
            for coord in tree.grid().coords() {
                for dir in Direction::ALL {
                    if tree[coord].is_open(dir) {
                        assert!(loopy[coord].is_open(dir));
                    }
                }
            }
            assert!(loopy.open_passages() >= tree.open_passages());
            assert!(loopy.open_passages() <= tree.open_passages() + braided.braid_attempts());
            assert!(is_connected(&loopy));
            assert!(walls_are_symmetric(&loopy));
        }
    }

    #[test]
    fn test_endpoints_placement() {
        for seed in 0..20 {
            let config = MazeConfig::new(9, 6).with_seed(Some(seed));
            let maze = generated(9, 6, Generator::Prim, &config);
            assert_eq!(maze.start(), Some((0, 0)));
            assert_eq!(maze[(0, 0)].label(), Some(Label::Start));
            let (ex, ey) = maze.exit().unwrap();
            assert!((6..9).contains(&ex), "exit column {} outside the right third", ex);
            assert!(ey < 6);
            assert_eq!(maze[(ex, ey)].label(), Some(Label::Exit));
            assert_eq!(maze[(ex, ey)].terrain(), crate::maze::Terrain::Dirt);
        }
    }

    #[test]
    fn test_no_visited_flags_left_behind() {
        let config = MazeConfig::new(6, 6).with_seed(Some(5));
        let maze = generated(6, 6, Generator::Kruskal, &config);
        assert!(maze.grid().iter().all(|cell| !cell.visited()));
        assert_eq!(maze.processing(), None);
    }

    #[test]
    fn test_single_cell_maze() {
        for generator in Generator::ALL {
            let config = MazeConfig::new(1, 1).with_seed(Some(1)).with_braid(true);
            let maze = generated(1, 1, generator, &config);
            assert_eq!(maze.open_passages(), 0);
            assert_eq!(maze.start(), Some((0, 0)));
            assert_eq!(maze.exit(), Some((0, 0)));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        for generator in Generator::ALL {
            let config = MazeConfig::new(10, 8).with_seed(Some(42)).with_braid(true);
            let first = generated(10, 8, generator, &config);
            let second = generated(10, 8, generator, &config);
            assert!(first.grid().iter().eq(second.grid().iter()));
            assert_eq!(first.exit(), second.exit());
        }
    }

    #[test]
    fn test_regeneration_resets_grid() {
        let config = MazeConfig::new(8, 8).with_seed(Some(9)).with_braid(true);
        let mut maze = generated(8, 8, Generator::Prim, &config);
        generate_maze(&mut maze, Generator::Kruskal, &config.clone().with_braid(false));
        assert_eq!(maze.open_passages(), 63);
        assert!(is_connected(&maze));
    }

    #[test]
    fn test_parse_generator() {
        assert_eq!("Prim".parse::<Generator>(), Ok(Generator::Prim));
        assert_eq!(" kruskal ".parse::<Generator>(), Ok(Generator::Kruskal));
        assert!("wilson".parse::<Generator>().is_err());
    }
}
