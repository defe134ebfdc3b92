//! Steps applied to a carved maze regardless of the algorithm that carved it.

use rand::{Rng, seq::IndexedRandom};

use crate::{
    config::TerrainDistribution,
    maze::{Coord, Maze},
};

/// Roll a terrain kind for every cell.
pub fn assign_terrain<R: Rng>(maze: &mut Maze, distribution: &TerrainDistribution, rng: &mut R) {
    for coord in maze.grid().coords() {
        let chance: f64 = rng.random();
        maze.set_terrain(coord, distribution.sample(chance));
    }
}

/// Open `attempts` random walls between a random cell and a random neighbor of it,
/// whatever their current state, so the maze gets loops.
///
/// Returns how many of the attempts actually removed a wall.
pub fn braid<R: Rng>(maze: &mut Maze, attempts: usize, rng: &mut R) -> usize {
    let mut opened = 0;
    for _ in 0..attempts {
        let coord = (
            rng.random_range(0..maze.width()),
            rng.random_range(0..maze.height()),
        );
        let directions = maze
            .grid()
            .neighbors(coord)
            .map(|(dir, _)| dir)
            .collect::<Vec<_>>();
        if let Some(&dir) = directions.choose(rng) {
            if maze.open_wall(coord, dir) {
                opened += 1;
            }
        }
    }
    tracing::debug!("[braid] {} of {} attempts opened a wall", opened, attempts);
    opened
}

/// Put the start in the top-left corner and the exit somewhere in the rightmost third
/// of the columns.
pub fn place_endpoints<R: Rng>(maze: &mut Maze, rng: &mut R) -> (Coord, Coord) {
    let start = (0, 0);
    maze.set_start(start);

    let width = maze.width();
    let first_column = width - (width / 3).max(1);
    let exit = (
        rng.random_range(first_column..width),
        rng.random_range(0..maze.height()),
    );
    maze.set_exit(exit);
    tracing::debug!("[generate] start at {:?}, exit at {:?}", start, exit);
    (start, exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use crate::maze::{Label, Terrain};

    #[test]
    fn test_terrain_follows_distribution() {
        let mut maze = Maze::new(100, 100, None).unwrap();
        assign_terrain(&mut maze, &TerrainDistribution::default(), &mut get_rng(Some(1)));
        let count = |terrain| maze.grid().iter().filter(|c| c.terrain() == terrain).count();
        let (dirt, grass, mud, water) = (
            count(Terrain::Dirt),
            count(Terrain::Grass),
            count(Terrain::Mud),
            count(Terrain::Water),
        );
        assert_eq!(dirt + grass + mud + water, 10_000);
        // Loose bounds around 50% / 25% / 15% / 10%
        assert!((4500..5500).contains(&dirt), "dirt {}", dirt);
        assert!((2000..3000).contains(&grass), "grass {}", grass);
        assert!((1100..1900).contains(&mud), "mud {}", mud);
        assert!((700..1300).contains(&water), "water {}", water);
    }

    #[test]
    fn test_all_water_distribution() {
        let mut maze = Maze::new(5, 5, None).unwrap();
        let all_water = TerrainDistribution {
            thresholds: [0.0, 0.0, 0.0],
        };
        assign_terrain(&mut maze, &all_water, &mut get_rng(Some(3)));
        assert!(maze.grid().iter().all(|c| c.terrain() == Terrain::Water));
    }

    #[test]
    fn test_braid_opens_walls() {
        let mut maze = Maze::new(6, 6, None).unwrap();
        let opened = braid(&mut maze, 10, &mut get_rng(Some(8)));
        assert!(opened > 0 && opened <= 10);
        assert_eq!(maze.open_passages(), opened);
    }

    #[test]
    fn test_braid_without_neighbors() {
        let mut maze = Maze::new(1, 1, None).unwrap();
        assert_eq!(braid(&mut maze, 5, &mut get_rng(Some(8))), 0);
    }

    #[test]
    fn test_exit_in_right_third() {
        let mut rng = get_rng(Some(6));
        for width in 1..12u16 {
            let mut maze = Maze::new(width, 3, None).unwrap();
            let (start, (ex, ey)) = place_endpoints(&mut maze, &mut rng);
            assert_eq!(start, (0, 0));
            assert!(ex < width && ey < 3);
            assert!(ex >= width - (width / 3).max(1));
            assert_eq!(maze[(ex, ey)].label(), Some(Label::Exit));
        }
    }
}
