//! Configuration for maze generation and solving

use crate::error::{MazeError, Result};
use crate::maze::Terrain;

/// Maps a uniform sample in `[0, 1)` to a terrain kind through cumulative
/// thresholds for Dirt, Grass and Mud; anything above the last threshold is Water.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainDistribution {
    pub thresholds: [f64; 3],
}

impl Default for TerrainDistribution {
    fn default() -> Self {
        Self {
            thresholds: [0.50, 0.75, 0.90],
        }
    }
}

impl TerrainDistribution {
    pub fn sample(&self, chance: f64) -> Terrain {
        let [dirt, grass, mud] = self.thresholds;
        if chance < dirt {
            Terrain::Dirt
        } else if chance < grass {
            Terrain::Grass
        } else if chance < mud {
            Terrain::Mud
        } else {
            Terrain::Water
        }
    }

    fn validate(&self) -> Result<()> {
        let ascending = self.thresholds.windows(2).all(|w| w[0] <= w[1]);
        let in_range = self
            .thresholds
            .iter()
            .all(|t| (0.0..=1.0).contains(t));
        if ascending && in_range {
            Ok(())
        } else {
            Err(MazeError::InvalidConfiguration(format!(
                "terrain thresholds must be ascending within [0, 1], got {:?}",
                self.thresholds
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    /// Maze width in cells
    pub width: u16,
    /// Maze height in cells
    pub height: u16,
    /// Seed for every random choice. `None` seeds from the OS on each run.
    pub seed: Option<u64>,
    /// Carve extra passages after generation so the maze has loops
    pub braid: bool,
    /// When braiding, attempt `cells / braid_divisor` extra openings
    pub braid_divisor: usize,
    pub terrain: TerrainDistribution,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 35,
            height: 25,
            seed: None,
            braid: false,
            braid_divisor: 10,
            terrain: TerrainDistribution::default(),
        }
    }
}

impl MazeConfig {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_braid(mut self, braid: bool) -> Self {
        self.braid = braid;
        self
    }

    pub fn with_braid_divisor(mut self, braid_divisor: usize) -> Self {
        self.braid_divisor = braid_divisor;
        self
    }

    pub fn with_terrain(mut self, terrain: TerrainDistribution) -> Self {
        self.terrain = terrain;
        self
    }

    /// Check the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MazeError::InvalidConfiguration(format!(
                "maze dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.braid_divisor == 0 {
            return Err(MazeError::InvalidConfiguration(
                "braid divisor must be positive".to_string(),
            ));
        }
        self.terrain.validate()
    }

    /// Number of extra openings a braided maze of this size gets.
    pub fn braid_attempts(&self) -> usize {
        if !self.braid {
            return 0;
        }
        (self.width as usize * self.height as usize) / self.braid_divisor.max(1)
    }
}
