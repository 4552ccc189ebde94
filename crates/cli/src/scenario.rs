use anyhow::{anyhow, ensure, Context};
use config::{Config, File};
use hexfield::{timed, CubePoint, GridConfig, HexGrid, Terrain};
use log::info;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to build a board for the CLI to run queries against: the
/// grid itself, plus a reproducible scattering of obstacles
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub grid: GridConfig,
    pub obstacles: ObstacleConfig,
}

/// Controls how obstacle terrain gets scattered over the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// RNG seed. The same seed on the same grid always gives the same board.
    pub seed: u64,

    /// Fraction of tiles that get an obstacle, in [0, 1]
    pub density: f64,

    /// Terrains to pick from for each obstacle, uniformly
    pub terrains: Vec<Terrain>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            density: 0.15,
            terrains: vec![
                Terrain::Forest,
                Terrain::Hill,
                Terrain::Water,
                Terrain::Mountain,
                Terrain::Wall,
            ],
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario from a config file. Supported formats: JSON, TOML
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let mut settings = Config::new();
        let config_path = config_path.to_str().ok_or_else(|| {
            anyhow!("invalid character in path {:?}", config_path)
        })?;
        settings
            .merge(File::with_name(config_path))
            .context("error reading config file")?;
        settings.try_into().context("error reading config")
    }

    /// Build the grid and scatter obstacles over it. Tiles in `keep_clear`
    /// are always left as plain ground, so that query endpoints never land
    /// inside a wall by accident.
    pub fn build(&self, keep_clear: &[CubePoint]) -> anyhow::Result<HexGrid> {
        let obstacles = &self.obstacles;
        ensure!(
            (0.0..=1.0).contains(&obstacles.density),
            "obstacle density must be in [0, 1], got {}",
            obstacles.density
        );

        let mut grid = HexGrid::new(self.grid)?;
        let mut rng = Pcg64::seed_from_u64(obstacles.seed);
        let points: Vec<CubePoint> = grid.tiles().keys().copied().collect();
        let mut placed = 0;
        timed!("Obstacle scattering", {
            for point in points {
                // Always roll, so the same seed places the same obstacles no
                // matter which tiles are kept clear
                let roll = rng.gen_bool(obstacles.density);
                let terrain = obstacles.terrains.choose(&mut rng).copied();
                if let (true, Some(terrain)) = (roll, terrain) {
                    if !keep_clear.contains(&point) {
                        if let Some(tile) = grid.tile_mut(point) {
                            tile.set_terrain(terrain);
                            placed += 1;
                        }
                    }
                }
            }
        });
        info!(
            "Placed {} obstacles on {} tiles (seed {})",
            placed,
            grid.len(),
            obstacles.seed
        );
        Ok(grid)
    }
}
