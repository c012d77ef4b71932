//! # Terrain Sampling
//!
//! [`TerrainGenerator`] answers every per-cell question the chunk generator
//! and the point queries ask: surface height, biome, cave carving, ore
//! placement and the material at a given depth.
//!
//! All public methods take integer cell coordinates. Noise is sampled at
//! `cell * block_size`, so the grid and the point queries share one
//! implementation and can never drift apart.

use strata_core::{MaterialId, WorldConfig};

use crate::biome::{Biome, BiomeClassifier};
use crate::noise::{value_noise_2d, value_noise_3d, WorldSeed};

/// Height octaves as `(frequency, seed offset, weight)`.
const HEIGHT_OCTAVES: [(f64, u32, f64); 4] = [
    (0.1, 0, 0.5),
    (0.05, 100, 0.3),
    (0.02, 200, 0.15),
    (0.15, 300, 0.05),
];

/// Combined height noise is multiplied by this before rounding.
const HEIGHT_SCALE: f64 = 2.5;

/// Cave octaves as `(frequency, seed offset)`, averaged.
const CAVE_OCTAVES: [(f64, u32); 4] = [(0.06, 1000), (0.09, 2000), (0.12, 3000), (0.15, 4000)];

/// Cells this close above the bedrock band are never carved.
pub const CAVE_BEDROCK_MARGIN: i32 = 3;

/// Cells with depth-from-surface below this are never carved.
pub const CAVE_SURFACE_CRUST: i32 = 2;

/// Depth-from-surface up to which the biome subsoil is used.
pub const SUBSOIL_DEPTH: i32 = 3;

/// Ore noise frequency.
const ORE_FREQUENCY: f64 = 0.1;
/// Ore noise seed offset.
const ORE_SEED: u32 = 400;

/// One depth-gated ore rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OreRule {
    /// Ore placed when the rule matches.
    pub material: MaterialId,
    /// Minimum depth below the column surface, in cells.
    pub min_depth: i32,
    /// Sample elevation (`y * block_size`) must be below this.
    pub max_sample_y: f64,
    /// Ore noise must exceed this.
    pub threshold: f64,
}

/// Ore rules, rarest first. The first match wins.
pub const ORE_RULES: [OreRule; 4] = [
    OreRule {
        material: MaterialId::DiamondOre,
        min_depth: 15,
        max_sample_y: -20.0,
        threshold: 0.85,
    },
    OreRule {
        material: MaterialId::GoldOre,
        min_depth: 10,
        max_sample_y: -10.0,
        threshold: 0.82,
    },
    OreRule {
        material: MaterialId::IronOre,
        min_depth: 6,
        max_sample_y: 10.0,
        threshold: 0.78,
    },
    OreRule {
        material: MaterialId::CoalOre,
        min_depth: 4,
        max_sample_y: 30.0,
        threshold: 0.75,
    },
];

/// Per-column terrain summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSample {
    /// Elevation of the topmost terrain cell.
    pub height: i32,
    /// Column biome.
    pub biome: Biome,
}

/// Deterministic terrain sampler.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: WorldSeed,
    biomes: BiomeClassifier,
    /// Noise units per cell.
    sample_scale: f64,
    bedrock_top: i32,
    cave_threshold: f64,
}

impl TerrainGenerator {
    /// Creates a sampler from a world configuration.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        let seed = WorldSeed::new(config.seed);
        Self {
            seed,
            biomes: BiomeClassifier::new(seed),
            sample_scale: f64::from(config.block_size),
            bedrock_top: config.bedrock_top,
            cave_threshold: config.cave_threshold,
        }
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Noise-space coordinate of a cell index.
    #[inline]
    #[must_use]
    pub fn sample_coord(&self, cell: i32) -> f64 {
        f64::from(cell) * self.sample_scale
    }

    /// Biome of a cell column.
    #[must_use]
    pub fn biome_at(&self, cell_x: i32, cell_z: i32) -> Biome {
        self.biomes
            .classify(self.sample_coord(cell_x), self.sample_coord(cell_z))
    }

    /// Elevation of the topmost terrain cell of a column.
    ///
    /// Four octaves of value noise, scaled by the biome multiplier and
    /// rounded after [`HEIGHT_SCALE`].
    #[must_use]
    pub fn height_at(&self, cell_x: i32, cell_z: i32) -> i32 {
        self.column(cell_x, cell_z).height
    }

    /// Height and biome of a column in one pass.
    #[must_use]
    pub fn column(&self, cell_x: i32, cell_z: i32) -> ColumnSample {
        let x = self.sample_coord(cell_x);
        let z = self.sample_coord(cell_z);
        let biome = self.biomes.classify(x, z);

        let combined: f64 = HEIGHT_OCTAVES
            .iter()
            .map(|&(frequency, offset, weight)| {
                value_noise_2d(x, z, frequency, self.seed.offset(offset)) * weight
            })
            .sum();
        let height = (combined * biome.height_multiplier() * HEIGHT_SCALE).round() as i32;

        ColumnSample { height, biome }
    }

    /// Raw cave density in `[0, 1)`: the mean of four 3D octaves.
    #[must_use]
    pub fn cave_density(&self, cell_x: i32, y: i32, cell_z: i32) -> f64 {
        let x = self.sample_coord(cell_x);
        let y = self.sample_coord(y);
        let z = self.sample_coord(cell_z);
        let sum: f64 = CAVE_OCTAVES
            .iter()
            .map(|&(frequency, offset)| value_noise_3d(x, y, z, frequency, self.seed.offset(offset)))
            .sum();
        sum / CAVE_OCTAVES.len() as f64
    }

    /// True if a terrain cell is carved out as cave.
    ///
    /// Cells within [`CAVE_BEDROCK_MARGIN`] of the bedrock band and within
    /// the [`CAVE_SURFACE_CRUST`] below the column surface are never carved.
    #[must_use]
    pub fn is_cave(&self, cell_x: i32, y: i32, cell_z: i32, surface: i32) -> bool {
        if y <= self.bedrock_top + CAVE_BEDROCK_MARGIN {
            return false;
        }
        if surface - y < CAVE_SURFACE_CRUST {
            return false;
        }
        self.cave_density(cell_x, y, cell_z) > self.cave_threshold
    }

    /// Ore at a cell `depth` cells below the surface, if any.
    #[must_use]
    pub fn ore_at(&self, cell_x: i32, y: i32, cell_z: i32, depth: i32) -> Option<MaterialId> {
        let sample_y = self.sample_coord(y);
        let noise = value_noise_3d(
            self.sample_coord(cell_x),
            sample_y,
            self.sample_coord(cell_z),
            ORE_FREQUENCY,
            self.seed.offset(ORE_SEED),
        );
        ORE_RULES
            .iter()
            .find(|rule| {
                depth >= rule.min_depth && sample_y < rule.max_sample_y && noise > rule.threshold
            })
            .map(|rule| rule.material)
    }

    /// Material of a solid terrain cell by depth below the surface.
    ///
    /// Surface cells take the biome top material, the next
    /// [`SUBSOIL_DEPTH`] cells the biome subsoil, and deeper cells an ore
    /// or stone.
    #[must_use]
    pub fn material_at(&self, cell_x: i32, y: i32, cell_z: i32, column: ColumnSample) -> MaterialId {
        let depth = column.height - y;
        if depth <= 0 {
            column.biome.surface_material()
        } else if depth <= SUBSOIL_DEPTH {
            column.biome.subsoil_material()
        } else {
            self.ore_at(cell_x, y, cell_z, depth)
                .unwrap_or(MaterialId::Stone)
        }
    }
}
