//! # Chunk Generation
//!
//! Builds one chunk's voxel grid as an ordered pipeline, each stage taking
//! exclusive ownership of the grid in turn:
//!
//! 1. **Populate**: bedrock band, then per-column terrain with caves carved
//!    and materials resolved by depth
//! 2. **Features**: trees and cacti
//! 3. **Flood fill**: water into every empty cell at or below sea level
//!
//! Meshing is the caller's last stage; this crate never renders.
//!
//! Generation is a pure function of `(config, key)` and touches no state
//! outside the returned grid.

use strata_core::{ChunkKey, MaterialId, Voxel, VoxelGrid, WorldConfig};

use crate::features::{FeaturePlacer, FeatureStats};
use crate::terrain::{ColumnSample, TerrainGenerator};
use crate::water::{FloodFillStats, WaterFloodFill};

/// A freshly generated chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedChunk {
    /// Chunk key.
    pub key: ChunkKey,
    /// Populated, decorated and flooded grid.
    pub grid: VoxelGrid,
    /// What the stages did.
    pub stats: GenerationStats,
}

/// Per-stage counters for one chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Solid terrain cells placed (bedrock included).
    pub terrain_cells: usize,
    /// Cells left empty by cave carving.
    pub carved_cells: usize,
    /// Feature placement outcome.
    pub features: FeatureStats,
    /// Flood fill outcome.
    pub water: FloodFillStats,
}

/// Chunk generator.
#[derive(Clone, Debug)]
pub struct ChunkGenerator {
    config: WorldConfig,
    terrain: TerrainGenerator,
    features: FeaturePlacer,
    water: WaterFloodFill,
}

impl ChunkGenerator {
    /// Creates a generator for `config`.
    ///
    /// The config is assumed validated.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            config: config.clone(),
            terrain: TerrainGenerator::new(config),
            features: FeaturePlacer::new(config),
            water: WaterFloodFill::new(config.sea_level),
        }
    }

    /// The terrain sampler shared by generation and point queries.
    #[inline]
    #[must_use]
    pub const fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// The configuration this generator was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Allocates an empty grid of this world's dimensions.
    #[must_use]
    pub fn empty_grid(&self) -> VoxelGrid {
        VoxelGrid::new(
            self.config.chunk_size,
            self.config.world_height,
            self.config.world_floor,
        )
    }

    /// Runs the full pipeline: populate, features, flood fill.
    #[must_use]
    pub fn generate(&self, key: ChunkKey) -> GeneratedChunk {
        let mut grid = self.empty_grid();
        let mut stats = self.populate_into(key, &mut grid);

        if self.config.generate_features {
            stats.features = self.features.place(key, &mut grid, &self.terrain);
        }
        stats.water = self.water.fill(&mut grid);

        tracing::debug!(
            chunk = %key,
            terrain = stats.terrain_cells,
            carved = stats.carved_cells,
            trees = stats.features.trees,
            cacti = stats.features.cacti,
            water = stats.water.placed,
            "chunk generated"
        );

        GeneratedChunk { key, grid, stats }
    }

    /// Terrain population only (no features, no water).
    #[must_use]
    pub fn populate(&self, key: ChunkKey) -> VoxelGrid {
        let mut grid = self.empty_grid();
        self.populate_into(key, &mut grid);
        grid
    }

    fn populate_into(&self, key: ChunkKey, grid: &mut VoxelGrid) -> GenerationStats {
        let mut stats = GenerationStats::default();
        let size = self.config.chunk_size as i32;
        let floor = grid.floor();
        let highest = grid.top() - 1;

        for x in 0..size {
            for z in 0..size {
                let cell_x = key.origin_x(size) + x;
                let cell_z = key.origin_z(size) + z;
                let column = self.terrain.column(cell_x, cell_z);
                let column_top = column.height.max(self.config.sea_level).min(highest);

                for y in floor..=column_top {
                    match self.cell(cell_x, y, cell_z, column) {
                        Cell::Solid(material) => {
                            grid.set(x, y, z, Voxel::terrain(material));
                            stats.terrain_cells += 1;
                        }
                        Cell::Carved => stats.carved_cells += 1,
                        Cell::Open => {}
                    }
                }
            }
        }
        stats
    }

    fn cell(&self, cell_x: i32, y: i32, cell_z: i32, column: ColumnSample) -> Cell {
        if y <= self.config.bedrock_top {
            return Cell::Solid(MaterialId::Bedrock);
        }
        if y > column.height {
            // Left for the flood fill when at or below sea level.
            return Cell::Open;
        }
        if self.terrain.is_cave(cell_x, y, cell_z, column.height) {
            return Cell::Carved;
        }
        Cell::Solid(self.terrain.material_at(cell_x, y, cell_z, column))
    }
}

enum Cell {
    Solid(MaterialId),
    Carved,
    Open,
}
