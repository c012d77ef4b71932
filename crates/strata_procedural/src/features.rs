//! Surface features: trees and cacti.
//!
//! Placement is seeded per chunk, so a chunk always grows the same features.
//! Features are clipped to their own chunk and never overwrite existing
//! voxels, so generation stays free of side effects on neighbors.

use strata_core::{ChunkKey, MaterialId, Voxel, VoxelGrid, VoxelKind, WorldConfig};

use crate::noise::seeded_hash;
use crate::terrain::TerrainGenerator;

const COUNT_SEED: u32 = 500;
const COLUMN_X_SEED: u32 = 600;
const COLUMN_Z_SEED: u32 = 700;
const CHANCE_SEED: u32 = 800;
const TREE_HEIGHT_SEED: u32 = 900;
const CACTUS_HEIGHT_SEED: u32 = 950;

/// Trees grow where the chance roll exceeds this.
const TREE_CHANCE: f64 = 0.7;
/// Cacti grow where the chance roll exceeds this.
const CACTUS_CHANCE: f64 = 0.8;

/// Counts of what one chunk grew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureStats {
    /// Candidate columns rolled.
    pub attempts: usize,
    /// Trees grown.
    pub trees: usize,
    /// Cacti grown.
    pub cacti: usize,
}

/// Seeded feature placement.
#[derive(Clone, Copy, Debug)]
pub struct FeaturePlacer {
    chunk_size: i32,
    sea_level: i32,
    spawn_clearance: f64,
}

impl FeaturePlacer {
    /// Creates a placer from a world configuration.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            chunk_size: config.chunk_size as i32,
            sea_level: config.sea_level,
            spawn_clearance: config.spawn_clearance,
        }
    }

    /// Grows this chunk's features into `grid`.
    pub fn place(&self, key: ChunkKey, grid: &mut VoxelGrid, terrain: &TerrainGenerator) -> FeatureStats {
        let seed = terrain.seed();
        let size = f64::from(self.chunk_size);
        let (cx, cz) = (f64::from(key.x), f64::from(key.z));
        let count = 2 + (seeded_hash(cx, cz, seed.offset(COUNT_SEED)) * 3.0) as usize;

        let mut stats = FeatureStats {
            attempts: count,
            ..FeatureStats::default()
        };
        for i in 0..count {
            let step = i as f64;
            let lx = ((seeded_hash(cx + step, cz, seed.offset(COLUMN_X_SEED)) * size) as i32)
                .clamp(0, self.chunk_size - 1);
            let lz = ((seeded_hash(cx, cz + step, seed.offset(COLUMN_Z_SEED)) * size) as i32)
                .clamp(0, self.chunk_size - 1);
            let cell_x = key.origin_x(self.chunk_size) + lx;
            let cell_z = key.origin_z(self.chunk_size) + lz;
            let wx = terrain.sample_coord(cell_x);
            let wz = terrain.sample_coord(cell_z);

            if wx.hypot(wz) < self.spawn_clearance {
                continue;
            }
            let column = terrain.column(cell_x, cell_z);
            if column.height <= self.sea_level {
                continue;
            }

            let roll = seeded_hash(wx, wz, seed.offset(CHANCE_SEED));
            let base = column.height + 1;
            if column.biome.grows_trees() && roll > TREE_CHANCE {
                let trunk = 4 + (seeded_hash(wx, wz, seed.offset(TREE_HEIGHT_SEED)) * 2.0) as i32;
                grow_tree(grid, lx, base, lz, trunk);
                stats.trees += 1;
            } else if column.biome.grows_cacti() && roll > CACTUS_CHANCE {
                let height = 2 + (seeded_hash(wx, wz, seed.offset(CACTUS_HEIGHT_SEED)) * 2.0) as i32;
                grow_cactus(grid, lx, base, lz, height);
                stats.cacti += 1;
            }
        }
        stats
    }
}

/// Trunk of `trunk` wood cells with a 5x5x3 canopy (corners cut) starting
/// at the trunk's top cell.
fn grow_tree(grid: &mut VoxelGrid, x: i32, base: i32, z: i32, trunk: i32) {
    for dy in 0..trunk {
        grid.set_if_empty(x, base + dy, z, Voxel::new(MaterialId::Wood, VoxelKind::Tree));
    }
    let canopy = base + trunk - 1;
    for dx in -2..=2_i32 {
        for dz in -2..=2_i32 {
            if dx.abs() == 2 && dz.abs() == 2 {
                continue;
            }
            for dy in 0..=2 {
                grid.set_if_empty(
                    x + dx,
                    canopy + dy,
                    z + dz,
                    Voxel::new(MaterialId::Leaves, VoxelKind::Leaves),
                );
            }
        }
    }
}

fn grow_cactus(grid: &mut VoxelGrid, x: i32, base: i32, z: i32, height: i32) {
    for dy in 0..height {
        grid.set_if_empty(x, base + dy, z, Voxel::new(MaterialId::Cactus, VoxelKind::Cactus));
    }
}
