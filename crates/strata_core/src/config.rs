//! # World Configuration
//!
//! Every tunable of the world lives in [`WorldConfig`]. Configs are loaded
//! once at startup (usually from TOML), validated, and then shared read-only
//! by the generator, the mesher and the chunk store.
//!
//! ```toml
//! seed = 1337
//! render_distance = 3
//! max_resident_chunks = 49
//! ```
//!
//! Missing keys take their production defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coords::{MAX_CHUNK_SIZE, MAX_RENDER_DISTANCE};
use crate::error::{WorldError, WorldResult};
use crate::material::DEFAULT_COLOR_TOLERANCE;

/// Configuration for world generation, meshing and chunk residency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// World seed. Same seed, same world.
    pub seed: u64,
    /// Chunk width and depth in cells.
    pub chunk_size: usize,
    /// Cells per column.
    pub world_height: usize,
    /// Elevation of the lowest cell.
    pub world_floor: i32,
    /// Highest elevation of the bedrock band.
    pub bedrock_top: i32,
    /// Water fills empty cells at or below this elevation.
    pub sea_level: i32,
    /// Horizontal world units per cell.
    pub block_size: f32,
    /// Vertical world units per cell.
    pub block_height: f32,
    /// Chebyshev radius of the load window, in chunks.
    pub render_distance: u32,
    /// Hard ceiling on resident chunks.
    pub max_resident_chunks: usize,
    /// Combined cave noise above this value carves a cell.
    pub cave_threshold: f64,
    /// No features within this distance of the world origin (noise units).
    pub spawn_clearance: f64,
    /// Grow trees and cacti.
    pub generate_features: bool,
    /// Mark resident edge neighbors dirty when a chunk loads.
    pub remesh_neighbors_on_load: bool,
    /// Per-channel tolerance when merging voxel colors.
    pub color_tolerance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl WorldConfig {
    /// Production defaults.
    #[must_use]
    pub fn production() -> Self {
        Self {
            seed: 0,
            chunk_size: 16,
            world_height: 128,
            world_floor: -60,
            bedrock_top: -55,
            sea_level: 0,
            block_size: 2.0,
            block_height: 0.5,
            render_distance: 2,
            max_resident_chunks: 25,
            cave_threshold: 0.35,
            spawn_clearance: 10.0,
            generate_features: true,
            remesh_neighbors_on_load: true,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
        }
    }

    /// Small world for tests: 3x3 window, cap of 9.
    #[must_use]
    pub fn test() -> Self {
        Self {
            render_distance: 1,
            max_resident_chunks: 9,
            ..Self::production()
        }
    }

    /// Returns a copy with a different seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] for malformed TOML or unknown
    /// keys, and [`WorldError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigIo`] if the file cannot be read, otherwise
    /// the errors of [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ConfigParse`] if serialization fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        toml::to_string(self).map_err(|e| WorldError::ConfigParse(e.to_string()))
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> WorldResult<()> {
        if self.chunk_size == 0 {
            return Err(WorldError::invalid("chunk_size", "must be at least 1"));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(WorldError::invalid(
                "chunk_size",
                format!("must be at most {MAX_CHUNK_SIZE}"),
            ));
        }
        if self.render_distance > MAX_RENDER_DISTANCE {
            return Err(WorldError::invalid(
                "render_distance",
                format!("must be at most {MAX_RENDER_DISTANCE}"),
            ));
        }
        if self.world_height == 0 {
            return Err(WorldError::invalid("world_height", "must be at least 1"));
        }
        if i32::try_from(self.world_height).is_err() {
            return Err(WorldError::invalid("world_height", "too large"));
        }
        if self.block_size <= 0.0 || !self.block_size.is_finite() {
            return Err(WorldError::invalid("block_size", "must be a positive number"));
        }
        if self.block_height <= 0.0 || !self.block_height.is_finite() {
            return Err(WorldError::invalid("block_height", "must be a positive number"));
        }
        if self.max_resident_chunks == 0 {
            return Err(WorldError::invalid("max_resident_chunks", "must be at least 1"));
        }
        let top = self.world_top();
        if self.bedrock_top < self.world_floor || self.bedrock_top >= top {
            return Err(WorldError::invalid(
                "bedrock_top",
                format!("must lie in {}..{top}", self.world_floor),
            ));
        }
        if self.sea_level < self.world_floor || self.sea_level >= top {
            return Err(WorldError::invalid(
                "sea_level",
                format!("must lie in {}..{top}", self.world_floor),
            ));
        }
        if !(0.0..=1.0).contains(&self.cave_threshold) {
            return Err(WorldError::invalid("cave_threshold", "must lie in [0, 1]"));
        }
        if self.color_tolerance < 0.0 {
            return Err(WorldError::invalid("color_tolerance", "must not be negative"));
        }

        let window = self.window_chunk_count();
        if window > self.max_resident_chunks {
            tracing::warn!(
                window,
                cap = self.max_resident_chunks,
                "load window is larger than the resident chunk cap; in-range chunks will be evicted"
            );
        }
        Ok(())
    }

    /// One past the highest cell elevation.
    #[inline]
    #[must_use]
    pub fn world_top(&self) -> i32 {
        self.world_floor + self.world_height as i32
    }

    /// Width of a chunk in world units.
    #[inline]
    #[must_use]
    pub fn chunk_span(&self) -> f32 {
        self.chunk_size as f32 * self.block_size
    }

    /// Number of chunks in a full load window.
    #[inline]
    #[must_use]
    pub fn window_chunk_count(&self) -> usize {
        let side = 2 * self.render_distance as usize + 1;
        side * side
    }
}
