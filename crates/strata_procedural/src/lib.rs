//! # STRATA Procedural Generation
//!
//! Deterministic world generation for the voxel engine.
//!
//! ## Architecture
//!
//! - **Noise**: sine-hash value noise, pure and bit-reproducible
//! - **Biomes**: elevation/temperature thresholds pick one of six biomes
//! - **Terrain**: height, caves, ores and depth-resolved materials
//! - **Water**: BFS flood fill of everything empty below sea level
//! - **Chunks**: the populate, features, flood-fill pipeline
//!
//! ## Usage
//!
//! ```rust
//! use strata_core::{ChunkKey, WorldConfig};
//! use strata_procedural::ChunkGenerator;
//!
//! let generator = ChunkGenerator::new(&WorldConfig::production());
//! let chunk = generator.generate(ChunkKey::new(0, 0));
//! assert!(chunk.grid.occupied_count() > 0);
//!
//! let height = generator.terrain().height_at(5, 5);
//! assert!(height >= 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod chunk;
pub mod features;
pub mod noise;
pub mod terrain;
pub mod water;

pub use biome::{Biome, BiomeClassifier, Climate};
pub use chunk::{ChunkGenerator, GeneratedChunk, GenerationStats};
pub use features::{FeaturePlacer, FeatureStats};
pub use noise::{seeded_hash, value_noise_2d, value_noise_3d, WorldSeed};
pub use terrain::{ColumnSample, OreRule, TerrainGenerator, ORE_RULES};
pub use water::{FloodFillStats, WaterFloodFill};
