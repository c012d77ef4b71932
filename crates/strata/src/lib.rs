//! # STRATA
//!
//! Procedural voxel world: terrain generation, water, greedy meshing and
//! chunk lifecycle around a moving player.
//!
//! ## Crates
//!
//! - `strata_core`: materials, voxels, grids, chunk keys, configuration
//! - `strata_procedural`: noise, biomes, terrain, features, flood fill
//! - `strata_rendering`: greedy mesher and render cubes
//!
//! This crate adds the [`ChunkStore`], which ties them together.
//!
//! ## Usage
//!
//! ```rust
//! use strata::{ChunkStore, WorldConfig};
//!
//! let config = WorldConfig { chunk_size: 8, ..WorldConfig::test() };
//! let mut store = ChunkStore::new(config).unwrap();
//! store.update([0.0, 0.0, 0.0]);
//!
//! assert_eq!(store.stats().resident, 9);
//! assert!(!store.cubes().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk_store;
pub mod shared;

pub use chunk_store::{ChunkState, ChunkStore, StoreStats};
pub use shared::SharedChunkStore;
pub use strata_core::{ChunkKey, MaterialId, Voxel, WorldConfig, WorldError, WorldResult};
pub use strata_procedural::Biome;
pub use strata_rendering::{Cube, CubeInstance};
