//! # STRATA Core
//!
//! Shared vocabulary for the voxel world: the material registry, voxels and
//! the per-chunk [`VoxelGrid`], [`ChunkKey`]s, and the validated
//! [`WorldConfig`].
//!
//! Nothing in this crate generates or meshes terrain. Both the procedural
//! generator and the mesher depend on these types and on nothing else of
//! each other.
//!
//! ## Example
//!
//! ```rust
//! use strata_core::{ChunkKey, MaterialId, Voxel, VoxelGrid, WorldConfig};
//!
//! let config = WorldConfig::production();
//! let mut grid = VoxelGrid::new(config.chunk_size, config.world_height, config.world_floor);
//! grid.set(0, config.world_floor, 0, Voxel::terrain(MaterialId::Bedrock));
//!
//! let key = ChunkKey::from_world_position(40.0, -3.0, config.chunk_span());
//! assert_eq!(key, ChunkKey::new(1, -1));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod coords;
pub mod error;
pub mod material;
pub mod voxel;

pub use config::WorldConfig;
pub use coords::{ChunkKey, MAX_CHUNK_COORD, MAX_CHUNK_SIZE, MAX_RENDER_DISTANCE};
pub use error::{WorldError, WorldResult};
pub use material::{colors_match, Material, MaterialId, Rgb, DEFAULT_COLOR_TOLERANCE};
pub use voxel::{Voxel, VoxelGrid, VoxelKind};
