//! # STRATA Rendering
//!
//! Turns voxel grids into render cubes.
//!
//! ## Architecture
//!
//! - **Greedy mesher**: merges runs of identical opaque cells into boxes
//! - **Neighbor lookup**: resolves border cells against adjacent chunks
//! - **Cubes**: render boxes plus their flat GPU instance form
//!
//! ## Usage
//!
//! ```rust
//! use strata_core::{ChunkKey, MaterialId, Voxel, VoxelGrid, WorldConfig};
//! use strata_rendering::GreedyMesher;
//!
//! let config = WorldConfig::production();
//! let mut grid = VoxelGrid::new(config.chunk_size, 8, 0);
//! grid.set(3, 0, 3, Voxel::terrain(MaterialId::Stone));
//!
//! let mut mesher = GreedyMesher::new(&config);
//! let output = mesher.mesh(&grid, ChunkKey::new(0, 0), &());
//! assert_eq!(output.cubes.len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cube;
pub mod greedy_mesh;
pub mod neighbor;

pub use cube::{instance_bytes, CellSpan, Cube, CubeInstance, Face, FaceMask};
pub use greedy_mesh::{GreedyMesher, MeshOutput, MeshStats};
pub use neighbor::{NeighborGrids, NeighborVoxel, VoxelLookup};
