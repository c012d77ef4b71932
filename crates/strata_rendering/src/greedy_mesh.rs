//! Greedy box meshing for voxel chunks.
//!
//! Merges runs of identical opaque cells into as few axis-aligned boxes as
//! possible, and emits transparent cells one by one with a per-face
//! visibility mask.
//!
//! ## Algorithm
//!
//! 1. Sweep cells bottom-up: y, then x, then z.
//! 2. Skip consumed cells. A cell with no visible face is consumed and
//!    dropped.
//! 3. A transparent cell becomes a unit cube carrying its visible faces.
//! 4. An opaque cell grows a box: along x while the next cell matches,
//!    then along z over the whole row, then along y over the whole
//!    rectangle. Every covered cell is consumed.
//! 5. The box is emitted only if some cell on its outer shell borders an
//!    empty or transparent neighbor.
//!
//! "Matches" means same material, color within tolerance, not yet
//! consumed. A neighbor in a chunk that is not generated counts as
//! unknown and never exposes a face.

use std::time::Instant;

use strata_core::{colors_match, ChunkKey, Voxel, VoxelGrid, WorldConfig};

use crate::cube::{CellSpan, Cube, Face, FaceMask};
use crate::neighbor::{NeighborGrids, VoxelLookup};

/// Meshing above this many microseconds is logged as slow.
const SLOW_MESH_MICROS: u128 = 10_000;

/// Counters for one meshed chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Opaque boxes emitted.
    pub opaque_cubes: usize,
    /// Opaque boxes covering more than one cell.
    pub merged_cubes: usize,
    /// Transparent unit cubes emitted.
    pub transparent_cubes: usize,
    /// Cells or boxes dropped because nothing about them is visible.
    pub culled_volumes: usize,
    /// Cells inside dropped volumes.
    pub culled_cells: usize,
}

impl MeshStats {
    /// Total cubes emitted.
    #[must_use]
    pub const fn cube_count(&self) -> usize {
        self.opaque_cubes + self.transparent_cubes
    }
}

/// Result of meshing one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshOutput {
    /// Render cubes, opaque and transparent interleaved in sweep order.
    pub cubes: Vec<Cube>,
    /// What the sweep did.
    pub stats: MeshStats,
}

/// Greedy mesher.
///
/// Keeps its consumed-cell buffer between calls; reuse one mesher per
/// thread.
#[derive(Clone, Debug)]
pub struct GreedyMesher {
    block_size: f32,
    block_height: f32,
    color_tolerance: f32,
    consumed: Vec<bool>,
}

impl GreedyMesher {
    /// Creates a mesher using the world's cell scale and color tolerance.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            block_size: config.block_size,
            block_height: config.block_height,
            color_tolerance: config.color_tolerance,
            consumed: Vec::new(),
        }
    }

    /// Meshes `grid`, the grid of chunk `key`.
    ///
    /// Border faces are resolved against `neighbors`; pass `&()` to treat
    /// every neighbor as not yet generated.
    pub fn mesh<N: NeighborGrids + ?Sized>(
        &mut self,
        grid: &VoxelGrid,
        key: ChunkKey,
        neighbors: &N,
    ) -> MeshOutput {
        let start = Instant::now();
        let lookup = VoxelLookup::new(grid, key, neighbors);
        let mut output = MeshOutput::default();

        let volume = grid.size() * grid.size() * grid.height();
        self.consumed.clear();
        self.consumed.resize(volume, false);

        let size = grid.size() as i32;
        for y in grid.floor()..grid.top() {
            for x in 0..size {
                for z in 0..size {
                    if self.is_consumed(grid, x, y, z) {
                        continue;
                    }
                    let Some(voxel) = grid.get(x, y, z) else {
                        continue;
                    };

                    let faces = visible_faces(&lookup, voxel, x, y, z);
                    if faces.is_empty() {
                        self.consume(grid, x, y, z);
                        output.stats.culled_volumes += 1;
                        output.stats.culled_cells += 1;
                        continue;
                    }

                    if voxel.is_transparent() {
                        self.consume(grid, x, y, z);
                        let span = CellSpan {
                            origin: [x, y, z],
                            size: [1, 1, 1],
                        };
                        output.cubes.push(self.cube(key, size, voxel, span, Some(faces)));
                        output.stats.transparent_cubes += 1;
                        continue;
                    }

                    let span = self.grow_box(grid, voxel, x, y, z);
                    for (cx, cy, cz) in span.iter() {
                        self.consume(grid, cx, cy, cz);
                    }
                    if !shell_exposed(&lookup, span) {
                        output.stats.culled_volumes += 1;
                        output.stats.culled_cells += span.volume();
                        continue;
                    }

                    let cube = self.cube(key, size, voxel, span, None);
                    if cube.merged {
                        output.stats.merged_cubes += 1;
                    }
                    output.cubes.push(cube);
                    output.stats.opaque_cubes += 1;
                }
            }
        }

        let elapsed = start.elapsed().as_micros();
        tracing::debug!(
            chunk = %key,
            opaque = output.stats.opaque_cubes,
            merged = output.stats.merged_cubes,
            transparent = output.stats.transparent_cubes,
            culled_cells = output.stats.culled_cells,
            elapsed_us = elapsed,
            "chunk meshed"
        );
        if elapsed > SLOW_MESH_MICROS {
            tracing::warn!(chunk = %key, elapsed_us = elapsed, "slow mesh generation");
        }
        output
    }

    /// Extends x, then z, then y from the seed cell at `(x, y, z)`.
    fn grow_box(&self, grid: &VoxelGrid, seed: &Voxel, x: i32, y: i32, z: i32) -> CellSpan {
        let size = grid.size() as i32;

        let mut width = 1;
        while x + width < size && self.can_merge(grid, seed, x + width, y, z) {
            width += 1;
        }

        let mut depth = 1;
        while z + depth < size
            && (0..width).all(|dx| self.can_merge(grid, seed, x + dx, y, z + depth))
        {
            depth += 1;
        }

        let mut height = 1;
        while y + height < grid.top()
            && (0..width).all(|dx| {
                (0..depth).all(|dz| self.can_merge(grid, seed, x + dx, y + height, z + dz))
            })
        {
            height += 1;
        }

        CellSpan {
            origin: [x, y, z],
            size: [width, height, depth],
        }
    }

    fn can_merge(&self, grid: &VoxelGrid, seed: &Voxel, x: i32, y: i32, z: i32) -> bool {
        if self.is_consumed(grid, x, y, z) {
            return false;
        }
        grid.get(x, y, z).is_some_and(|other| {
            other.material == seed.material
                && colors_match(other.color, seed.color, self.color_tolerance)
        })
    }

    fn cube(
        &self,
        key: ChunkKey,
        chunk_size: i32,
        voxel: &Voxel,
        span: CellSpan,
        faces: Option<FaceMask>,
    ) -> Cube {
        let [x, y, z] = span.origin;
        let [w, h, d] = span.size;
        let center = |origin: i32, extent: i32| origin as f32 + (extent - 1) as f32 / 2.0;

        Cube {
            position: [
                center(key.origin_x(chunk_size) + x, w) * self.block_size,
                center(y, h) * self.block_height,
                center(key.origin_z(chunk_size) + z, d) * self.block_size,
            ],
            extents: [
                w as f32 * self.block_size,
                h as f32 * self.block_height,
                d as f32 * self.block_size,
            ],
            color: voxel.color,
            material: voxel.material,
            alpha: voxel.material.material().alpha,
            chunk: key,
            merged: span.volume() > 1,
            faces,
            cells: span,
        }
    }

    #[inline]
    fn slot(grid: &VoxelGrid, x: i32, y: i32, z: i32) -> usize {
        let size = grid.size() as i32;
        ((x * size + z) as usize) * grid.height() + (y - grid.floor()) as usize
    }

    #[inline]
    fn is_consumed(&self, grid: &VoxelGrid, x: i32, y: i32, z: i32) -> bool {
        self.consumed[Self::slot(grid, x, y, z)]
    }

    #[inline]
    fn consume(&mut self, grid: &VoxelGrid, x: i32, y: i32, z: i32) {
        let slot = Self::slot(grid, x, y, z);
        self.consumed[slot] = true;
    }
}

fn visible_faces<N: NeighborGrids + ?Sized>(
    lookup: &VoxelLookup<'_, N>,
    voxel: &Voxel,
    x: i32,
    y: i32,
    z: i32,
) -> FaceMask {
    Face::ALL
        .into_iter()
        .filter(|face| {
            let (dx, dy, dz) = face.offset();
            let neighbor = lookup.at(x + dx, y + dy, z + dz);
            if voxel.is_transparent() {
                neighbor.exposes_transparent(voxel.material)
            } else {
                neighbor.exposes_opaque()
            }
        })
        .collect()
}

/// True if any cell just outside the box is empty or transparent.
fn shell_exposed<N: NeighborGrids + ?Sized>(lookup: &VoxelLookup<'_, N>, span: CellSpan) -> bool {
    let [x0, y0, z0] = span.origin;
    let [w, h, d] = span.size;
    let (x1, y1, z1) = (x0 + w - 1, y0 + h - 1, z0 + d - 1);

    let exposed = |x: i32, y: i32, z: i32| lookup.at(x, y, z).exposes_opaque();

    for x in x0..=x1 {
        for z in z0..=z1 {
            if exposed(x, y1 + 1, z) || exposed(x, y0 - 1, z) {
                return true;
            }
        }
    }
    for y in y0..=y1 {
        for z in z0..=z1 {
            if exposed(x1 + 1, y, z) || exposed(x0 - 1, y, z) {
                return true;
            }
        }
        for x in x0..=x1 {
            if exposed(x, y, z1 + 1) || exposed(x, y, z0 - 1) {
                return true;
            }
        }
    }
    false
}
