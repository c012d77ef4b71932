//! Cross-chunk neighbor lookup.
//!
//! The mesher asks "what is next to this cell?" for cells that may lie in
//! an adjacent chunk. The answer is tri-state: a neighbor chunk that has
//! not been generated yet is [`NeighborVoxel::Unknown`], never "air", so a
//! border face is not drawn until the neighbor is actually known.

use std::collections::HashMap;

use strata_core::{ChunkKey, MaterialId, VoxelGrid};

/// What occupies a neighboring cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborVoxel {
    /// Known to be empty.
    Absent,
    /// Known to hold this material.
    Present(MaterialId),
    /// Not generated (or outside the world's elevation range).
    Unknown,
}

impl NeighborVoxel {
    /// Whether an opaque cell's face towards this neighbor is visible.
    ///
    /// Visible across empty or transparent neighbors. Unknown never exposes.
    #[inline]
    #[must_use]
    pub fn exposes_opaque(self) -> bool {
        match self {
            Self::Absent => true,
            Self::Present(material) => material.is_transparent(),
            Self::Unknown => false,
        }
    }

    /// Whether a transparent cell of `material` shows its face towards this
    /// neighbor.
    ///
    /// Visible across empty cells and any different material.
    #[inline]
    #[must_use]
    pub fn exposes_transparent(self, material: MaterialId) -> bool {
        match self {
            Self::Absent => true,
            Self::Present(other) => other != material,
            Self::Unknown => false,
        }
    }
}

/// Access to the grids of already-generated chunks.
pub trait NeighborGrids {
    /// The grid of `key`, if that chunk is generated.
    fn neighbor_grid(&self, key: ChunkKey) -> Option<&VoxelGrid>;
}

/// No neighbors at all: every border cell is unknown.
impl NeighborGrids for () {
    fn neighbor_grid(&self, _key: ChunkKey) -> Option<&VoxelGrid> {
        None
    }
}

impl NeighborGrids for HashMap<ChunkKey, VoxelGrid> {
    fn neighbor_grid(&self, key: ChunkKey) -> Option<&VoxelGrid> {
        self.get(&key)
    }
}

/// Resolves cells around one chunk, crossing into its neighbors.
pub struct VoxelLookup<'a, N: NeighborGrids + ?Sized> {
    grid: &'a VoxelGrid,
    key: ChunkKey,
    neighbors: &'a N,
}

impl<'a, N: NeighborGrids + ?Sized> VoxelLookup<'a, N> {
    /// Creates a lookup centered on `grid`, the grid of chunk `key`.
    #[must_use]
    pub fn new(grid: &'a VoxelGrid, key: ChunkKey, neighbors: &'a N) -> Self {
        Self {
            grid,
            key,
            neighbors,
        }
    }

    /// Resolves a local cell, which may lie one step outside the grid.
    #[must_use]
    pub fn at(&self, x: i32, y: i32, z: i32) -> NeighborVoxel {
        if !self.grid.contains_elevation(y) {
            return NeighborVoxel::Unknown;
        }
        if self.grid.contains(x, y, z) {
            return match self.grid.get(x, y, z) {
                Some(voxel) => NeighborVoxel::Present(voxel.material),
                None => NeighborVoxel::Absent,
            };
        }

        let size = self.grid.size() as i32;
        let key = ChunkKey::new(
            self.key.x + x.div_euclid(size),
            self.key.z + z.div_euclid(size),
        );
        match self.neighbors.neighbor_grid(key) {
            Some(grid) => match grid.get(x.rem_euclid(size), y, z.rem_euclid(size)) {
                Some(voxel) => NeighborVoxel::Present(voxel.material),
                None => NeighborVoxel::Absent,
            },
            None => NeighborVoxel::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Voxel;

    fn grid_with(x: i32, y: i32, z: i32, material: MaterialId) -> VoxelGrid {
        let mut grid = VoxelGrid::new(4, 8, -4);
        grid.set(x, y, z, Voxel::terrain(material));
        grid
    }

    #[test]
    fn test_inside_grid() {
        let grid = grid_with(1, 0, 1, MaterialId::Stone);
        let lookup = VoxelLookup::new(&grid, ChunkKey::new(0, 0), &());
        assert_eq!(lookup.at(1, 0, 1), NeighborVoxel::Present(MaterialId::Stone));
        assert_eq!(lookup.at(2, 0, 1), NeighborVoxel::Absent);
    }

    #[test]
    fn test_missing_neighbor_is_unknown() {
        let grid = VoxelGrid::new(4, 8, -4);
        let lookup = VoxelLookup::new(&grid, ChunkKey::new(0, 0), &());
        assert_eq!(lookup.at(-1, 0, 0), NeighborVoxel::Unknown);
        assert_eq!(lookup.at(4, 0, 0), NeighborVoxel::Unknown);
        assert_eq!(lookup.at(0, 4, 0), NeighborVoxel::Unknown);
        assert_eq!(lookup.at(0, -5, 0), NeighborVoxel::Unknown);
    }

    #[test]
    fn test_crosses_into_loaded_neighbor() {
        let center = VoxelGrid::new(4, 8, -4);
        let mut neighbors = HashMap::new();
        neighbors.insert(ChunkKey::new(4, 2), grid_with(3, 1, 2, MaterialId::Sand));
        neighbors.insert(ChunkKey::new(5, 3), grid_with(0, 1, 0, MaterialId::Dirt));

        let lookup = VoxelLookup::new(&center, ChunkKey::new(5, 2), &neighbors);
        assert_eq!(lookup.at(-1, 1, 2), NeighborVoxel::Present(MaterialId::Sand));
        assert_eq!(lookup.at(-1, 2, 2), NeighborVoxel::Absent);
        assert_eq!(lookup.at(0, 1, 4), NeighborVoxel::Present(MaterialId::Dirt));
        assert_eq!(lookup.at(4, 1, 0), NeighborVoxel::Unknown);
    }

    #[test]
    fn test_exposure_rules() {
        assert!(NeighborVoxel::Absent.exposes_opaque());
        assert!(NeighborVoxel::Present(MaterialId::Water).exposes_opaque());
        assert!(!NeighborVoxel::Present(MaterialId::Stone).exposes_opaque());
        assert!(!NeighborVoxel::Unknown.exposes_opaque());

        let water = MaterialId::Water;
        assert!(NeighborVoxel::Absent.exposes_transparent(water));
        assert!(NeighborVoxel::Present(MaterialId::Stone).exposes_transparent(water));
        assert!(!NeighborVoxel::Present(water).exposes_transparent(water));
        assert!(!NeighborVoxel::Unknown.exposes_transparent(water));
    }
}
