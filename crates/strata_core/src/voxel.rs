//! # Voxels and Voxel Grids
//!
//! A [`VoxelGrid`] holds one chunk: `size × size` columns of `height` cells.
//! Cells are addressed with local `x`/`z` in `0..size` and a world
//! elevation `y` in `floor..floor + height`. The floor offset lets negative
//! elevations map onto non-negative storage indices.
//!
//! Accessors never panic on bad coordinates. Reads outside the grid return
//! `None`, writes outside the grid are dropped and report `false`.

use crate::material::{MaterialId, Rgb};

/// What placed a voxel. Informational only; meshing looks at material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VoxelKind {
    /// Terrain population (including bedrock and ores).
    Terrain,
    /// Flood-filled water.
    Water,
    /// Tree trunk.
    Tree,
    /// Tree canopy.
    Leaves,
    /// Desert cactus.
    Cactus,
    /// Placed through an edit after generation.
    Placed,
}

/// One occupied cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    /// Registry material.
    pub material: MaterialId,
    /// Render color. Defaults to the material color.
    pub color: Rgb,
    /// Origin tag.
    pub kind: VoxelKind,
}

impl Voxel {
    /// Creates a voxel colored with its material's base color.
    #[inline]
    #[must_use]
    pub fn new(material: MaterialId, kind: VoxelKind) -> Self {
        Self {
            material,
            color: material.color(),
            kind,
        }
    }

    /// Terrain voxel of the given material.
    #[inline]
    #[must_use]
    pub fn terrain(material: MaterialId) -> Self {
        Self::new(material, VoxelKind::Terrain)
    }

    /// Flood-fill water.
    #[inline]
    #[must_use]
    pub fn water() -> Self {
        Self::new(MaterialId::Water, VoxelKind::Water)
    }

    /// Overrides the render color.
    #[inline]
    #[must_use]
    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Shorthand for the material's transparency flag.
    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.material.is_transparent()
    }

    /// True if the voxel is water.
    #[inline]
    #[must_use]
    pub fn is_water(&self) -> bool {
        self.material == MaterialId::Water
    }
}

/// Dense storage for one chunk's cells.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    size: usize,
    height: usize,
    floor: i32,
    cells: Vec<Option<Voxel>>,
}

impl VoxelGrid {
    /// Creates an empty grid.
    ///
    /// # Arguments
    ///
    /// * `size` - Width and depth in cells
    /// * `height` - Cells per column
    /// * `floor` - Elevation of the lowest cell
    #[must_use]
    pub fn new(size: usize, height: usize, floor: i32) -> Self {
        Self {
            size,
            height,
            floor,
            cells: vec![None; size * size * height],
        }
    }

    /// Width and depth in cells.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Cells per column.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Elevation of the lowest cell.
    #[inline]
    #[must_use]
    pub const fn floor(&self) -> i32 {
        self.floor
    }

    /// One past the elevation of the highest cell.
    #[inline]
    #[must_use]
    pub fn top(&self) -> i32 {
        self.floor + self.height as i32
    }

    /// True if `y` lies within the grid's elevation range.
    #[inline]
    #[must_use]
    pub fn contains_elevation(&self, y: i32) -> bool {
        y >= self.floor && y < self.top()
    }

    /// True if the local cell lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let size = self.size as i32;
        x >= 0 && x < size && z >= 0 && z < size && self.contains_elevation(y)
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        let (x, z) = (x as usize, z as usize);
        let y = (y - self.floor) as usize;
        Some((x * self.size + z) * self.height + y)
    }

    /// Reads a cell. `None` for empty or out-of-grid cells.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<&Voxel> {
        self.index(x, y, z).and_then(|i| self.cells[i].as_ref())
    }

    /// True if the cell is inside the grid and holds no voxel.
    #[inline]
    #[must_use]
    pub fn is_empty_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.index(x, y, z).is_some_and(|i| self.cells[i].is_none())
    }

    /// Writes a voxel. Returns `false` (and does nothing) outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.cells[i] = Some(voxel);
                true
            }
            None => false,
        }
    }

    /// Writes a voxel only if the cell is currently empty.
    #[inline]
    pub fn set_if_empty(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) -> bool {
        match self.index(x, y, z) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(voxel);
                true
            }
            _ => false,
        }
    }

    /// Empties a cell, returning what was there.
    #[inline]
    pub fn clear(&mut self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        self.index(x, y, z).and_then(|i| self.cells[i].take())
    }

    /// Iterates occupied cells as `(x, y, z, voxel)`, x-major then z then y.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32, &Voxel)> + '_ {
        let size = self.size;
        let height = self.height;
        let floor = self.floor;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref().map(|voxel| {
                let y = (i % height) as i32 + floor;
                let column = i / height;
                let z = (column % size) as i32;
                let x = (column / size) as i32;
                (x, y, z, voxel)
            })
        })
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of occupied cells holding `material`.
    #[must_use]
    pub fn count_material(&self, material: MaterialId) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|v| v.material == material)
            .count()
    }
}
