//! Render primitives.
//!
//! A [`Cube`] is one axis-aligned box handed to the rendering collaborator:
//! either a merged opaque volume or a single transparent cell with a face
//! visibility mask. [`CubeInstance`] is its flat, GPU-uploadable form.

use bytemuck::{Pod, Zeroable};
use strata_core::{ChunkKey, MaterialId, Rgb};

/// One face of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +Y
    Top = 0,
    /// -Y
    Bottom = 1,
    /// +X
    Right = 2,
    /// -X
    Left = 3,
    /// +Z
    Front = 4,
    /// -Z
    Back = 5,
}

impl Face {
    /// All faces, in lookup order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Right,
        Self::Left,
        Self::Front,
        Self::Back,
    ];

    /// Unit offset `(dx, dy, dz)` towards the neighbor across this face.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Top => (0, 1, 0),
            Self::Bottom => (0, -1, 0),
            Self::Right => (1, 0, 0),
            Self::Left => (-1, 0, 0),
            Self::Front => (0, 0, 1),
            Self::Back => (0, 0, -1),
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of visible faces, one bit per [`Face`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceMask(u8);

impl FaceMask {
    /// No faces.
    pub const NONE: Self = Self(0);
    /// All six faces.
    pub const ALL: Self = Self(0b0011_1111);

    /// Adds a face.
    #[inline]
    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    /// True if `face` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    /// True if no face is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of faces set.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Iterates the faces in the set.
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<Face> for FaceMask {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut mask = Self::NONE;
        for face in iter {
            mask.insert(face);
        }
        mask
    }
}

/// Axis-aligned render box.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    /// Center in world units.
    pub position: [f32; 3],
    /// Full size along each axis in world units.
    pub extents: [f32; 3],
    /// Render color.
    pub color: Rgb,
    /// Material of every covered cell.
    pub material: MaterialId,
    /// Material alpha.
    pub alpha: f32,
    /// Owning chunk.
    pub chunk: ChunkKey,
    /// True when the box covers more than one cell.
    pub merged: bool,
    /// Visible faces for transparent unit cubes; `None` means all faces.
    pub faces: Option<FaceMask>,
    /// Local cells this cube covers.
    pub cells: CellSpan,
}

/// The local cell box a cube covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpan {
    /// Lowest local corner `(x, y, z)`; y is an elevation.
    pub origin: [i32; 3],
    /// Cell counts `(width, height, depth)` along x, y, z.
    pub size: [i32; 3],
}

impl CellSpan {
    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> usize {
        (self.size[0] * self.size[1] * self.size[2]) as usize
    }

    /// Iterates the covered local cells.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32)> {
        let [ox, oy, oz] = self.origin;
        let [w, h, d] = self.size;
        (0..w).flat_map(move |dx| {
            (0..h).flat_map(move |dy| (0..d).map(move |dz| (ox + dx, oy + dy, oz + dz)))
        })
    }
}

impl Cube {
    /// True if the cube belongs to the transparent pass.
    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.material.is_transparent()
    }

    /// Number of faces the renderer should draw.
    #[inline]
    #[must_use]
    pub fn visible_face_count(&self) -> u32 {
        self.faces.map_or(6, FaceMask::count)
    }

    /// Flattens the cube for GPU instancing.
    #[must_use]
    pub fn to_instance(&self) -> CubeInstance {
        CubeInstance {
            position: self.position,
            alpha: self.alpha,
            extents: self.extents,
            material_id: u32::from(self.material.index()),
            color: self.color,
            face_mask: u32::from(self.faces.unwrap_or(FaceMask::ALL).bits()),
        }
    }
}

/// GPU instance layout for one cube. 48 bytes, 16-byte aligned rows.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    /// Center in world units.
    pub position: [f32; 3],
    /// Material alpha.
    pub alpha: f32,
    /// Full size along each axis.
    pub extents: [f32; 3],
    /// Registry index of the material.
    pub material_id: u32,
    /// Render color.
    pub color: [f32; 3],
    /// Visible faces, one bit per [`Face`].
    pub face_mask: u32,
}

impl CubeInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Packs cubes into an instance buffer ready for upload.
#[must_use]
pub fn instance_bytes(cubes: &[Cube]) -> Vec<u8> {
    let instances: Vec<CubeInstance> = cubes.iter().map(Cube::to_instance).collect();
    bytemuck::cast_slice(&instances).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_mask_bits() {
        let mask: FaceMask = [Face::Top, Face::Left].into_iter().collect();
        assert!(mask.contains(Face::Top));
        assert!(mask.contains(Face::Left));
        assert!(!mask.contains(Face::Bottom));
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![Face::Top, Face::Left]);
        assert_eq!(FaceMask::ALL.count(), 6);
    }

    #[test]
    fn test_face_offsets_are_opposite_pairs() {
        for pair in Face::ALL.chunks(2) {
            let (a, b) = (pair[0].offset(), pair[1].offset());
            assert_eq!((a.0 + b.0, a.1 + b.1, a.2 + b.2), (0, 0, 0));
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(CubeInstance::SIZE, 48);

        let cube = Cube {
            position: [1.0, 2.0, 3.0],
            extents: [2.0, 0.5, 2.0],
            color: [0.2, 0.4, 0.8],
            material: MaterialId::Water,
            alpha: 0.7,
            chunk: ChunkKey::new(0, 0),
            merged: false,
            faces: Some([Face::Top].into_iter().collect()),
            cells: CellSpan {
                origin: [0, 0, 0],
                size: [1, 1, 1],
            },
        };
        let instance = cube.to_instance();
        assert_eq!(instance.material_id, 7);
        assert_eq!(instance.face_mask, 1);
        assert_eq!(instance_bytes(&[cube.clone(), cube]).len(), 96);
    }

    #[test]
    fn test_cell_span_iter() {
        let span = CellSpan {
            origin: [1, -2, 3],
            size: [2, 3, 1],
        };
        let cells: Vec<_> = span.iter().collect();
        assert_eq!(cells.len(), span.volume());
        assert!(cells.contains(&(2, 0, 3)));
        assert!(!cells.contains(&(3, 0, 3)));
    }
}
