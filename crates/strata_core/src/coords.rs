//! Chunk keys.
//!
//! A chunk is a `chunk_size × chunk_size` tile of columns. Its key is the
//! integer pair obtained by floor-dividing a cell column by the chunk size.
//!
//! Keys derived from world positions are clamped to
//! [`MAX_CHUNK_COORD`] so cell arithmetic on them cannot overflow.

use std::fmt;

/// Largest chunk coordinate a world position resolves to, on either axis.
pub const MAX_CHUNK_COORD: i32 = 1 << 16;

/// Largest accepted load radius, in chunks.
pub const MAX_RENDER_DISTANCE: u32 = 64;

/// Largest accepted chunk width, in cells.
pub const MAX_CHUNK_SIZE: usize = 1024;

/// Identifies one chunk in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// X coordinate (in chunks, not cells).
    pub x: i32,
    /// Z coordinate (in chunks, not cells).
    pub z: i32,
}

impl ChunkKey {
    /// Creates a new chunk key.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Key of the chunk containing the given cell column.
    #[inline]
    #[must_use]
    pub const fn from_cell(cell_x: i32, cell_z: i32, chunk_size: i32) -> Self {
        Self {
            x: cell_x.div_euclid(chunk_size),
            z: cell_z.div_euclid(chunk_size),
        }
    }

    /// Key of the chunk containing a world-space position.
    ///
    /// `chunk_span` is the width of a chunk in world units
    /// (`chunk_size × block_size`). Positions beyond [`MAX_CHUNK_COORD`]
    /// chunks clamp to the edge; NaN maps to chunk 0.
    #[inline]
    #[must_use]
    pub fn from_world_position(world_x: f32, world_z: f32, chunk_span: f32) -> Self {
        let axis = |w: f32| {
            ((w / chunk_span).floor() as i32).clamp(-MAX_CHUNK_COORD, MAX_CHUNK_COORD)
        };
        Self {
            x: axis(world_x),
            z: axis(world_z),
        }
    }

    /// First cell column X of this chunk.
    #[inline]
    #[must_use]
    pub const fn origin_x(self, chunk_size: i32) -> i32 {
        self.x * chunk_size
    }

    /// First cell column Z of this chunk.
    #[inline]
    #[must_use]
    pub const fn origin_z(self, chunk_size: i32) -> i32 {
        self.z * chunk_size
    }

    /// Chebyshev (chessboard) distance in chunks.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        if dx > dz {
            dx
        } else {
            dz
        }
    }

    /// Returns the key offset by `(dx, dz)` chunks, saturating at the
    /// `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            z: self.z.saturating_add(dz),
        }
    }

    /// The four edge-sharing neighbors: -X, +X, -Z, +Z.
    #[must_use]
    pub const fn edge_neighbors(self) -> [Self; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// Every key within `radius` (Chebyshev), nearest rings first.
    ///
    /// `radius` is capped at [`MAX_RENDER_DISTANCE`].
    #[must_use]
    pub fn window(self, radius: u32) -> Vec<Self> {
        let r = radius.min(MAX_RENDER_DISTANCE) as i32;
        let side = 2 * r as usize + 1;
        let mut keys = Vec::with_capacity(side * side);
        for dz in -r..=r {
            for dx in -r..=r {
                keys.push(self.offset(dx, dz));
            }
        }
        keys.sort_by_key(|k| (self.chebyshev_distance(*k), k.z, k.x));
        keys.dedup();
        keys
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_division_for_negative_cells() {
        assert_eq!(ChunkKey::from_cell(0, 0, 16), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::from_cell(15, 15, 16), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::from_cell(16, -1, 16), ChunkKey::new(1, -1));
        assert_eq!(ChunkKey::from_cell(-16, -17, 16), ChunkKey::new(-1, -2));
    }

    #[test]
    fn test_world_position_uses_chunk_span() {
        // 16 cells of 2 units each
        assert_eq!(ChunkKey::from_world_position(31.9, 0.0, 32.0), ChunkKey::new(0, 0));
        assert_eq!(ChunkKey::from_world_position(32.0, -0.1, 32.0), ChunkKey::new(1, -1));
    }

    #[test]
    fn test_window_is_sorted_by_ring() {
        let center = ChunkKey::new(3, -2);
        let window = center.window(2);
        assert_eq!(window.len(), 25);
        assert_eq!(window[0], center);
        assert!(window
            .windows(2)
            .all(|w| center.chebyshev_distance(w[0]) <= center.chebyshev_distance(w[1])));
        assert!(window.iter().all(|k| center.chebyshev_distance(*k) <= 2));
    }

    #[test]
    fn test_far_positions_clamp() {
        let far = ChunkKey::from_world_position(1.0e10, -1.0e10, 32.0);
        assert_eq!(far, ChunkKey::new(MAX_CHUNK_COORD, -MAX_CHUNK_COORD));
        assert_eq!(
            ChunkKey::from_world_position(f32::NAN, f32::INFINITY, 32.0),
            ChunkKey::new(0, MAX_CHUNK_COORD)
        );

        let radius = MAX_RENDER_DISTANCE as i32;
        let edge = (MAX_CHUNK_COORD + radius).checked_mul(MAX_CHUNK_SIZE as i32);
        assert!(edge.is_some());
        for key in far.window(1) {
            assert!(key.origin_x(16).abs() <= (MAX_CHUNK_COORD + 1) * 16);
        }
    }

    #[test]
    fn test_window_radius_is_capped() {
        let side = 2 * MAX_RENDER_DISTANCE as usize + 1;
        assert_eq!(ChunkKey::new(0, 0).window(40_000).len(), side * side);
    }

    #[test]
    fn test_offset_saturates() {
        let key = ChunkKey::new(i32::MAX, i32::MIN);
        assert_eq!(key.offset(1, -1), key);
        assert_eq!(key.window(1).len(), 4);
    }
}
