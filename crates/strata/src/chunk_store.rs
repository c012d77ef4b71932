//! Chunk lifecycle around a moving player.
//!
//! The store owns every resident chunk, the dirty set and the global render
//! list. All mutation goes through its methods:
//!
//! - **Load**: a chunk entering the window is generated, flooded and meshed
//!   in one call, then its resident edge neighbors are marked dirty so their
//!   border faces get recomputed against it.
//! - **Evict**: a chunk leaving the window is dropped, then the oldest
//!   chunks go until the resident cap holds.
//! - **Rebuild**: dirty chunks are fully re-meshed once per update.
//!
//! Ages come from a logical clock, so the whole lifecycle is deterministic.

use std::collections::{BTreeSet, HashMap};

use strata_core::{ChunkKey, Voxel, VoxelGrid, WorldConfig, WorldResult};
use strata_procedural::{Biome, ChunkGenerator};
use strata_rendering::{Cube, GreedyMesher, NeighborGrids};

/// One resident chunk.
#[derive(Clone, Debug)]
struct Chunk {
    grid: VoxelGrid,
    cubes: Vec<Cube>,
    dirty: bool,
    last_rendered: u64,
}

/// Lifecycle state of a chunk key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Not in memory.
    Unloaded,
    /// Generated and meshed; `dirty` means the mesh is stale.
    Resident {
        /// Waiting for a rebuild.
        dirty: bool,
    },
}

/// Store counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Resident chunks.
    pub resident: usize,
    /// Resident chunks waiting for a rebuild.
    pub dirty: usize,
    /// Cubes in the render list.
    pub cubes: usize,
    /// Chunks generated this session.
    pub generated: u64,
    /// Chunks evicted this session, cap evictions included.
    pub evicted: u64,
    /// Chunks evicted by the resident cap while still in range.
    pub cap_evictions: u64,
    /// Dirty rebuilds this session.
    pub rebuilds: u64,
}

/// Owner of the resident chunks.
#[derive(Debug)]
pub struct ChunkStore {
    config: WorldConfig,
    generator: ChunkGenerator,
    mesher: GreedyMesher,
    chunks: HashMap<ChunkKey, Chunk>,
    dirty: BTreeSet<ChunkKey>,
    render_list: Vec<Cube>,
    render_list_stale: bool,
    center: Option<ChunkKey>,
    clock: u64,
    stats: StoreStats,
}

impl ChunkStore {
    /// Creates an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        tracing::info!(
            seed = config.seed,
            chunk_size = config.chunk_size,
            render_distance = config.render_distance,
            cap = config.max_resident_chunks,
            "chunk store ready"
        );
        Ok(Self {
            generator: ChunkGenerator::new(&config),
            mesher: GreedyMesher::new(&config),
            chunks: HashMap::with_capacity(config.max_resident_chunks + 1),
            dirty: BTreeSet::new(),
            render_list: Vec::new(),
            render_list_stale: false,
            center: None,
            clock: 0,
            stats: StoreStats::default(),
            config,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The generator backing loads and terrain queries.
    #[must_use]
    pub const fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// The chunk the player was last seen in.
    #[must_use]
    pub const fn center(&self) -> Option<ChunkKey> {
        self.center
    }

    /// Per-tick entry point.
    ///
    /// Moves the window when the player changed chunk, then rebuilds every
    /// dirty chunk.
    pub fn update(&mut self, position: [f32; 3]) {
        let center =
            ChunkKey::from_world_position(position[0], position[2], self.config.chunk_span());
        if self.center != Some(center) {
            tracing::info!(chunk = %center, "player entered chunk");
            self.ensure_loaded_around(center);
        }
        self.rebuild_dirty_chunks();
    }

    /// Makes `center` the window center: evicts out-of-range chunks, loads
    /// missing ones farthest ring first, then evicts oldest until the cap
    /// holds. The center chunk is loaded last, so it is the newest and the
    /// last one the cap would take.
    pub fn ensure_loaded_around(&mut self, center: ChunkKey) {
        self.center = Some(center);
        let radius = self.config.render_distance;

        let mut out_of_range: Vec<ChunkKey> = self
            .chunks
            .keys()
            .copied()
            .filter(|key| key.chebyshev_distance(center) > radius)
            .collect();
        out_of_range.sort_unstable();
        for key in out_of_range {
            self.evict(key);
        }

        for key in center.window(radius).into_iter().rev() {
            if !self.chunks.contains_key(&key) {
                self.load(key);
            }
        }

        self.enforce_cap();
        self.refresh_render_list();
    }

    /// Flags a resident chunk for rebuild on the next update.
    ///
    /// Returns false if the chunk is not resident.
    pub fn mark_dirty(&mut self, cx: i32, cz: i32) -> bool {
        let key = ChunkKey::new(cx, cz);
        match self.chunks.get_mut(&key) {
            Some(chunk) => {
                chunk.dirty = true;
                self.dirty.insert(key);
                true
            }
            None => false,
        }
    }

    /// Re-meshes every dirty chunk from its current grid.
    ///
    /// Returns the number of chunks rebuilt.
    pub fn rebuild_dirty_chunks(&mut self) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        let mut rebuilt = 0;
        for key in dirty {
            let Some(chunk) = self.chunks.get(&key) else {
                continue;
            };
            let output = self.mesher.mesh(&chunk.grid, key, &Resident(&self.chunks));
            let tick = self.tick();
            if let Some(chunk) = self.chunks.get_mut(&key) {
                chunk.cubes = output.cubes;
                chunk.dirty = false;
                chunk.last_rendered = tick;
                rebuilt += 1;
            }
        }

        if rebuilt > 0 {
            self.stats.rebuilds += rebuilt as u64;
            self.render_list_stale = true;
            tracing::debug!(rebuilt, "dirty chunks rebuilt");
        }
        self.refresh_render_list();
        rebuilt
    }

    /// Places `voxel` at cell `(bx, by, bz)` of a resident chunk.
    ///
    /// Marks the owning chunk dirty, and the adjacent chunk too when the
    /// cell sits on a border. Returns false when the cell is not resident.
    pub fn set_voxel(&mut self, bx: i32, by: i32, bz: i32, voxel: Voxel) -> bool {
        let (key, lx, lz) = self.locate(bx, bz);
        let placed = self
            .chunks
            .get_mut(&key)
            .is_some_and(|chunk| chunk.grid.set(lx, by, lz, voxel));
        if placed {
            self.mark_edited(key, lx, lz);
        }
        placed
    }

    /// Empties cell `(bx, by, bz)` of a resident chunk, returning what was
    /// there.
    pub fn remove_voxel(&mut self, bx: i32, by: i32, bz: i32) -> Option<Voxel> {
        let (key, lx, lz) = self.locate(bx, bz);
        let removed = self.chunks.get_mut(&key)?.grid.clear(lx, by, lz)?;
        self.mark_edited(key, lx, lz);
        Some(removed)
    }

    /// The global render list, ordered by chunk key.
    #[must_use]
    pub fn cubes(&self) -> &[Cube] {
        &self.render_list
    }

    /// Cubes of one resident chunk.
    #[must_use]
    pub fn chunk_cubes(&self, key: ChunkKey) -> Option<&[Cube]> {
        self.chunks.get(&key).map(|chunk| chunk.cubes.as_slice())
    }

    /// Grid of one resident chunk.
    #[must_use]
    pub fn grid(&self, key: ChunkKey) -> Option<&VoxelGrid> {
        self.chunks.get(&key).map(|chunk| &chunk.grid)
    }

    /// Surface elevation, in cells, of the column under a world position.
    ///
    /// Answered from the generator, so the column need not be resident.
    #[must_use]
    pub fn terrain_height_at(&self, x: f32, z: f32) -> i32 {
        self.generator
            .terrain()
            .height_at(self.cell_of(x), self.cell_of(z))
    }

    /// World-space height of the top face of the surface cell.
    #[must_use]
    pub fn surface_elevation_at(&self, x: f32, z: f32) -> f32 {
        (self.terrain_height_at(x, z) as f32 + 0.5) * self.config.block_height
    }

    /// Biome of the column under a world position.
    #[must_use]
    pub fn biome_at(&self, x: f32, z: f32) -> Biome {
        self.generator
            .terrain()
            .biome_at(self.cell_of(x), self.cell_of(z))
    }

    /// Voxel at a cell, if its chunk is resident.
    #[must_use]
    pub fn voxel_at(&self, bx: i32, by: i32, bz: i32) -> Option<&Voxel> {
        let (key, lx, lz) = self.locate(bx, bz);
        self.chunks.get(&key)?.grid.get(lx, by, lz)
    }

    /// Voxel containing a world position, if its chunk is resident.
    #[must_use]
    pub fn voxel_at_position(&self, position: [f32; 3]) -> Option<&Voxel> {
        let by = (position[1] / self.config.block_height + 0.5).floor() as i32;
        self.voxel_at(self.cell_of(position[0]), by, self.cell_of(position[2]))
    }

    /// Lifecycle state of `key`.
    #[must_use]
    pub fn chunk_state(&self, key: ChunkKey) -> ChunkState {
        self.chunks
            .get(&key)
            .map_or(ChunkState::Unloaded, |chunk| ChunkState::Resident {
                dirty: chunk.dirty,
            })
    }

    /// Resident keys in ascending order.
    #[must_use]
    pub fn resident_keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            resident: self.chunks.len(),
            dirty: self.dirty.len(),
            cubes: self.render_list.len(),
            ..self.stats
        }
    }

    /// Drops every chunk and forgets the player position.
    pub fn clear(&mut self) {
        tracing::info!(resident = self.chunks.len(), "chunk store cleared");
        self.chunks.clear();
        self.dirty.clear();
        self.render_list.clear();
        self.render_list_stale = false;
        self.center = None;
    }

    fn load(&mut self, key: ChunkKey) {
        let generated = self.generator.generate(key);
        let output = self
            .mesher
            .mesh(&generated.grid, key, &Resident(&self.chunks));
        let tick = self.tick();
        self.chunks.insert(
            key,
            Chunk {
                grid: generated.grid,
                cubes: output.cubes,
                dirty: false,
                last_rendered: tick,
            },
        );
        self.stats.generated += 1;
        self.render_list_stale = true;

        if self.config.remesh_neighbors_on_load {
            for neighbor in key.edge_neighbors() {
                self.mark_dirty(neighbor.x, neighbor.z);
            }
        }
        tracing::debug!(chunk = %key, cubes = output.stats.cube_count(), "chunk loaded");
    }

    fn evict(&mut self, key: ChunkKey) -> bool {
        if self.chunks.remove(&key).is_none() {
            return false;
        }
        self.dirty.remove(&key);
        self.stats.evicted += 1;
        self.render_list_stale = true;
        tracing::debug!(chunk = %key, "chunk evicted");
        true
    }

    fn enforce_cap(&mut self) {
        while self.chunks.len() > self.config.max_resident_chunks {
            let Some(oldest) = self
                .chunks
                .iter()
                .min_by_key(|(key, chunk)| (chunk.last_rendered, **key))
                .map(|(key, _)| *key)
            else {
                break;
            };
            self.evict(oldest);
            self.stats.cap_evictions += 1;
            tracing::warn!(
                chunk = %oldest,
                cap = self.config.max_resident_chunks,
                "resident cap reached, evicted oldest chunk"
            );
        }
    }

    fn mark_edited(&mut self, key: ChunkKey, lx: i32, lz: i32) {
        let last = self.config.chunk_size as i32 - 1;
        self.mark_dirty(key.x, key.z);
        if lx == 0 {
            self.mark_dirty(key.x - 1, key.z);
        }
        if lx == last {
            self.mark_dirty(key.x + 1, key.z);
        }
        if lz == 0 {
            self.mark_dirty(key.x, key.z - 1);
        }
        if lz == last {
            self.mark_dirty(key.x, key.z + 1);
        }
    }

    fn refresh_render_list(&mut self) {
        if !self.render_list_stale {
            return;
        }
        let mut keys: Vec<&ChunkKey> = self.chunks.keys().collect();
        keys.sort_unstable();
        self.render_list = keys
            .into_iter()
            .flat_map(|key| self.chunks[key].cubes.iter().cloned())
            .collect();
        self.render_list_stale = false;
    }

    fn locate(&self, bx: i32, bz: i32) -> (ChunkKey, i32, i32) {
        let size = self.config.chunk_size as i32;
        (
            ChunkKey::from_cell(bx, bz, size),
            bx.rem_euclid(size),
            bz.rem_euclid(size),
        )
    }

    fn cell_of(&self, world: f32) -> i32 {
        (world / self.config.block_size + 0.5).floor() as i32
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl NeighborGrids for ChunkStore {
    fn neighbor_grid(&self, key: ChunkKey) -> Option<&VoxelGrid> {
        self.grid(key)
    }
}

/// Resident grids, borrowed apart from the mesher.
struct Resident<'a>(&'a HashMap<ChunkKey, Chunk>);

impl NeighborGrids for Resident<'_> {
    fn neighbor_grid(&self, key: ChunkKey) -> Option<&VoxelGrid> {
        self.0.get(&key).map(|chunk| &chunk.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{MaterialId, MAX_CHUNK_COORD};

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_size: 8,
            ..WorldConfig::test()
        }
    }

    /// A position inside chunk `(cx, cz)`.
    fn inside(config: &WorldConfig, cx: i32, cz: i32) -> [f32; 3] {
        let span = config.chunk_span();
        [cx as f32 * span + 1.0, 10.0, cz as f32 * span + 1.0]
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = WorldConfig {
            chunk_size: 0,
            ..config()
        };
        assert!(ChunkStore::new(bad).is_err());
    }

    #[test]
    fn test_update_loads_clean_window() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));

        let stats = store.stats();
        assert_eq!(stats.resident, 9);
        assert_eq!(stats.generated, 9);
        assert_eq!(stats.dirty, 0);
        assert!(stats.cubes > 0);
        assert_eq!(store.center(), Some(ChunkKey::new(0, 0)));
        for key in ChunkKey::new(0, 0).window(1) {
            assert_eq!(store.chunk_state(key), ChunkState::Resident { dirty: false });
        }
        assert!(store
            .cubes()
            .iter()
            .all(|cube| store.chunk_state(cube.chunk) != ChunkState::Unloaded));
    }

    #[test]
    fn test_moving_shifts_window() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));
        store.update(inside(&config, 1, 0));

        let stats = store.stats();
        assert_eq!(stats.resident, 9);
        assert_eq!(stats.generated, 12);
        assert_eq!(stats.evicted, 3);
        assert_eq!(store.chunk_state(ChunkKey::new(-1, 0)), ChunkState::Unloaded);
        assert!(matches!(
            store.chunk_state(ChunkKey::new(2, 1)),
            ChunkState::Resident { .. }
        ));
    }

    #[test]
    fn test_same_chunk_update_is_cheap() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));
        let before = store.stats();
        store.update([3.0, 0.0, 3.0]);
        assert_eq!(store.stats(), before);
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let config = WorldConfig {
            max_resident_chunks: 5,
            remesh_neighbors_on_load: false,
            ..config()
        };
        let mut store = ChunkStore::new(config).unwrap();
        let center = ChunkKey::new(0, 0);
        store.ensure_loaded_around(center);

        let stats = store.stats();
        assert_eq!(stats.resident, 5);
        assert_eq!(stats.cap_evictions, 4);

        // Loaded farthest first, so the outer four loaded are the oldest.
        let mut expected: Vec<ChunkKey> = center.window(1)[..5].to_vec();
        expected.sort_unstable();
        assert_eq!(store.resident_keys(), expected);
        assert!(matches!(store.chunk_state(center), ChunkState::Resident { .. }));
    }

    #[test]
    fn test_player_chunk_survives_small_cap() {
        let config = WorldConfig {
            max_resident_chunks: 1,
            ..config()
        };
        let mut store = ChunkStore::new(config.clone()).unwrap();
        for cx in 0..4 {
            store.update(inside(&config, cx, 0));
            assert_eq!(store.resident_keys(), vec![ChunkKey::new(cx, 0)]);
        }
    }

    #[test]
    fn test_far_position_clamps_instead_of_overflowing() {
        let config = config();
        let mut store = ChunkStore::new(config).unwrap();
        store.update([1.0e10, 0.0, 0.0]);
        assert_eq!(store.center(), Some(ChunkKey::new(MAX_CHUNK_COORD, 0)));
        assert_eq!(store.stats().resident, 9);
        assert!(store.cubes().iter().all(|cube| cube.position.iter().all(|c| c.is_finite())));

        store.update([-1.0e10, 0.0, f32::NAN]);
        assert_eq!(store.center(), Some(ChunkKey::new(-MAX_CHUNK_COORD, 0)));
        assert_eq!(store.stats().resident, 9);
    }

    #[test]
    fn test_mark_dirty_and_rebuild() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));

        assert!(!store.mark_dirty(40, 40));
        assert!(store.mark_dirty(1, 0));
        assert_eq!(
            store.chunk_state(ChunkKey::new(1, 0)),
            ChunkState::Resident { dirty: true }
        );

        let rebuilds = store.stats().rebuilds;
        assert_eq!(store.rebuild_dirty_chunks(), 1);
        assert_eq!(store.stats().rebuilds, rebuilds + 1);
        assert_eq!(
            store.chunk_state(ChunkKey::new(1, 0)),
            ChunkState::Resident { dirty: false }
        );
        assert_eq!(store.rebuild_dirty_chunks(), 0);
    }

    #[test]
    fn test_edit_on_border_dirties_neighbor() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));

        let y = config.world_top() - 1;
        let placed = Voxel::new(MaterialId::Wood, strata_core::VoxelKind::Placed);
        assert!(store.set_voxel(7, y, 3, placed));
        assert_eq!(store.voxel_at(7, y, 3).map(|v| v.material), Some(MaterialId::Wood));
        assert_eq!(
            store.chunk_state(ChunkKey::new(0, 0)),
            ChunkState::Resident { dirty: true }
        );
        assert_eq!(
            store.chunk_state(ChunkKey::new(1, 0)),
            ChunkState::Resident { dirty: true }
        );
        assert_eq!(
            store.chunk_state(ChunkKey::new(0, 1)),
            ChunkState::Resident { dirty: false }
        );

        store.rebuild_dirty_chunks();
        let wood = store
            .cubes()
            .iter()
            .filter(|c| c.material == MaterialId::Wood && c.chunk == ChunkKey::new(0, 0))
            .any(|c| c.cells.origin == [7, y, 3]);
        assert!(wood, "placed voxel missing from render list");

        assert_eq!(store.remove_voxel(7, y, 3).map(|v| v.material), Some(MaterialId::Wood));
        assert!(store.voxel_at(7, y, 3).is_none());
    }

    #[test]
    fn test_edits_outside_resident_chunks_are_ignored() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));

        assert!(!store.set_voxel(500, 0, 500, Voxel::terrain(MaterialId::Stone)));
        assert!(!store.set_voxel(0, config.world_top(), 0, Voxel::terrain(MaterialId::Stone)));
        assert!(store.remove_voxel(500, 0, 500).is_none());
        assert_eq!(store.stats().dirty, 0);
    }

    #[test]
    fn test_terrain_queries_need_no_resident_chunk() {
        let store = ChunkStore::new(config()).unwrap();
        let expected = store.generator().terrain().height_at(250, -120);
        assert_eq!(store.terrain_height_at(500.0, -240.0), expected);
        assert_eq!(
            store.biome_at(500.0, -240.0),
            store.generator().terrain().biome_at(250, -120)
        );
        let top = (expected as f32 + 0.5) * store.config().block_height;
        assert!((store.surface_elevation_at(500.0, -240.0) - top).abs() < f32::EPSILON);
        assert!(store.voxel_at(250, 0, -120).is_none());
    }

    #[test]
    fn test_voxel_at_position_matches_cell() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));

        // Cell (3, bedrock_top, 4) is always bedrock.
        let position = [
            3.0 * config.block_size,
            config.bedrock_top as f32 * config.block_height,
            4.0 * config.block_size,
        ];
        assert_eq!(
            store.voxel_at_position(position).map(|v| v.material),
            Some(MaterialId::Bedrock)
        );
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let config = config();
        let mut store = ChunkStore::new(config.clone()).unwrap();
        store.update(inside(&config, 0, 0));
        store.clear();

        assert_eq!(store.stats().resident, 0);
        assert!(store.cubes().is_empty());
        assert_eq!(store.center(), None);

        store.update(inside(&config, 0, 0));
        assert_eq!(store.stats().resident, 9);
    }
}
