//! Thread-safe handle to a [`ChunkStore`].
//!
//! One writer runs the whole pipeline (generate, flood, mesh) under the
//! write lock, so readers never observe a half-built chunk. Renderers take
//! the read lock to walk the cube list.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use strata_core::{ChunkKey, Voxel, WorldConfig, WorldResult};
use strata_rendering::Cube;

use crate::chunk_store::{ChunkStore, StoreStats};

/// Shared, cloneable chunk store.
#[derive(Clone, Debug)]
pub struct SharedChunkStore {
    inner: Arc<RwLock<ChunkStore>>,
}

impl SharedChunkStore {
    /// Creates a shared store.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        Ok(Self::from_store(ChunkStore::new(config)?))
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: ChunkStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs one update tick under the write lock.
    pub fn update(&self, position: [f32; 3]) {
        self.inner.write().update(position);
    }

    /// Flags a resident chunk for rebuild.
    pub fn mark_dirty(&self, key: ChunkKey) -> bool {
        self.inner.write().mark_dirty(key.x, key.z)
    }

    /// Places a voxel in a resident chunk.
    pub fn set_voxel(&self, bx: i32, by: i32, bz: i32, voxel: Voxel) -> bool {
        self.inner.write().set_voxel(bx, by, bz, voxel)
    }

    /// Runs `f` over the render list under the read lock.
    pub fn with_cubes<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[Cube]) -> R,
    {
        f(self.inner.read().cubes())
    }

    /// Copies the render list out.
    #[must_use]
    pub fn cubes_snapshot(&self) -> Vec<Cube> {
        self.with_cubes(<[Cube]>::to_vec)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.inner.read().stats()
    }

    /// Read access to the store.
    pub fn read(&self) -> RwLockReadGuard<'_, ChunkStore> {
        self.inner.read()
    }

    /// Write access to the store.
    pub fn write(&self) -> RwLockWriteGuard<'_, ChunkStore> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_size: 8,
            ..WorldConfig::test()
        }
    }

    #[test]
    fn test_clones_share_state() {
        let store = SharedChunkStore::new(config()).unwrap();
        let reader = store.clone();
        store.update([1.0, 0.0, 1.0]);

        assert_eq!(reader.stats().resident, 9);
        assert_eq!(reader.cubes_snapshot().len(), store.stats().cubes);
        assert!(reader.mark_dirty(ChunkKey::new(0, 0)));
        assert_eq!(store.read().stats().dirty, 1);
    }

    #[test]
    fn test_readers_on_other_threads() {
        let store = SharedChunkStore::new(config()).unwrap();
        store.update([1.0, 0.0, 1.0]);
        let expected = store.stats().cubes;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reader = store.clone();
                std::thread::spawn(move || reader.with_cubes(<[Cube]>::len))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
