//! # Chunk Lifecycle Tests
//!
//! Walks a player around and checks the store's invariants after every
//! tick: the resident cap holds, the window is loaded, and every mesh
//! reflects the current set of resident neighbors.

use strata::{ChunkKey, ChunkState, ChunkStore, WorldConfig};
use strata_rendering::GreedyMesher;

fn small_world() -> WorldConfig {
    WorldConfig {
        chunk_size: 8,
        ..WorldConfig::test()
    }
}

/// Zig-zag path through world space, one position per tick.
fn walk(config: &WorldConfig, ticks: u32) -> Vec<[f32; 3]> {
    let span = config.chunk_span();
    (0..ticks)
        .map(|t| {
            let t = t as f32;
            let x = t * span * 0.4;
            let z = (t * 0.7).sin() * span * 3.0;
            [x, 0.0, z]
        })
        .collect()
}

/// Test: resident count never exceeds the cap, even when the cap is smaller
/// than the load window, and the player's own chunk stays resident.
#[test]
fn test_cap_holds_during_walk() {
    let config = WorldConfig {
        max_resident_chunks: 6,
        ..small_world()
    };
    let mut store = ChunkStore::new(config.clone()).unwrap();

    for position in walk(&config, 40) {
        store.update(position);
        let stats = store.stats();
        assert!(
            stats.resident <= config.max_resident_chunks,
            "resident {} over cap at {position:?}",
            stats.resident
        );
        assert_eq!(stats.dirty, 0, "dirty chunks left after update");
        let center = store.center().unwrap();
        assert!(
            matches!(store.chunk_state(center), ChunkState::Resident { .. }),
            "player chunk {center} evicted by the cap"
        );
    }

    let stats = store.stats();
    println!(
        "Walk with cap {}: generated {}, evicted {}, cap evictions {}, rebuilds {}",
        config.max_resident_chunks,
        stats.generated,
        stats.evicted,
        stats.cap_evictions,
        stats.rebuilds
    );
    assert!(stats.cap_evictions > 0);
}

/// Test: with a cap that fits the window, the full window is always resident
/// and nothing else is.
#[test]
fn test_window_is_exactly_resident() {
    let config = small_world();
    let mut store = ChunkStore::new(config.clone()).unwrap();

    for position in walk(&config, 25) {
        store.update(position);
        let center = store.center().unwrap();
        let mut window = center.window(config.render_distance);
        window.sort_unstable();
        assert_eq!(store.resident_keys(), window, "window mismatch around {center}");
    }
    assert_eq!(store.stats().cap_evictions, 0);
}

/// Test: a chunk with all four neighbors resident has the same mesh as a
/// fresh one against those neighbors, so loading a neighbor never leaves a
/// stale border behind.
#[test]
fn test_surrounded_meshes_match_current_neighbors() {
    let config = small_world();
    let mut store = ChunkStore::new(config.clone()).unwrap();
    let mut mesher = GreedyMesher::new(&config);

    let mut checked = 0;
    for position in walk(&config, 12) {
        store.update(position);
        for key in store.resident_keys() {
            let surrounded = key
                .edge_neighbors()
                .iter()
                .all(|n| store.chunk_state(*n) != ChunkState::Unloaded);
            if !surrounded {
                continue;
            }
            let grid = store.grid(key).unwrap();
            let fresh = mesher.mesh(grid, key, &store);
            assert_eq!(
                store.chunk_cubes(key).unwrap(),
                fresh.cubes.as_slice(),
                "stale mesh for {key}"
            );
            checked += 1;
        }
    }
    println!("Checked {checked} surrounded chunks");
    assert!(checked >= 12);
}

/// Test: the render list is exactly the concatenation of resident meshes.
#[test]
fn test_render_list_matches_resident_meshes() {
    let config = small_world();
    let mut store = ChunkStore::new(config.clone()).unwrap();
    store.update([0.0, 0.0, 0.0]);
    store.update([config.chunk_span() * 1.5, 0.0, 0.0]);

    let total: usize = store
        .resident_keys()
        .into_iter()
        .map(|key| store.chunk_cubes(key).map_or(0, <[_]>::len))
        .sum();
    assert_eq!(store.cubes().len(), total);
    assert!(store
        .cubes()
        .iter()
        .all(|cube| matches!(store.chunk_state(cube.chunk), ChunkState::Resident { .. })));
    assert_eq!(store.chunk_state(ChunkKey::new(-1, 0)), ChunkState::Unloaded);
}

/// Test: two stores walking the same path end in the same state.
#[test]
fn test_lifecycle_is_deterministic() {
    let config = WorldConfig {
        max_resident_chunks: 7,
        ..small_world()
    };
    let mut a = ChunkStore::new(config.clone()).unwrap();
    let mut b = ChunkStore::new(config.clone()).unwrap();

    for position in walk(&config, 15) {
        a.update(position);
        b.update(position);
    }
    assert_eq!(a.resident_keys(), b.resident_keys());
    assert_eq!(a.cubes(), b.cubes());
    assert_eq!(a.stats(), b.stats());
}
