//! # World Walk
//!
//! Headless demo: walks a player in a straight line across the world,
//! edits a voxel on the way, and logs what the chunk store does each tick.
//!
//! ```bash
//! # Defaults
//! cargo run --bin world_walk
//!
//! # Custom world, verbose
//! RUST_LOG=debug cargo run --bin world_walk -- world.toml
//! ```

use std::process::ExitCode;

use strata::{ChunkStore, MaterialId, Voxel, WorldConfig, WorldResult};
use strata_core::VoxelKind;
use tracing_subscriber::EnvFilter;

/// Chunks crossed by the walk.
const WALK_CHUNKS: u32 = 6;
/// Update ticks per chunk crossed.
const TICKS_PER_CHUNK: u32 = 4;
/// Tick at which the demo places a block in front of the player.
const EDIT_TICK: u32 = 5;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();
}

fn load_config() -> WorldResult<WorldConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading world config");
            WorldConfig::from_toml_file(path)
        }
        None => Ok(WorldConfig::production()),
    }
}

fn run() -> WorldResult<()> {
    let config = load_config()?;
    let span = config.chunk_span();
    let mut store = ChunkStore::new(config)?;

    let ticks = WALK_CHUNKS * TICKS_PER_CHUNK;
    let step = span / TICKS_PER_CHUNK as f32;
    for tick in 0..ticks {
        let x = tick as f32 * step;
        let y = store.surface_elevation_at(x, 0.0);
        store.update([x, y, 0.0]);

        if tick == EDIT_TICK {
            let block = store.config().block_size;
            let bx = (x / block).round() as i32 + 2;
            let by = store.terrain_height_at(x, 0.0) + 1;
            let placed = store.set_voxel(bx, by, 0, Voxel::new(MaterialId::Stone, VoxelKind::Placed));
            tracing::info!(bx, by, placed, "placed a block");
        }

        let stats = store.stats();
        tracing::info!(
            tick,
            x,
            biome = store.biome_at(x, 0.0).name(),
            resident = stats.resident,
            cubes = stats.cubes,
            generated = stats.generated,
            evicted = stats.evicted,
            rebuilds = stats.rebuilds,
            "tick"
        );
    }

    let stats = store.stats();
    tracing::info!(
        generated = stats.generated,
        evicted = stats.evicted,
        cap_evictions = stats.cap_evictions,
        rebuilds = stats.rebuilds,
        "walk complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "world walk failed");
            ExitCode::FAILURE
        }
    }
}
