//! # Water Flood Fill
//!
//! Fills every empty cell at or below sea level with water, sealed cave
//! pockets included.
//!
//! ## Algorithm
//!
//! 1. Seed the frontier with every empty cell in `[floor, sea_level]` of
//!    every column, plus every water cell lying exactly at sea level.
//! 2. Pop a cell; if it is still empty, it becomes water.
//! 3. Push the cell below first, then the four horizontal neighbors, then
//!    the cell above only if it is already water.
//! 4. Neighbors are pushed only if they are empty or water and unvisited.
//!    Solid cells stop the flow.
//!
//! Because every empty cell in range is seeded, the final fill set is every
//! empty cell in range, whatever order the queue is drained in.

use std::collections::VecDeque;

use strata_core::{Voxel, VoxelGrid};

/// Outcome of one flood fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloodFillStats {
    /// Cells placed on the initial frontier.
    pub seeds: usize,
    /// Cells converted to water.
    pub placed: usize,
    /// Lowest elevation that received water.
    pub lowest_placed: Option<i32>,
}

/// Breadth-first water placement below sea level.
#[derive(Clone, Copy, Debug)]
pub struct WaterFloodFill {
    sea_level: i32,
}

impl WaterFloodFill {
    /// Creates a filler for the given sea level.
    #[must_use]
    pub const fn new(sea_level: i32) -> Self {
        Self { sea_level }
    }

    /// The sea level.
    #[must_use]
    pub const fn sea_level(&self) -> i32 {
        self.sea_level
    }

    /// Runs the fill on `grid` in place.
    pub fn fill(&self, grid: &mut VoxelGrid) -> FloodFillStats {
        let mut stats = FloodFillStats::default();
        let floor = grid.floor();
        let ceiling = self.sea_level.min(grid.top() - 1);
        if ceiling < floor {
            return stats;
        }

        let size = grid.size() as i32;
        let span = (ceiling - floor + 1) as usize;
        let slot = |x: i32, y: i32, z: i32| -> usize {
            ((x * size + z) as usize) * span + (y - floor) as usize
        };

        let mut visited = vec![false; grid.size() * grid.size() * span];
        let mut queue = VecDeque::new();

        for x in 0..size {
            for z in 0..size {
                for y in (floor..=ceiling).rev() {
                    if grid.is_empty_at(x, y, z) {
                        visited[slot(x, y, z)] = true;
                        queue.push_back((x, y, z));
                    }
                }
                if ceiling == self.sea_level
                    && grid.get(x, ceiling, z).is_some_and(Voxel::is_water)
                    && !visited[slot(x, ceiling, z)]
                {
                    visited[slot(x, ceiling, z)] = true;
                    queue.push_back((x, ceiling, z));
                }
            }
        }
        stats.seeds = queue.len();

        while let Some((x, y, z)) = queue.pop_front() {
            if grid.set_if_empty(x, y, z, Voxel::water()) {
                stats.placed += 1;
                stats.lowest_placed = Some(stats.lowest_placed.map_or(y, |low| low.min(y)));
            }

            let below = (x, y - 1, z);
            let sides = [(x - 1, y, z), (x + 1, y, z), (x, y, z - 1), (x, y, z + 1)];
            for (nx, ny, nz) in std::iter::once(below).chain(sides) {
                if nx < 0 || nx >= size || nz < 0 || nz >= size || ny < floor || ny > ceiling {
                    continue;
                }
                let s = slot(nx, ny, nz);
                if visited[s] {
                    continue;
                }
                let passable = grid.is_empty_at(nx, ny, nz)
                    || grid.get(nx, ny, nz).is_some_and(Voxel::is_water);
                if passable {
                    visited[s] = true;
                    queue.push_back((nx, ny, nz));
                }
            }

            // Upward only through water that is already there.
            let ny = y + 1;
            if ny <= ceiling
                && !visited[slot(x, ny, z)]
                && grid.get(x, ny, z).is_some_and(Voxel::is_water)
            {
                visited[slot(x, ny, z)] = true;
                queue.push_back((x, ny, z));
            }
        }

        tracing::trace!(
            seeds = stats.seeds,
            placed = stats.placed,
            lowest = ?stats.lowest_placed,
            sea_level = self.sea_level,
            "water flood fill complete"
        );
        stats
    }
}
