//! # Seeded Value Noise
//!
//! All terrain randomness comes from one sine-based hash:
//!
//! ```text
//! hash(x, z, seed) = fract(sin(x * 12.9898 + z * 78.233 + seed) * 43758.5453)
//! ```
//!
//! Value noise hashes the integer lattice corners around a sample point and
//! interpolates between them. Everything is computed in `f64`.
//!
//! ## Determinism Guarantee
//!
//! The functions here are pure. Given the same seed and coordinates they
//! return bit-identical results on every call.

/// World seed for deterministic generation.
///
/// Sub-generators use `seed + k` offsets (see [`WorldSeed::offset`]) so each
/// noise layer draws from an independent stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The seed shifted by `offset`, as the hash's additive term.
    #[inline]
    #[must_use]
    pub fn offset(self, offset: u32) -> f64 {
        self.0 as f64 + f64::from(offset)
    }
}

/// Sine-based hash into `[0, 1)`.
///
/// # Arguments
///
/// * `x`, `z` - Sample coordinates
/// * `seed` - Additive seed term
#[inline]
#[must_use]
pub fn seeded_hash(x: f64, z: f64, seed: f64) -> f64 {
    let n = (x * 12.9898 + z * 78.233 + seed).sin() * 43758.5453;
    n - n.floor()
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Bilinear 2D value noise in `[0, 1)`.
///
/// # Arguments
///
/// * `x`, `z` - Sample position
/// * `frequency` - Lattice cells per unit
/// * `seed` - Additive seed term
#[must_use]
pub fn value_noise_2d(x: f64, z: f64, frequency: f64, seed: f64) -> f64 {
    let x = x * frequency;
    let z = z * frequency;
    let x0 = x.floor();
    let z0 = z.floor();
    let fx = x - x0;
    let fz = z - z0;

    let v00 = seeded_hash(x0, z0, seed);
    let v10 = seeded_hash(x0 + 1.0, z0, seed);
    let v01 = seeded_hash(x0, z0 + 1.0, seed);
    let v11 = seeded_hash(x0 + 1.0, z0 + 1.0, seed);

    lerp(lerp(v00, v10, fx), lerp(v01, v11, fx), fz)
}

#[inline]
fn lattice_3d(x: f64, y: f64, z: f64, seed: f64) -> f64 {
    seeded_hash(x + y * 1000.0 + z * 100_000.0, 0.0, seed)
}

/// Trilinear 3D value noise in `[0, 1)`.
///
/// Lattice corners are folded into one hash coordinate as
/// `x + y * 1000 + z * 100000`.
#[must_use]
pub fn value_noise_3d(x: f64, y: f64, z: f64, frequency: f64, seed: f64) -> f64 {
    let x = x * frequency;
    let y = y * frequency;
    let z = z * frequency;
    let x0 = x.floor();
    let y0 = y.floor();
    let z0 = z.floor();
    let (x1, y1, z1) = (x0 + 1.0, y0 + 1.0, z0 + 1.0);
    let fx = x - x0;
    let fy = y - y0;
    let fz = z - z0;

    let i00 = lerp(lattice_3d(x0, y0, z0, seed), lattice_3d(x1, y0, z0, seed), fx);
    let i10 = lerp(lattice_3d(x0, y1, z0, seed), lattice_3d(x1, y1, z0, seed), fx);
    let i01 = lerp(lattice_3d(x0, y0, z1, seed), lattice_3d(x1, y0, z1, seed), fx);
    let i11 = lerp(lattice_3d(x0, y1, z1, seed), lattice_3d(x1, y1, z1, seed), fx);

    lerp(lerp(i00, i10, fy), lerp(i01, i11, fy), fz)
}
