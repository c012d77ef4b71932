//! # Biome System
//!
//! Biomes are classified per column from two low-frequency climate signals:
//! - **Elevation**: picks the band (lowland, midland, highland)
//! - **Temperature**: picks the cold or warm variant within the band
//!
//! | elevation | cold | warm |
//! |-----------|------|------|
//! | `< 0.3` | tundra (`t < 0.4`) | plains |
//! | `< 0.6` | forest (`t < 0.5`) | desert |
//! | otherwise | mountains (`t < 0.6`) | snow |
//!
//! Every input maps to a biome; the last band is the fallback.

use strata_core::MaterialId;

use crate::noise::{value_noise_2d, WorldSeed};

/// Elevation noise frequency.
const ELEVATION_FREQUENCY: f64 = 0.01;
/// Temperature noise frequency.
const TEMPERATURE_FREQUENCY: f64 = 0.015;
/// Seed offset of the elevation stream.
const ELEVATION_SEED: u32 = 100;
/// Seed offset of the temperature stream.
const TEMPERATURE_SEED: u32 = 200;

/// Biome types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Biome {
    /// Gentle grassland.
    Plains = 0,
    /// Wooded rolling hills.
    Forest = 1,
    /// Sand dunes with cacti.
    Desert = 2,
    /// Bare stone peaks.
    Mountains = 3,
    /// Cold lowland.
    Tundra = 4,
    /// Snow-capped highland.
    Snow = 5,
}

impl Biome {
    /// Every biome.
    pub const ALL: [Self; 6] = [
        Self::Plains,
        Self::Forest,
        Self::Desert,
        Self::Mountains,
        Self::Tundra,
        Self::Snow,
    ];

    /// Scales the base height noise for this biome.
    #[inline]
    #[must_use]
    pub const fn height_multiplier(self) -> f64 {
        match self {
            Self::Plains => 0.6,
            Self::Forest => 1.0,
            Self::Desert => 0.8,
            Self::Mountains => 3.0,
            Self::Tundra => 0.7,
            Self::Snow => 2.0,
        }
    }

    /// Material of the topmost terrain cell.
    #[inline]
    #[must_use]
    pub const fn surface_material(self) -> MaterialId {
        match self {
            Self::Tundra | Self::Snow => MaterialId::Snow,
            Self::Plains | Self::Forest => MaterialId::Grass,
            Self::Desert => MaterialId::Sand,
            Self::Mountains => MaterialId::Stone,
        }
    }

    /// Material of the shallow layer just under the surface.
    #[inline]
    #[must_use]
    pub const fn subsoil_material(self) -> MaterialId {
        match self {
            Self::Desert => MaterialId::Sand,
            _ => MaterialId::Dirt,
        }
    }

    /// True if trees may grow here.
    #[inline]
    #[must_use]
    pub const fn grows_trees(self) -> bool {
        matches!(self, Self::Plains | Self::Forest)
    }

    /// True if cacti may grow here.
    #[inline]
    #[must_use]
    pub const fn grows_cacti(self) -> bool {
        matches!(self, Self::Desert)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Mountains => "mountains",
            Self::Tundra => "tundra",
            Self::Snow => "snow",
        }
    }
}

/// Climate signals sampled at one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// Elevation band signal in `[0, 1)`.
    pub elevation: f64,
    /// Temperature signal in `[0, 1)`.
    pub temperature: f64,
}

/// Biome classifier.
#[derive(Clone, Copy, Debug)]
pub struct BiomeClassifier {
    seed: WorldSeed,
}

impl BiomeClassifier {
    /// Creates a new biome classifier.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed }
    }

    /// Samples the climate signals at a noise-space position.
    #[must_use]
    pub fn climate(&self, x: f64, z: f64) -> Climate {
        Climate {
            elevation: value_noise_2d(x, z, ELEVATION_FREQUENCY, self.seed.offset(ELEVATION_SEED)),
            temperature: value_noise_2d(
                x,
                z,
                TEMPERATURE_FREQUENCY,
                self.seed.offset(TEMPERATURE_SEED),
            ),
        }
    }

    /// Classifies the biome at a noise-space position.
    #[must_use]
    pub fn classify(&self, x: f64, z: f64) -> Biome {
        Self::classify_from_climate(self.climate(x, z))
    }

    /// Threshold rules from climate to biome.
    #[must_use]
    pub fn classify_from_climate(climate: Climate) -> Biome {
        let Climate {
            elevation,
            temperature,
        } = climate;
        match elevation {
            e if e < 0.3 => {
                if temperature < 0.4 {
                    Biome::Tundra
                } else {
                    Biome::Plains
                }
            }
            e if e < 0.6 => {
                if temperature < 0.5 {
                    Biome::Forest
                } else {
                    Biome::Desert
                }
            }
            _ => {
                if temperature < 0.6 {
                    Biome::Mountains
                } else {
                    Biome::Snow
                }
            }
        }
    }
}
