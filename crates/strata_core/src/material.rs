//! Material registry.
//!
//! Materials are a fixed table of immutable definitions. A voxel refers to
//! its material by [`MaterialId`]; the definition is looked up in the static
//! registry and never copied around.

use serde::{Deserialize, Serialize};

/// Linear RGB color, each channel in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Default per-channel tolerance for [`colors_match`].
pub const DEFAULT_COLOR_TOLERANCE: f32 = 0.01;

/// Number of registered materials.
pub const MATERIAL_COUNT: usize = 15;

/// Identifies one entry in the material registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaterialId {
    /// Biome top layer for plains and forest.
    Grass = 0,
    /// Shallow subsoil.
    Dirt = 1,
    /// Default underground fill.
    Stone = 2,
    /// Indestructible floor band.
    Bedrock = 3,
    /// Desert top layer and subsoil.
    Sand = 4,
    /// Cold biome top layer.
    Snow = 5,
    /// Frozen water.
    Ice = 6,
    /// Flood-fill liquid. The only transparent material.
    Water = 7,
    /// Tree trunks.
    Wood = 8,
    /// Tree canopy.
    Leaves = 9,
    /// Desert plant.
    Cactus = 10,
    /// Shallowest ore.
    CoalOre = 11,
    /// Mid-depth ore.
    IronOre = 12,
    /// Deep ore.
    GoldOre = 13,
    /// Deepest and rarest ore.
    DiamondOre = 14,
}

impl MaterialId {
    /// Every material, in registry order.
    pub const ALL: [Self; MATERIAL_COUNT] = [
        Self::Grass,
        Self::Dirt,
        Self::Stone,
        Self::Bedrock,
        Self::Sand,
        Self::Snow,
        Self::Ice,
        Self::Water,
        Self::Wood,
        Self::Leaves,
        Self::Cactus,
        Self::CoalOre,
        Self::IronOre,
        Self::GoldOre,
        Self::DiamondOre,
    ];

    /// Returns the registry entry for this material.
    #[inline]
    #[must_use]
    pub fn material(self) -> &'static Material {
        &REGISTRY[self as usize]
    }

    /// Raw registry index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a material by raw index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < MATERIAL_COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Shorthand for `self.material().transparent`.
    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.material().transparent
    }

    /// Shorthand for `self.material().color`.
    #[inline]
    #[must_use]
    pub fn color(self) -> Rgb {
        self.material().color
    }

    /// True for the four ore materials.
    #[inline]
    #[must_use]
    pub const fn is_ore(self) -> bool {
        matches!(
            self,
            Self::CoalOre | Self::IronOre | Self::GoldOre | Self::DiamondOre
        )
    }
}

/// An immutable material definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Lowercase display name.
    pub name: &'static str,
    /// Base color.
    pub color: Rgb,
    /// Transparent materials are never merged by the mesher.
    pub transparent: bool,
    /// Opacity used when drawing.
    pub alpha: f32,
    /// Draw order bucket: 0 = solid pass, 1 = transparent pass.
    pub render_order: u8,
}

impl Material {
    const fn solid(name: &'static str, color: Rgb) -> Self {
        Self {
            name,
            color,
            transparent: false,
            alpha: 1.0,
            render_order: 0,
        }
    }

    const fn liquid(name: &'static str, color: Rgb, alpha: f32) -> Self {
        Self {
            name,
            color,
            transparent: true,
            alpha,
            render_order: 1,
        }
    }
}

static REGISTRY: [Material; MATERIAL_COUNT] = [
    Material::solid("grass", [0.3, 0.7, 0.3]),
    Material::solid("dirt", [0.6, 0.4, 0.2]),
    Material::solid("stone", [0.5, 0.5, 0.52]),
    Material::solid("bedrock", [0.15, 0.15, 0.15]),
    Material::solid("sand", [0.93, 0.88, 0.65]),
    Material::solid("snow", [0.95, 0.95, 0.98]),
    Material::solid("ice", [0.7, 0.85, 0.95]),
    Material::liquid("water", [0.2, 0.4, 0.8], 0.7),
    Material::solid("wood", [0.4, 0.25, 0.1]),
    Material::solid("leaves", [0.2, 0.5, 0.2]),
    Material::solid("cactus", [0.25, 0.55, 0.2]),
    Material::solid("coal_ore", [0.2, 0.2, 0.2]),
    Material::solid("iron_ore", [0.7, 0.6, 0.5]),
    Material::solid("gold_ore", [0.9, 0.8, 0.2]),
    Material::solid("diamond_ore", [0.3, 0.8, 0.9]),
];

/// True when every channel of `a` and `b` differs by less than `tolerance`.
#[inline]
#[must_use]
pub fn colors_match(a: Rgb, b: Rgb, tolerance: f32) -> bool {
    (a[0] - b[0]).abs() < tolerance
        && (a[1] - b[1]).abs() < tolerance
        && (a[2] - b[2]).abs() < tolerance
}
