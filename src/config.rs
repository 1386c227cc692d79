//! Generation configuration.
//!
//! [`PlanetConfig`] is the per-run record (grid size, seed, scales).
//! [`TerrainConstants`] holds the tunables of the continent/mountain pipeline.
//! Both load from JSON with missing keys falling back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TerrainError};
use crate::noise_field::NoiseParams;

/// Per-run generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// Columns of the equirectangular grid (longitude bands)
    pub width: usize,
    /// Rows of the equirectangular grid (latitude bands)
    pub height: usize,
    /// Noise seed, added to the sampled sphere coordinates
    pub seed: i64,
    /// Base frequency of the continent noise
    pub continent_scale: f64,
    /// Base frequency of the mountain noise
    pub mountain_scale: f64,
    /// Weight of the mountain field on land
    pub mountain_strength: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            seed: 42,
            continent_scale: 2.0,
            mountain_scale: 5.0,
            mountain_strength: 0.3,
        }
    }
}

impl PlanetConfig {
    /// Check dimensions, scales and strength. Nothing is generated from an
    /// invalid config.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width < 2 || self.height < 2 {
            return Err(TerrainError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        check_scale("continent_scale", self.continent_scale)?;
        check_scale("mountain_scale", self.mountain_scale)?;
        if !(self.mountain_strength.is_finite() && self.mountain_strength >= 0.0) {
            return Err(TerrainError::InvalidStrength(self.mountain_strength));
        }
        Ok(())
    }

    /// Load a config from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: PlanetConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_scale(name: &'static str, value: f64) -> Result<(), TerrainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::InvalidScale { name, value })
    }
}

// =============================================================================
// PIPELINE CONSTANTS
// =============================================================================

/// Fixed tunables of the altitude pipeline. Defaults reproduce the reference
/// terrain; tests inject other values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConstants {
    /// Value given to continent cells below `continent_threshold`
    pub continent_floor: f32,
    /// Normalized continent noise below this becomes `continent_floor`
    pub continent_threshold: f32,
    /// Continent mask must exceed this for mountains to contribute.
    /// Kept separate from `continent_threshold`; the gap forms a foothill band.
    pub mountain_gate: f32,
    /// Weight of the continent mask in the base altitude
    pub base_weight: f32,
    /// Added to the seed for the mountain field
    pub mountain_seed_offset: i64,
    pub continent_octaves: u32,
    pub continent_persistence: f64,
    pub mountain_octaves: u32,
    pub mountain_persistence: f64,
    pub lacunarity: f64,
}

impl Default for TerrainConstants {
    fn default() -> Self {
        Self {
            continent_floor: 0.1,
            continent_threshold: 0.45,
            mountain_gate: 0.2,
            base_weight: 0.5,
            mountain_seed_offset: 100,
            continent_octaves: 2,
            continent_persistence: 0.5,
            mountain_octaves: 6,
            mountain_persistence: 0.6,
            lacunarity: 2.0,
        }
    }
}

impl TerrainConstants {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Noise parameters for the continent field.
    pub fn continent_noise(&self, config: &PlanetConfig) -> NoiseParams {
        NoiseParams {
            seed_offset: fold_seed(config.seed, 0),
            frequency: config.continent_scale,
            octaves: self.continent_octaves,
            persistence: self.continent_persistence,
            lacunarity: self.lacunarity,
        }
    }

    /// Noise parameters for the mountain field, decorrelated from the
    /// continents by `mountain_seed_offset`.
    pub fn mountain_noise(&self, config: &PlanetConfig) -> NoiseParams {
        NoiseParams {
            seed_offset: fold_seed(config.seed, self.mountain_seed_offset),
            frequency: config.mountain_scale,
            octaves: self.mountain_octaves,
            persistence: self.mountain_persistence,
            lacunarity: self.lacunarity,
        }
    }
}

// =============================================================================
// SEED FOLDING
// =============================================================================

/// Width of the window seeds are folded into before they become sampling
/// offsets. Scaled by the highest octave frequency this stays far inside
/// the range where simplex lattice lookups are exact.
pub const SEED_PERIOD: i64 = 1 << 16;

/// Per-axis sampling offset for `seed + stage_offset`.
///
/// Seeds in `[-2^15, 2^15)` give `[s, s, s]`. Larger seeds keep their low
/// part on every axis and shift the y and z axes by a hash of the high part,
/// so every offset stays below `2 * SEED_PERIOD` in magnitude.
pub fn fold_seed(seed: i64, stage_offset: i64) -> [f64; 3] {
    let period = SEED_PERIOD as i128;
    let half = period / 2;
    let shifted = seed as i128 + stage_offset as i128 + half;
    let low = (shifted.rem_euclid(period) - half) as f64;
    let high = shifted.div_euclid(period);
    if high == 0 {
        return [low; 3];
    }

    let h1 = splitmix64(high as u64);
    let h2 = splitmix64(h1);
    [
        low,
        low + unit_interval(h1) * SEED_PERIOD as f64,
        low + unit_interval(h2) * SEED_PERIOD as f64,
    ]
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 53 bits of `h` as a value in `[0, 1)`.
fn unit_interval(h: u64) -> f64 {
    (h >> 11) as f64 / (1u64 << 53) as f64
}
