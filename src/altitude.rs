//! Altitude compositing and the full terrain pipeline.
//!
//! Stages run in strict order: sphere projection, then the continent and
//! mountain fields (independent of each other), then compositing.

use tracing::{info, warn};

use crate::config::{PlanetConfig, TerrainConstants};
use crate::continents::{generate_continent_mask, ContinentMask};
use crate::error::TerrainError;
use crate::mountains::{generate_mountain_field, MountainField};
use crate::noise_field::{CoherentNoise, SimplexFbm};
use crate::normalize::min_max_normalize;
use crate::projection::SphereCoordinates;
use crate::tilemap::Tilemap;

/// Final heightmap in `[0, 1]`, `height` rows by `width` columns, row 0 at
/// the south pole.
#[derive(Clone, Debug)]
pub struct AltitudeMap {
    pub heights: Tilemap<f32>,
    /// Mountain term before the final normalization; zero wherever the
    /// continent mask is at or below the gate
    pub mountain_contribution: Tilemap<f32>,
    /// The composite had zero range and was replaced by zeros
    pub degenerate: bool,
}

impl AltitudeMap {
    pub fn width(&self) -> usize {
        self.heights.width
    }

    pub fn height(&self) -> usize {
        self.heights.height
    }
}

/// Every intermediate of a generation run.
#[derive(Clone, Debug)]
pub struct TerrainLayers {
    pub coords: SphereCoordinates,
    pub continents: ContinentMask,
    pub mountains: MountainField,
    pub altitude: AltitudeMap,
}

/// Blend the continent mask and mountain field:
/// `base_weight * mask + strength * ridges` where `mask > mountain_gate`,
/// then normalize to `[0, 1]`.
pub fn compose_altitude(
    continents: &Tilemap<f32>,
    mountains: &Tilemap<f32>,
    mountain_strength: f32,
    constants: &TerrainConstants,
) -> AltitudeMap {
    let gate = constants.mountain_gate;
    let mountain_contribution = continents.zip_map(mountains, |&c, &m| {
        if c > gate { m * mountain_strength } else { 0.0 }
    });

    let base_weight = constants.base_weight;
    let raw = continents.zip_map(&mountain_contribution, |&c, &m| c * base_weight + m);
    let normalized = min_max_normalize(&raw);

    AltitudeMap {
        heights: normalized.field,
        mountain_contribution,
        degenerate: normalized.degenerate,
    }
}

/// Generate an altitude map with the default noise and constants.
pub fn generate_altitude_map(config: &PlanetConfig) -> Result<AltitudeMap, TerrainError> {
    Ok(generate_terrain(config, &TerrainConstants::default(), &SimplexFbm::new())?.altitude)
}

/// Run the whole pipeline with injected constants and noise source.
pub fn generate_terrain<N: CoherentNoise + ?Sized>(
    config: &PlanetConfig,
    constants: &TerrainConstants,
    noise: &N,
) -> Result<TerrainLayers, TerrainError> {
    config.validate()?;

    info!(width = config.width, height = config.height, "projecting grid onto sphere");
    let coords = SphereCoordinates::new(config.width, config.height)?;

    info!(seed = config.seed, "generating continents");
    let continents = generate_continent_mask(
        &coords,
        &constants.continent_noise(config),
        constants,
        noise,
    );

    info!("generating mountains");
    let mountains = generate_mountain_field(&coords, &constants.mountain_noise(config), noise);

    let altitude = compose_altitude(
        &continents.mask,
        &mountains.ridges,
        config.mountain_strength as f32,
        constants,
    );
    if altitude.degenerate {
        warn!("altitude map is flat for this configuration");
    }

    Ok(TerrainLayers {
        coords,
        continents,
        mountains,
        altitude,
    })
}
