//! Continent mask: low-frequency noise split into ocean floor and land.

use tracing::debug;

use crate::config::TerrainConstants;
use crate::noise_field::{sample_noise_field, CoherentNoise, NoiseParams};
use crate::normalize::min_max_normalize;
use crate::projection::SphereCoordinates;
use crate::tilemap::Tilemap;

/// How land-like each cell is.
///
/// Values are either exactly `floor` or in `[threshold, 1]`. The land part is
/// not rescaled after thresholding, so the distribution stays bimodal.
#[derive(Clone, Debug)]
pub struct ContinentMask {
    pub mask: Tilemap<f32>,
    pub params: NoiseParams,
    /// The raw noise had zero range
    pub degenerate: bool,
}

impl ContinentMask {
    /// Fraction of cells at or above the threshold.
    pub fn land_fraction(&self, threshold: f32) -> f32 {
        let land = self.mask.values().iter().filter(|&&v| v >= threshold).count();
        land as f32 / self.mask.len() as f32
    }
}

/// Sample the continent noise, normalize it and flatten everything below
/// `continent_threshold` to `continent_floor`.
pub fn generate_continent_mask<N: CoherentNoise + ?Sized>(
    coords: &SphereCoordinates,
    params: &NoiseParams,
    constants: &TerrainConstants,
    noise: &N,
) -> ContinentMask {
    let raw = sample_noise_field(coords, params, noise);
    let normalized = min_max_normalize(&raw.values);

    let floor = constants.continent_floor;
    let threshold = constants.continent_threshold;
    let mask = normalized.field.map(|&v| if v < threshold { floor } else { v });

    let result = ContinentMask {
        mask,
        params: raw.params,
        degenerate: normalized.degenerate,
    };
    debug!(
        land_fraction = result.land_fraction(threshold),
        degenerate = result.degenerate,
        "continent mask ready"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanetConfig;
    use crate::noise_field::{ConstantNoise, SimplexFbm};

    fn build(seed: i64, width: usize, height: usize) -> ContinentMask {
        let config = PlanetConfig { width, height, seed, ..Default::default() };
        let constants = TerrainConstants::default();
        let coords = SphereCoordinates::new(width, height).unwrap();
        generate_continent_mask(
            &coords,
            &constants.continent_noise(&config),
            &constants,
            &SimplexFbm::new(),
        )
    }

    #[test]
    fn test_mask_is_bimodal() {
        for seed in [0, 1, 42, 1234, -7] {
            let result = build(seed, 64, 32);
            for &v in result.mask.values() {
                assert!(
                    v == 0.1 || (0.45..=1.0).contains(&v),
                    "seed {seed}: value {v} is neither floor nor land"
                );
            }
        }
    }

    #[test]
    fn test_mask_keeps_maximum() {
        let result = build(42, 64, 32);
        let (_, max) = result.mask.min_max();
        assert_eq!(max, 1.0);
        assert!(!result.degenerate);
    }

    #[test]
    fn test_mask_is_deterministic() {
        let a = build(99, 32, 16);
        let b = build(99, 32, 16);
        assert_eq!(a.mask, b.mask);
    }

    #[test]
    fn test_uniform_noise_floors_everything() {
        let coords = SphereCoordinates::new(8, 4).unwrap();
        let constants = TerrainConstants::default();
        let params = constants.continent_noise(&PlanetConfig::default());
        let result = generate_continent_mask(&coords, &params, &constants, &ConstantNoise(0.25));
        assert!(result.degenerate);
        assert!(result.mask.values().iter().all(|&v| v == 0.1));
    }

    #[test]
    fn test_injected_constants_are_used() {
        let coords = SphereCoordinates::new(32, 16).unwrap();
        let constants = TerrainConstants {
            continent_floor: 0.0,
            continent_threshold: 0.6,
            ..Default::default()
        };
        let params = constants.continent_noise(&PlanetConfig::default());
        let result = generate_continent_mask(&coords, &params, &constants, &SimplexFbm::new());
        for &v in result.mask.values() {
            assert!(v == 0.0 || v >= 0.6);
        }
    }
}
