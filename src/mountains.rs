//! Mountain field: ridged high-frequency noise.

use tracing::debug;

use crate::noise_field::{sample_noise_field, CoherentNoise, NoiseParams};
use crate::normalize::min_max_normalize;
use crate::projection::SphereCoordinates;
use crate::tilemap::Tilemap;

/// Ridge intensity in `[0, 1]`. High values trace the zero crossings of the
/// underlying noise and appear over ocean too; the compositor gates them.
#[derive(Clone, Debug)]
pub struct MountainField {
    pub ridges: Tilemap<f32>,
    pub params: NoiseParams,
    pub degenerate: bool,
}

/// Sample the mountain noise, fold it with `1 - |n|` and normalize.
pub fn generate_mountain_field<N: CoherentNoise + ?Sized>(
    coords: &SphereCoordinates,
    params: &NoiseParams,
    noise: &N,
) -> MountainField {
    let raw = sample_noise_field(coords, params, noise);
    let folded = raw.values.map(|&n| 1.0 - n.abs());
    let normalized = min_max_normalize(&folded);

    debug!(degenerate = normalized.degenerate, "mountain field ready");
    MountainField {
        ridges: normalized.field,
        params: raw.params,
        degenerate: normalized.degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlanetConfig, TerrainConstants};
    use crate::noise_field::{ConstantNoise, SimplexFbm};

    fn params() -> NoiseParams {
        TerrainConstants::default().mountain_noise(&PlanetConfig::default())
    }

    #[test]
    fn test_ridges_span_unit_range() {
        let coords = SphereCoordinates::new(64, 32).unwrap();
        let field = generate_mountain_field(&coords, &params(), &SimplexFbm::new());
        let (min, max) = field.ridges.min_max();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
        assert_eq!(field.params.octaves, 6);
        assert_eq!(field.params.persistence, 0.6);
    }

    #[test]
    fn test_fold_is_symmetric_in_sign() {
        // n and -n fold to the same ridge value, so both constants are flat
        let coords = SphereCoordinates::new(4, 4).unwrap();
        let pos = generate_mountain_field(&coords, &params(), &ConstantNoise(0.3));
        let neg = generate_mountain_field(&coords, &params(), &ConstantNoise(-0.3));
        assert!(pos.degenerate && neg.degenerate);
        assert_eq!(pos.ridges, neg.ridges);
    }

    #[test]
    fn test_different_offset_from_continents() {
        let coords = SphereCoordinates::new(32, 16).unwrap();
        let config = PlanetConfig::default();
        let constants = TerrainConstants::default();
        let noise = SimplexFbm::new();
        let a = generate_mountain_field(&coords, &constants.mountain_noise(&config), &noise);
        let mut shifted = constants.mountain_noise(&config);
        shifted.seed_offset = [config.seed as f64; 3];
        let b = generate_mountain_field(&coords, &shifted, &noise);
        assert_ne!(a.ridges, b.ridges);
    }
}
