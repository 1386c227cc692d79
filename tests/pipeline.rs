//! End-to-end checks of the terrain pipeline and its downstream layers.

use rstest::rstest;

use exoplanet_generator::biomes::generate_biomes;
use exoplanet_generator::climate::{generate_climate, ClimateParams};
use exoplanet_generator::hydro::Hydrosphere;
use exoplanet_generator::noise_field::{ConstantNoise, SimplexFbm};
use exoplanet_generator::projection::SphereCoordinates;
use exoplanet_generator::{
    generate_altitude_map, generate_terrain, PlanetConfig, TerrainConstants, TerrainError,
};

fn config(width: usize, height: usize, seed: i64) -> PlanetConfig {
    PlanetConfig {
        width,
        height,
        seed,
        continent_scale: 2.0,
        mountain_scale: 5.0,
        mountain_strength: 0.3,
    }
}

#[test]
fn test_reference_scenario() {
    let altitude = generate_altitude_map(&config(4, 4, 42)).unwrap();
    assert_eq!(altitude.width(), 4);
    assert_eq!(altitude.height(), 4);
    assert_eq!(altitude.heights.len(), 16);
    assert!(altitude.heights.values().iter().all(|v| (0.0..=1.0).contains(v)));

    let again = generate_altitude_map(&config(4, 4, 42)).unwrap();
    assert_eq!(altitude.heights, again.heights);
}

#[rstest]
#[case(2, 2)]
#[case(3, 2)]
#[case(17, 9)]
#[case(64, 32)]
fn test_sphere_invariant_and_range(#[case] width: usize, #[case] height: usize) {
    let coords = SphereCoordinates::new(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            let [nx, ny, nz] = coords.point(x, y);
            assert!((nx * nx + ny * ny + nz * nz - 1.0).abs() < 1e-6);
        }
    }

    let altitude = generate_altitude_map(&config(width, height, 7)).unwrap();
    assert!(altitude.heights.values().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[rstest]
#[case(0)]
#[case(42)]
#[case(-1234)]
fn test_bimodal_mask_and_gating(#[case] seed: i64) {
    let constants = TerrainConstants::default();
    let layers = generate_terrain(&config(48, 24, seed), &constants, &SimplexFbm::new()).unwrap();

    for &v in layers.continents.mask.values() {
        assert!(v == 0.1 || (0.45..=1.0).contains(&v), "mask value {v}");
    }

    let mask = layers.continents.mask.values();
    let contribution = layers.altitude.mountain_contribution.values();
    for (m, c) in mask.iter().zip(contribution) {
        if *m <= constants.mountain_gate {
            assert_eq!(*c, 0.0);
        }
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate_altitude_map(&config(32, 16, 1)).unwrap();
    let b = generate_altitude_map(&config(32, 16, 2)).unwrap();
    assert_ne!(a.heights, b.heights);
}

#[rstest]
#[case(i64::MAX)]
#[case(i64::MIN)]
#[case(200_000_000_000_000_000)]
#[case(100_000_000_000_000_000)]
#[case(-1_099_511_627_776)]
fn test_extreme_seeds_give_real_terrain(#[case] seed: i64) {
    let altitude = generate_altitude_map(&config(16, 8, seed)).unwrap();
    assert!(!altitude.degenerate, "seed {seed} flattened the map");
    assert!(altitude.heights.values().iter().all(|v| (0.0..=1.0).contains(v)));
    let (lo, hi) = altitude.heights.min_max();
    assert_eq!((lo, hi), (0.0, 1.0));
}

#[test]
fn test_seeds_one_period_apart_differ() {
    let period = exoplanet_generator::config::SEED_PERIOD;
    let a = generate_altitude_map(&config(16, 8, 3)).unwrap();
    let b = generate_altitude_map(&config(16, 8, 3 + period)).unwrap();
    assert_ne!(a.heights, b.heights);
}

#[test]
fn test_uniform_noise_is_not_nan() {
    let layers = generate_terrain(
        &config(8, 4, 42),
        &TerrainConstants::default(),
        &ConstantNoise(0.25),
    )
    .unwrap();
    assert!(layers.altitude.degenerate);
    assert!(layers.altitude.heights.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_zero_octaves_is_not_nan() {
    let constants = TerrainConstants {
        continent_octaves: 0,
        mountain_octaves: 0,
        ..Default::default()
    };
    let layers = generate_terrain(&config(8, 4, 42), &constants, &SimplexFbm::new()).unwrap();
    assert!(layers.altitude.heights.values().iter().all(|v| v.is_finite()));
}

#[rstest]
#[case(config(1, 4, 0), TerrainError::InvalidDimension { width: 1, height: 4 })]
#[case(config(4, 0, 0), TerrainError::InvalidDimension { width: 4, height: 0 })]
#[case(PlanetConfig { continent_scale: 0.0, ..config(4, 4, 0) },
       TerrainError::InvalidScale { name: "continent_scale", value: 0.0 })]
#[case(PlanetConfig { mountain_scale: -1.0, ..config(4, 4, 0) },
       TerrainError::InvalidScale { name: "mountain_scale", value: -1.0 })]
#[case(PlanetConfig { mountain_strength: -0.5, ..config(4, 4, 0) },
       TerrainError::InvalidStrength(-0.5))]
fn test_invalid_config(#[case] config: PlanetConfig, #[case] expected: TerrainError) {
    assert_eq!(generate_altitude_map(&config).unwrap_err(), expected);
}

#[test]
fn test_downstream_layers_share_shape() {
    let altitude = generate_altitude_map(&config(24, 12, 42)).unwrap();
    let water = Hydrosphere::default().classify(&altitude.heights);
    let params = ClimateParams::default();
    let climate = generate_climate(&altitude.heights, &params, 42);
    let biomes = generate_biomes(&altitude.heights, &climate, params.sea_level);

    assert_eq!((water.width, water.height), (24, 12));
    assert_eq!((climate.temperature.width, climate.temperature.height), (24, 12));
    assert_eq!(biomes.len(), 24 * 12);
}
