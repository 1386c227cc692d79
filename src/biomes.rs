//! Whittaker-style biome classification from temperature and precipitation.

use serde::{Deserialize, Serialize};

use crate::climate::{ClimateMaps, PRECIPITATION_SCALE};
use crate::tilemap::Tilemap;

/// Biome types based on temperature and precipitation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Ocean,
    ColdDesert,
    Tundra,
    Grassland,
    Taiga,
    TemperateForest,
    TropicalForest,
    HotDesert,
}

impl Biome {
    pub fn all() -> &'static [Self] {
        &[
            Self::Ocean,
            Self::ColdDesert,
            Self::Tundra,
            Self::Grassland,
            Self::Taiga,
            Self::TemperateForest,
            Self::TropicalForest,
            Self::HotDesert,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::ColdDesert => "Cold desert",
            Biome::Tundra => "Tundra",
            Biome::Grassland => "Grassland",
            Biome::Taiga => "Taiga",
            Biome::TemperateForest => "Temperate forest",
            Biome::TropicalForest => "Tropical forest",
            Biome::HotDesert => "Hot desert",
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            Biome::Ocean => [0, 51, 255],
            Biome::ColdDesert => [200, 200, 200],
            Biome::Tundra => [240, 240, 240],
            Biome::Grassland => [170, 220, 170],
            Biome::Taiga => [34, 102, 34],
            Biome::TemperateForest => [68, 136, 68],
            Biome::TropicalForest => [0, 136, 0],
            Biome::HotDesert => [255, 221, 136],
        }
    }

    /// Classify one cell. `temperature` in Celsius, `humidity` in `[0, 1]`.
    pub fn classify(altitude: f32, temperature: f32, humidity: f32, sea_level: f32) -> Biome {
        if altitude < sea_level {
            return Biome::Ocean;
        }

        let precipitation = humidity * PRECIPITATION_SCALE;
        match precipitation {
            p if p < 50.0 => {
                if temperature > 10.0 { Biome::HotDesert } else { Biome::ColdDesert }
            }
            p if p < 300.0 => {
                if temperature > 0.0 { Biome::TemperateForest } else { Biome::Tundra }
            }
            p if p < 800.0 => {
                if temperature < 10.0 { Biome::Taiga } else { Biome::TropicalForest }
            }
            _ => {
                if temperature > 5.0 { Biome::TropicalForest } else { Biome::Grassland }
            }
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classify every cell of the altitude map.
pub fn generate_biomes(altitude: &Tilemap<f32>, climate: &ClimateMaps, sea_level: f32) -> Tilemap<Biome> {
    let mut biomes = Tilemap::new_with(altitude.width, altitude.height, Biome::Ocean);
    for (x, y, biome) in biomes.iter_mut() {
        *biome = Biome::classify(
            *altitude.get(x, y),
            *climate.temperature.get(x, y),
            *climate.humidity.get(x, y),
            sea_level,
        );
    }
    biomes
}

/// Cell count per biome, in [`Biome::all`] order, skipping empty biomes.
pub fn biome_histogram(biomes: &Tilemap<Biome>) -> Vec<(Biome, usize)> {
    Biome::all()
        .iter()
        .map(|&b| (b, biomes.values().iter().filter(|&&c| c == b).count()))
        .filter(|&(_, n)| n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_sea_level_is_ocean() {
        assert_eq!(Biome::classify(0.2, 30.0, 1.0, 0.45), Biome::Ocean);
    }

    #[test]
    fn test_whittaker_table() {
        let cases = [
            (0.01, 20.0, Biome::HotDesert),
            (0.01, 5.0, Biome::ColdDesert),
            (0.2, 5.0, Biome::TemperateForest),
            (0.2, -5.0, Biome::Tundra),
            (0.5, 5.0, Biome::Taiga),
            (0.5, 15.0, Biome::TropicalForest),
            (0.9, 8.0, Biome::TropicalForest),
            (0.9, 2.0, Biome::Grassland),
        ];
        for (humidity, temp, expected) in cases {
            assert_eq!(
                Biome::classify(0.8, temp, humidity, 0.45),
                expected,
                "humidity {humidity}, temperature {temp}"
            );
        }
    }

    #[test]
    fn test_generate_and_histogram() {
        let altitude = Tilemap::from_vec(3, 1, vec![0.1, 0.5, 0.99]).unwrap();
        let climate = ClimateMaps {
            temperature: Tilemap::new_with(3, 1, 12.0),
            humidity: Tilemap::from_vec(3, 1, vec![1.0, 0.2, 0.02]).unwrap(),
            equator_temp: 12.0,
        };
        let biomes = generate_biomes(&altitude, &climate, 0.45);
        assert_eq!(
            biomes.values(),
            &[Biome::Ocean, Biome::TemperateForest, Biome::HotDesert]
        );
        let hist = biome_histogram(&biomes);
        assert_eq!(hist.len(), 3);
        assert!(hist.iter().all(|&(_, n)| n == 1));
    }
}
