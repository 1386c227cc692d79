//! Hydrosphere: ocean / coast / land classification of an altitude map.

use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WaterClass {
    #[default]
    Ocean = 0,
    Coast = 1,
    Land = 2,
}

impl WaterClass {
    pub fn color(&self) -> [u8; 3] {
        match self {
            WaterClass::Ocean => [20, 74, 116],
            WaterClass::Coast => [194, 178, 128],
            WaterClass::Land => [30, 127, 63],
        }
    }
}

/// Sea level and coastal band width, in altitude units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hydrosphere {
    pub sea_level: f32,
    pub coast_threshold: f32,
}

impl Default for Hydrosphere {
    fn default() -> Self {
        Self {
            sea_level: 0.0,
            coast_threshold: 0.05,
        }
    }
}

/// Share of cells in each class.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterCoverage {
    pub ocean: f32,
    pub coast: f32,
    pub land: f32,
}

impl Hydrosphere {
    pub fn new(sea_level: f32, coast_threshold: f32) -> Self {
        Self { sea_level, coast_threshold }
    }

    /// Classify one altitude value. Cells within `coast_threshold` of sea
    /// level are coast even when below it.
    pub fn classify_value(&self, altitude: f32) -> WaterClass {
        if (altitude - self.sea_level).abs() <= self.coast_threshold {
            WaterClass::Coast
        } else if altitude < self.sea_level {
            WaterClass::Ocean
        } else {
            WaterClass::Land
        }
    }

    pub fn classify(&self, altitude: &Tilemap<f32>) -> Tilemap<WaterClass> {
        altitude.map(|&a| self.classify_value(a))
    }
}

pub fn coverage(water: &Tilemap<WaterClass>) -> WaterCoverage {
    let mut counts = [0usize; 3];
    for &class in water.values() {
        counts[class as usize] += 1;
    }
    let total = water.len().max(1) as f32;
    WaterCoverage {
        ocean: counts[0] as f32 / total,
        coast: counts[1] as f32 / total,
        land: counts[2] as f32 / total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_around_sea_level() {
        let hydro = Hydrosphere::new(0.4, 0.05);
        assert_eq!(hydro.classify_value(0.1), WaterClass::Ocean);
        assert_eq!(hydro.classify_value(0.36), WaterClass::Coast);
        assert_eq!(hydro.classify_value(0.4), WaterClass::Coast);
        assert_eq!(hydro.classify_value(0.44), WaterClass::Coast);
        assert_eq!(hydro.classify_value(0.9), WaterClass::Land);
    }

    #[test]
    fn test_default_sea_level_on_normalized_map() {
        // With sea level at 0 a normalized map has no open ocean
        let map = Tilemap::from_vec(4, 1, vec![0.0, 0.03, 0.5, 1.0]).unwrap();
        let water = Hydrosphere::default().classify(&map);
        assert_eq!(
            water.values(),
            &[WaterClass::Coast, WaterClass::Coast, WaterClass::Land, WaterClass::Land]
        );
    }

    #[test]
    fn test_coverage_sums_to_one() {
        let map = Tilemap::from_vec(5, 1, vec![0.0, 0.2, 0.45, 0.6, 0.9]).unwrap();
        let water = Hydrosphere::new(0.45, 0.05).classify(&map);
        let c = coverage(&water);
        assert!((c.ocean - 0.4).abs() < 1e-6);
        assert!((c.coast - 0.2).abs() < 1e-6);
        assert!((c.land - 0.4).abs() < 1e-6);
    }
}
