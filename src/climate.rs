//! Climate system for generating temperature and humidity maps
//! Based on latitude, altitude and sea level

use noise::{NoiseFn, Perlin, Seedable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::projection::row_latitude;
use crate::tilemap::Tilemap;

// =============================================================================
// CLIMATE PARAMETERS
// =============================================================================

/// Range the equator temperature is drawn from when not given (Celsius)
const EQUATOR_TEMP_RANGE: std::ops::Range<f32> = -5.0..10.0;

/// Exponent of the cosine latitude falloff
const LATITUDE_EXPONENT: f64 = 1.5;

/// Fraction of temperature lost at altitude 1.0
const ALTITUDE_COOLING: f32 = 0.5;

/// Humidity of land right at sea level
const COASTAL_HUMIDITY: f32 = 0.3;

/// Humidity decay rate with altitude above sea level
const HUMIDITY_DECAY: f32 = 3.0;

/// Annual precipitation (mm) at humidity 1.0
pub const PRECIPITATION_SCALE: f32 = 1000.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    /// Sea-level equator temperature in Celsius; drawn from the seed if unset
    pub equator_temp: Option<f32>,
    /// Altitude separating ocean from land
    pub sea_level: f32,
    pub min_temp: f32,
    pub max_temp: f32,
    /// Amplitude of the per-latitude temperature noise (Celsius)
    pub band_noise: f32,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            equator_temp: None,
            sea_level: 0.45,
            min_temp: -50.0,
            max_temp: 25.0,
            band_noise: 2.0,
        }
    }
}

/// Temperature (Celsius) and humidity (0-1) over the altitude grid.
#[derive(Clone, Debug)]
pub struct ClimateMaps {
    pub temperature: Tilemap<f32>,
    pub humidity: Tilemap<f32>,
    /// Equator temperature actually used
    pub equator_temp: f32,
}

impl ClimateMaps {
    /// Annual precipitation in mm.
    pub fn precipitation(&self) -> Tilemap<f32> {
        self.humidity.map(|&h| h * PRECIPITATION_SCALE)
    }
}

// =============================================================================
// TEMPERATURE GENERATION
// =============================================================================

/// Generate temperature and humidity maps for an altitude map in `[0, 1]`.
pub fn generate_climate(altitude: &Tilemap<f32>, params: &ClimateParams, seed: u64) -> ClimateMaps {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let equator_temp = params
        .equator_temp
        .unwrap_or_else(|| rng.gen_range(EQUATOR_TEMP_RANGE));

    let temperature = generate_temperature(altitude, equator_temp, params, &mut rng, seed);
    let humidity = generate_humidity(altitude, params.sea_level);

    ClimateMaps {
        temperature,
        humidity,
        equator_temp,
    }
}

/// Temperature falls off as `cos(lat)^1.5` from the equator and with
/// altitude, plus a small noise term that varies by latitude band.
fn generate_temperature(
    altitude: &Tilemap<f32>,
    equator_temp: f32,
    params: &ClimateParams,
    rng: &mut ChaCha8Rng,
    seed: u64,
) -> Tilemap<f32> {
    let width = altitude.width;
    let height = altitude.height;
    let band_noise = Perlin::new(1).set_seed(seed as u32);
    let mut temperature = Tilemap::new_with(width, height, 0.0f32);

    for y in 0..height {
        let lat = row_latitude(y, height).abs();
        let cos_lat = lat.cos().max(0.0);
        let lat_factor = cos_lat.powf(LATITUDE_EXPONENT) as f32;
        let base = equator_temp * lat_factor;

        let jitter: f64 = rng.gen();
        let noise = band_noise.get([y as f64 * 0.01, jitter]) as f32 * params.band_noise;

        for x in 0..width {
            let a = *altitude.get(x, y);
            let t = base * (1.0 - ALTITUDE_COOLING * a) + noise;
            temperature.set(x, y, t.clamp(params.min_temp, params.max_temp));
        }
    }

    temperature
}

// =============================================================================
// HUMIDITY
// =============================================================================

/// Ocean is saturated; land humidity decays exponentially above sea level.
pub fn generate_humidity(altitude: &Tilemap<f32>, sea_level: f32) -> Tilemap<f32> {
    altitude.map(|&a| {
        let h = if a < sea_level {
            1.0
        } else {
            COASTAL_HUMIDITY * (-HUMIDITY_DECAY * (a - sea_level)).exp()
        };
        h.clamp(0.0, 1.0)
    })
}
