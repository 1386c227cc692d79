//! Static wind and atmosphere fields.
//!
//! Winds combine the three circulation cells, a geostrophic term from the
//! temperature gradient, a relief term from the altitude gradient and a few
//! seeded static cyclones. Nothing here depends on time.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tilemap::Tilemap;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Planetary rotation rate (rad/s)
const OMEGA: f64 = 7.2921e-5;

/// Keeps the Coriolis parameter away from zero at the equator
const CORIOLIS_EPSILON: f64 = 1e-10;

const GEOSTROPHIC_FACTOR: f32 = 0.3;
const RELIEF_FACTOR: f32 = 0.001;

/// Kilometres per degree of latitude
const KM_PER_DEGREE: f32 = 111.0;

/// Standard lapse rate (degrees per altitude unit)
const LAPSE_RATE: f32 = 0.0065;

const SEA_LEVEL_PRESSURE: f32 = 1013.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindParams {
    pub cyclones: usize,
    /// Smoothing applied to the summed wind components
    pub blur_sigma: f32,
    /// Component magnitude limit (m/s)
    pub max_component: f32,
}

impl Default for WindParams {
    fn default() -> Self {
        Self {
            cyclones: 5,
            blur_sigma: 1.5,
            max_component: 40.0,
        }
    }
}

/// Wind components in m/s; `direction` in degrees `[0, 360)`.
#[derive(Clone, Debug)]
pub struct WindField {
    pub u: Tilemap<f32>,
    pub v: Tilemap<f32>,
    pub speed: Tilemap<f32>,
    pub direction: Tilemap<f32>,
}

#[derive(Clone, Debug)]
pub struct AtmosphereFields {
    /// Temperature corrected for altitude
    pub temperature: Tilemap<f32>,
    pub humidity: Tilemap<f32>,
    /// hPa
    pub pressure: Tilemap<f32>,
    pub clouds: Tilemap<f32>,
}

/// A static cyclone centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cyclone {
    pub lat: f32,
    pub lon: f32,
    pub intensity: f32,
    /// Radius in km
    pub radius: f32,
}

fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// =============================================================================
// CIRCULATION CELLS
// =============================================================================

/// Hadley, Ferrel and polar cell winds from latitude (degrees).
pub fn circulation_cells(lat: &Tilemap<f32>) -> (Tilemap<f32>, Tilemap<f32>) {
    let u = lat.map(|&l| {
        let (hadley, ferrel, polar) = cell_weights(l);
        -6.0 * hadley + 12.0 * ferrel * sign(l) + 15.0 * polar * sign(l)
    });
    let v = lat.map(|&l| {
        let (hadley, _, polar) = cell_weights(l);
        -3.0 * hadley * sign(l) + 2.0 * polar * sign(l)
    });
    (u, v)
}

fn cell_weights(lat: f32) -> (f32, f32, f32) {
    let hadley = (-(lat / 25.0).powi(2)).exp();
    let ferrel = (-((lat.abs() - 45.0) / 15.0).powi(2)).exp();
    let polar = (-((lat.abs() - 75.0) / 10.0).powi(2)).exp();
    (hadley, ferrel, polar)
}

// =============================================================================
// CYCLONES
// =============================================================================

/// Draw cyclone centres in the tropics.
pub fn place_cyclones(count: usize, rng: &mut ChaCha8Rng) -> Vec<Cyclone> {
    (0..count)
        .map(|_| Cyclone {
            lat: rng.gen_range(-30.0..30.0),
            lon: rng.gen_range(-180.0..180.0),
            intensity: rng.gen_range(10.0..25.0),
            radius: rng.gen_range(250.0..500.0),
        })
        .collect()
}

/// Tangential wind of all cyclones, damped where it is cold.
pub fn cyclone_field(
    lat: &Tilemap<f32>,
    lon: &Tilemap<f32>,
    temperature: &Tilemap<f32>,
    cyclones: &[Cyclone],
) -> (Tilemap<f32>, Tilemap<f32>) {
    let mut u = Tilemap::new_with(lat.width, lat.height, 0.0f32);
    let mut v = Tilemap::new_with(lat.width, lat.height, 0.0f32);

    for c in cyclones {
        let spin = if c.lat != 0.0 { sign(c.lat) } else { 1.0 };
        let cos_lat = c.lat.to_radians().cos();

        for y in 0..lat.height {
            for x in 0..lat.width {
                let dy = (lat.get(x, y) - c.lat) * KM_PER_DEGREE;
                let dx = (lon.get(x, y) - c.lon) * KM_PER_DEGREE * cos_lat;
                let r = (dx * dx + dy * dy).sqrt() + 1e-6;
                let falloff = (-(r / c.radius).powi(2)).exp();
                let warmth = ((temperature.get(x, y) + 10.0) / 40.0).clamp(0.0, 1.0);

                *u.get_mut(x, y) += -spin * c.intensity * dy / r * falloff * warmth;
                *v.get_mut(x, y) += spin * c.intensity * dx / r * falloff * warmth;
            }
        }
    }

    (u, v)
}

// =============================================================================
// WINDS
// =============================================================================

/// Generate the wind field. `lat` and `lon` are in degrees.
pub fn generate_winds(
    altitude: &Tilemap<f32>,
    temperature: &Tilemap<f32>,
    lat: &Tilemap<f32>,
    lon: &Tilemap<f32>,
    params: &WindParams,
    seed: u64,
) -> WindField {
    let coriolis = lat.map(|&l| (2.0 * OMEGA * (l as f64).to_radians().sin() + CORIOLIS_EPSILON) as f32);

    let (dt_drow, dt_dcol) = temperature.gradient();
    let u_geo = dt_drow.zip_map(&coriolis, |&d, &f| -GEOSTROPHIC_FACTOR * d / f);
    let v_geo = dt_dcol.zip_map(&coriolis, |&d, &f| GEOSTROPHIC_FACTOR * d / f);

    let (dh_drow, dh_dcol) = altitude.gradient();
    let u_relief = dh_dcol.map(|&d| -RELIEF_FACTOR * d);
    let v_relief = dh_drow.map(|&d| -RELIEF_FACTOR * d);

    let (u_cell, v_cell) = circulation_cells(lat);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let cyclones = place_cyclones(params.cyclones, &mut rng);
    debug!(count = cyclones.len(), "placed static cyclones");
    let (u_cyc, v_cyc) = cyclone_field(lat, lon, temperature, &cyclones);

    let sum = |a: &Tilemap<f32>, b: &Tilemap<f32>, c: &Tilemap<f32>, d: &Tilemap<f32>| {
        let ab = a.zip_map(b, |x, y| x + y);
        let cd = c.zip_map(d, |x, y| x + y);
        ab.zip_map(&cd, |x, y| x + y)
    };
    let mut u = sum(&u_geo, &u_relief, &u_cell, &u_cyc).gaussian_blur(params.blur_sigma);
    let mut v = sum(&v_geo, &v_relief, &v_cell, &v_cyc).gaussian_blur(params.blur_sigma);

    u.clamp_all(-params.max_component, params.max_component);
    v.clamp_all(-params.max_component, params.max_component);

    let speed = u.zip_map(&v, |a, b| (a * a + b * b).sqrt());
    let direction = u.zip_map(&v, |a, b| (b.atan2(*a).to_degrees() + 360.0) % 360.0);

    WindField { u, v, speed, direction }
}

// =============================================================================
// ATMOSPHERE
// =============================================================================

/// Derive temperature, humidity, pressure and cloud cover.
/// `precipitation` is in mm/yr.
pub fn generate_atmosphere(
    altitude: &Tilemap<f32>,
    temperature: &Tilemap<f32>,
    precipitation: &Tilemap<f32>,
    wind_speed: &Tilemap<f32>,
) -> AtmosphereFields {
    let adjusted = temperature.zip_map(altitude, |&t, &a| t - LAPSE_RATE * a);
    let humidity = precipitation.map(|&p| (p / 3000.0).clamp(0.0, 1.0));
    let pressure = altitude.zip_map(wind_speed, |&a, &s| SEA_LEVEL_PRESSURE - 0.12 * a - 0.8 * s);
    let clouds = humidity.zip_map(wind_speed, |&h, &s| (h * s / 20.0).clamp(0.0, 1.0));

    AtmosphereFields {
        temperature: adjusted,
        humidity,
        pressure,
        clouds,
    }
}
