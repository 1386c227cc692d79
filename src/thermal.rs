//! Stellar irradiation and the zonal temperature profile.

use std::f64::consts::PI;

use crate::exoplanet::Exoplanet;

/// Bond albedo used when none is known
pub const DEFAULT_ALBEDO: f64 = 0.306;

/// Metres per astronomical unit
pub const AU: f64 = 1.496e11;

/// Default star–planet distance (TRAPPIST-1 e orbit)
pub const DEFAULT_DISTANCE: f64 = 0.0293 * AU;

pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Solar radius in metres
pub const SOLAR_RADIUS: f64 = 6.96e8;

/// Samples in a latitude profile
pub const PROFILE_POINTS: usize = 512;

/// Star luminosity in watts from effective temperature (K) and radius in
/// solar radii.
pub fn luminosity(t_eff: f64, radius_solar: f64) -> f64 {
    let radius = radius_solar * SOLAR_RADIUS;
    4.0 * PI * radius * radius * STEFAN_BOLTZMANN * t_eff.powi(4)
}

/// Planetary equilibrium temperature (K).
pub fn equilibrium_temperature(luminosity: f64, albedo: f64, distance: f64) -> f64 {
    let absorbed = luminosity * (1.0 - albedo);
    let emitted = 16.0 * PI * STEFAN_BOLTZMANN * distance * distance;
    (absorbed / emitted).powf(0.25)
}

/// Temperature by latitude, `t_mean * cos²(lat)` over `points` samples from
/// -90° to 90°. Returns `(latitudes, temperatures)`.
pub fn latitude_profile(t_mean: f64, points: usize) -> (Vec<f64>, Vec<f64>) {
    let lats: Vec<f64> = (0..points)
        .map(|i| crate::projection::linspace_at(-90.0, 90.0, i, points))
        .collect();
    let temps = lats.iter().map(|l| t_mean * l.to_radians().cos().powi(2)).collect();
    (lats, temps)
}

/// Star and orbit parameters for one planet.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalModel {
    /// Star effective temperature (K)
    pub star_temperature: f64,
    /// Star radius in solar radii
    pub star_radius: f64,
    pub albedo: f64,
    /// Star–planet distance (m)
    pub distance: f64,
}

impl ThermalModel {
    pub fn new(star_temperature: f64, star_radius: f64) -> Self {
        Self {
            star_temperature,
            star_radius,
            albedo: DEFAULT_ALBEDO,
            distance: DEFAULT_DISTANCE,
        }
    }

    /// Build from archive data. `None` when the star temperature or radius
    /// is missing.
    pub fn from_exoplanet(planet: &Exoplanet) -> Option<Self> {
        Some(Self::new(planet.st_teff?, planet.st_rad?))
    }

    pub fn luminosity(&self) -> f64 {
        luminosity(self.star_temperature, self.star_radius)
    }

    pub fn mean_temperature(&self) -> f64 {
        equilibrium_temperature(self.luminosity(), self.albedo, self.distance)
    }

    pub fn profile(&self, points: usize) -> (Vec<f64>, Vec<f64>) {
        latitude_profile(self.mean_temperature(), points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_luminosity() {
        let l = luminosity(5772.0, 1.0);
        assert!((l / 3.828e26 - 1.0).abs() < 0.02, "got {l:e}");
    }

    #[test]
    fn test_earth_equilibrium_temperature() {
        let l = luminosity(5772.0, 1.0);
        let t = equilibrium_temperature(l, 0.306, AU);
        assert!((t - 254.0).abs() < 3.0, "got {t}");
    }

    #[test]
    fn test_trappist_e_is_temperate() {
        let model = ThermalModel::new(2566.0, 0.1192);
        let t = model.mean_temperature();
        assert!(t > 215.0 && t < 240.0, "got {t}");
    }

    #[test]
    fn test_profile_peaks_at_equator() {
        let (lats, temps) = latitude_profile(250.0, 181);
        assert_eq!(lats.len(), 181);
        assert_eq!(lats[90], 0.0);
        assert!((temps[90] - 250.0).abs() < 1e-9);
        assert!(temps[0].abs() < 1e-9);
        assert!(temps[180].abs() < 1e-9);
    }

    #[test]
    fn test_missing_star_data() {
        let planet = Exoplanet {
            pl_name: Some("X".into()),
            st_teff: Some(3000.0),
            ..Default::default()
        };
        assert!(ThermalModel::from_exoplanet(&planet).is_none());
    }
}
