//! Procedural exoplanet generation library
//!
//! Builds an equirectangular altitude map from seeded fractal noise sampled
//! on the unit sphere, then derives hydrosphere, climate, biome and
//! atmosphere layers and renders them. Binaries in `src/main.rs` and
//! `src/bin/` are thin drivers over these modules.

pub mod altitude;
pub mod atmosphere;
pub mod biomes;
pub mod climate;
pub mod config;
pub mod continents;
pub mod error;
pub mod exoplanet;
pub mod hydro;
pub mod mountains;
pub mod noise_field;
pub mod normalize;
pub mod projection;
pub mod render;
pub mod thermal;
pub mod tilemap;

pub use altitude::{generate_altitude_map, generate_terrain, AltitudeMap, TerrainLayers};
pub use config::{PlanetConfig, TerrainConstants};
pub use error::TerrainError;
pub use tilemap::Tilemap;
