//! Error types for generation, export and data retrieval.

use thiserror::Error;

/// Invalid generation configuration. Raised before any field is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("grid must be at least 2x2, got {width}x{height}")]
    InvalidDimension { width: usize, height: usize },
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidScale { name: &'static str, value: f64 },
    #[error("mountain_strength must be a non-negative finite number, got {0}")]
    InvalidStrength(f64),
}

/// Failures while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] TerrainError),
}

/// Failures while writing images, arrays or JSON sidecars.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to save image: {0}")]
    Image(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures talking to the exoplanet archive.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("archive returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not parse archive response: {0}")]
    Parse(String),
    #[error("no usable rows for planet {planet:?}")]
    NoRows { planet: String },
}
