//! Coherent noise sampling over sphere coordinates.

use noise::{NoiseFn, Simplex};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::projection::SphereCoordinates;
use crate::tilemap::Tilemap;

/// A 3D coherent-noise source with fractal layering.
///
/// Output is approximately in `[-1, 1]`. Implementations must be pure:
/// the same arguments always give the same value.
pub trait CoherentNoise: Send + Sync {
    fn noise3(&self, x: f64, y: f64, z: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64;
}

/// Fractal Brownian motion over 3D simplex noise.
pub struct SimplexFbm {
    source: Simplex,
}

impl SimplexFbm {
    pub fn new() -> Self {
        // The run seed is applied as a coordinate offset, so the permutation
        // table stays fixed.
        Self { source: Simplex::new(0) }
    }
}

impl Default for SimplexFbm {
    fn default() -> Self {
        Self::new()
    }
}

impl CoherentNoise for SimplexFbm {
    fn noise3(&self, x: f64, y: f64, z: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += amplitude * self.source.get([x * frequency, y * frequency, z * frequency]);
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }
}

/// Parameters that produced a [`NoiseField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Added to the scaled x, y and z coordinates (folded seed plus any
    /// stage offset, see [`crate::config::fold_seed`])
    pub seed_offset: [f64; 3],
    /// Multiplier applied to the unit-sphere coordinates
    pub frequency: f64,
    pub octaves: u32,
    pub persistence: f64,
    pub lacunarity: f64,
}

/// Raw noise values over the grid, tagged with their parameters.
#[derive(Clone, Debug)]
pub struct NoiseField {
    pub values: Tilemap<f32>,
    pub params: NoiseParams,
}

/// Evaluate `noise` at `n * frequency + seed_offset` for every cell.
///
/// Rows are sampled in parallel; each cell depends only on its own
/// coordinate so the result does not depend on scheduling.
pub fn sample_noise_field<N: CoherentNoise + ?Sized>(
    coords: &SphereCoordinates,
    params: &NoiseParams,
    noise: &N,
) -> NoiseField {
    let width = coords.width();
    let height = coords.height();
    let mut values = Tilemap::new_with(width, height, 0.0f32);

    values.values_mut().par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            let [px, py, pz] = coords.point(x, y);
            let value = noise.noise3(
                px * params.frequency + params.seed_offset[0],
                py * params.frequency + params.seed_offset[1],
                pz * params.frequency + params.seed_offset[2],
                params.octaves,
                params.persistence,
                params.lacunarity,
            );
            *cell = value as f32;
        }
    });

    NoiseField {
        values,
        params: params.clone(),
    }
}

/// Noise source returning the same value everywhere. Useful for exercising
/// the degenerate-field paths.
pub struct ConstantNoise(pub f64);

impl CoherentNoise for ConstantNoise {
    fn noise3(&self, _x: f64, _y: f64, _z: f64, _octaves: u32, _p: f64, _l: f64) -> f64 {
        self.0
    }
}
