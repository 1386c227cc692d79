//! Min-max normalization shared by every stage of the pipeline.

use tracing::warn;

use crate::tilemap::Tilemap;

/// Output of [`min_max_normalize`].
#[derive(Clone, Debug)]
pub struct Normalized {
    /// Values rescaled to `[0, 1]`
    pub field: Tilemap<f32>,
    /// Set when the input had zero range and was replaced by all zeros
    pub degenerate: bool,
}

/// Rescale a field so its minimum maps to 0 and its maximum to 1.
///
/// A zero-range (uniform) or non-finite-range field normalizes to all
/// zeros with `degenerate` set, so no NaN leaves this function.
pub fn min_max_normalize(field: &Tilemap<f32>) -> Normalized {
    let (min_v, max_v) = field.min_max();
    let range = max_v - min_v;

    if !(range.is_finite() && range > 0.0) {
        warn!(min = min_v, max = max_v, "zero-range field, substituting zeros");
        return Normalized {
            field: Tilemap::new_with(field.width, field.height, 0.0),
            degenerate: true,
        };
    }

    Normalized {
        field: field.map(|&v| ((v - min_v) / range).clamp(0.0, 1.0)),
        degenerate: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hits_both_ends() {
        let map = Tilemap::from_vec(3, 2, vec![-2.0, 0.0, 2.0, 1.0, -1.0, 0.5]).unwrap();
        let out = min_max_normalize(&map);
        assert!(!out.degenerate);
        let (lo, hi) = out.field.min_max();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
        assert!((*out.field.get(1, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_field_becomes_zeros() {
        let map = Tilemap::new_with(4, 4, 0.37f32);
        let out = min_max_normalize(&map);
        assert!(out.degenerate);
        assert!(out.field.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_infinite_range_does_not_produce_nan() {
        let map = Tilemap::from_vec(2, 1, vec![f32::MIN, f32::MAX]).unwrap();
        let out = min_max_normalize(&map);
        assert!(out.field.values().iter().all(|v| v.is_finite()));
    }
}
