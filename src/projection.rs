//! Equirectangular raster to unit-sphere mapping.
//!
//! Column `j` of a `width`-wide grid maps to longitude `2π · j/(width-1)` and
//! row `i` maps to latitude `π · (i/(height-1) - 0.5)`. Row 0 is therefore the
//! south-pole band and the last row the north-pole band. Both end columns sit
//! on the same meridian and the pole rows collapse to a single point.

use std::f64::consts::PI;

use crate::error::TerrainError;
use crate::tilemap::Tilemap;

/// Unit vectors on the sphere, one per grid cell.
#[derive(Clone, Debug)]
pub struct SphereCoordinates {
    pub nx: Tilemap<f64>,
    pub ny: Tilemap<f64>,
    pub nz: Tilemap<f64>,
}

impl SphereCoordinates {
    /// Project a `width × height` grid onto the unit sphere.
    pub fn new(width: usize, height: usize) -> Result<Self, TerrainError> {
        if width < 2 || height < 2 {
            return Err(TerrainError::InvalidDimension { width, height });
        }

        let mut nx = Tilemap::new_with(width, height, 0.0f64);
        let mut ny = Tilemap::new_with(width, height, 0.0f64);
        let mut nz = Tilemap::new_with(width, height, 0.0f64);

        for y in 0..height {
            let lat = row_latitude(y, height);
            let (sin_lat, cos_lat) = lat.sin_cos();
            for x in 0..width {
                let lon = column_longitude(x, width);
                let (sin_lon, cos_lon) = lon.sin_cos();
                nx.set(x, y, cos_lat * cos_lon);
                ny.set(x, y, cos_lat * sin_lon);
                nz.set(x, y, sin_lat);
            }
        }

        Ok(Self { nx, ny, nz })
    }

    pub fn width(&self) -> usize {
        self.nx.width
    }

    pub fn height(&self) -> usize {
        self.nx.height
    }

    /// The unit vector of cell `(x, y)`.
    pub fn point(&self, x: usize, y: usize) -> [f64; 3] {
        [*self.nx.get(x, y), *self.ny.get(x, y), *self.nz.get(x, y)]
    }
}

/// Latitude in radians of row `y`, from `-π/2` (row 0) to `π/2`.
pub fn row_latitude(y: usize, height: usize) -> f64 {
    let v = y as f64 / (height - 1) as f64;
    (v - 0.5) * PI
}

/// Longitude in radians of column `x`, from `0` to `2π`.
pub fn column_longitude(x: usize, width: usize) -> f64 {
    let u = x as f64 / (width - 1) as f64;
    u * 2.0 * PI
}

/// Latitude and longitude grids in degrees (`-90..=90` by row,
/// `-180..=180` by column), as used by the climate post-processors.
pub fn lat_lon_degrees(width: usize, height: usize) -> (Tilemap<f32>, Tilemap<f32>) {
    let mut lat = Tilemap::new_with(width, height, 0.0f32);
    let mut lon = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        let lat_deg = linspace_at(-90.0, 90.0, y, height);
        for x in 0..width {
            lat.set(x, y, lat_deg as f32);
            lon.set(x, y, linspace_at(-180.0, 180.0, x, width) as f32);
        }
    }
    (lat, lon)
}

/// The `i`-th of `n` evenly spaced samples over `[start, end]`.
pub fn linspace_at(start: f64, end: f64, i: usize, n: usize) -> f64 {
    if n < 2 {
        return start;
    }
    start + (end - start) * i as f64 / (n - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, 2)]
    #[case(3, 7)]
    #[case(64, 32)]
    #[case(17, 129)]
    fn test_points_are_unit_vectors(#[case] width: usize, #[case] height: usize) {
        let coords = SphereCoordinates::new(width, height).unwrap();
        assert_eq!(coords.width(), width);
        assert_eq!(coords.height(), height);
        for y in 0..height {
            for x in 0..width {
                let [a, b, c] = coords.point(x, y);
                let len2 = a * a + b * b + c * c;
                assert!((len2 - 1.0).abs() < 1e-6, "cell ({x},{y}) has |n|^2 = {len2}");
            }
        }
    }

    #[rstest]
    #[case(1, 5)]
    #[case(5, 1)]
    #[case(0, 0)]
    fn test_degenerate_grid_rejected(#[case] width: usize, #[case] height: usize) {
        assert_eq!(
            SphereCoordinates::new(width, height).err(),
            Some(TerrainError::InvalidDimension { width, height })
        );
    }

    #[test]
    fn test_row_zero_is_south_pole() {
        let coords = SphereCoordinates::new(8, 5).unwrap();
        for x in 0..8 {
            assert!((*coords.nz.get(x, 0) + 1.0).abs() < 1e-12);
            assert!((*coords.nz.get(x, 4) - 1.0).abs() < 1e-12);
        }
        // Equator row lies in the xy-plane
        assert!(coords.nz.get(3, 2).abs() < 1e-12);
    }

    #[test]
    fn test_end_columns_share_meridian() {
        let coords = SphereCoordinates::new(9, 9).unwrap();
        for y in 0..9 {
            let a = coords.point(0, y);
            let b = coords.point(8, y);
            for k in 0..3 {
                assert!((a[k] - b[k]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_lat_lon_degrees_span() {
        let (lat, lon) = lat_lon_degrees(5, 3);
        assert_eq!(*lat.get(0, 0), -90.0);
        assert_eq!(*lat.get(0, 1), 0.0);
        assert_eq!(*lat.get(0, 2), 90.0);
        assert_eq!(*lon.get(0, 0), -180.0);
        assert_eq!(*lon.get(4, 0), 180.0);
    }
}
