/// A 2D tilemap grid with equirectangular projection (wraps horizontally).
///
/// Rows are latitude bands, columns are longitude bands. Row 0 is the
/// south-pole band; see [`crate::projection`].
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` if the length
    /// doesn't match `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Get the index into the data array, handling horizontal wrapping.
    fn index(&self, x: usize, y: usize) -> usize {
        let x = x % self.width; // Wrap horizontally
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the cells.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Build a new map of the same shape by transforming every cell.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Combine two maps of the same shape cell by cell.
    ///
    /// Panics if the shapes differ; every field of a generation run shares
    /// one grid shape.
    pub fn zip_map<U, V, F: FnMut(&T, &U) -> V>(&self, other: &Tilemap<U>, mut f: F) -> Tilemap<V> {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "tilemap shapes differ"
        );
        Tilemap {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }
}

impl Tilemap<f32> {
    /// Smallest and largest value in the map.
    pub fn min_max(&self) -> (f32, f32) {
        let mut min_v = f32::MAX;
        let mut max_v = f32::MIN;
        for &v in &self.data {
            if v < min_v { min_v = v; }
            if v > max_v { max_v = v; }
        }
        (min_v, max_v)
    }

    pub fn clamp_all(&mut self, lo: f32, hi: f32) {
        for v in &mut self.data {
            *v = v.clamp(lo, hi);
        }
    }

    /// Finite differences along rows and columns, numpy `gradient` style:
    /// central differences in the interior, one-sided at the edges.
    /// Returns `(d/drow, d/dcol)`.
    ///
    /// Columns are not wrapped here so results match the flat-array
    /// derivative the presentation layer expects.
    pub fn gradient(&self) -> (Tilemap<f32>, Tilemap<f32>) {
        let (w, h) = (self.width, self.height);
        let mut d_row = Tilemap::new_with(w, h, 0.0f32);
        let mut d_col = Tilemap::new_with(w, h, 0.0f32);

        for y in 0..h {
            for x in 0..w {
                let dy = if h < 2 {
                    0.0
                } else if y == 0 {
                    self.get(x, 1) - self.get(x, 0)
                } else if y == h - 1 {
                    self.get(x, h - 1) - self.get(x, h - 2)
                } else {
                    (self.get(x, y + 1) - self.get(x, y - 1)) * 0.5
                };

                let row = self.row(y);
                let dx = if w < 2 {
                    0.0
                } else if x == 0 {
                    row[1] - row[0]
                } else if x == w - 1 {
                    row[w - 1] - row[w - 2]
                } else {
                    (row[x + 1] - row[x - 1]) * 0.5
                };

                d_row.set(x, y, dy);
                d_col.set(x, y, dx);
            }
        }

        (d_row, d_col)
    }

    /// Separable gaussian blur with reflected borders, kernel truncated at 4 sigma.
    pub fn gaussian_blur(&self, sigma: f32) -> Tilemap<f32> {
        if sigma <= 0.0 {
            return self.clone();
        }

        let radius = (4.0 * sigma + 0.5) as isize;
        let mut kernel: Vec<f32> = (-radius..=radius)
            .map(|i| (-0.5 * (i as f32 / sigma).powi(2)).exp())
            .collect();
        let sum: f32 = kernel.iter().sum();
        for k in &mut kernel {
            *k /= sum;
        }

        let (w, h) = (self.width, self.height);
        let mut horizontal = Tilemap::new_with(w, h, 0.0f32);
        for y in 0..h {
            let row = self.row(y);
            for x in 0..w {
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = reflect_index(x as isize + k as isize - radius, w);
                    acc += row[sx] * weight;
                }
                horizontal.set(x, y, acc);
            }
        }

        let mut out = Tilemap::new_with(w, h, 0.0f32);
        for y in 0..h {
            for x in 0..w {
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = reflect_index(y as isize + k as isize - radius, h);
                    acc += horizontal.get(x, sy) * weight;
                }
                out.set(x, y, acc);
            }
        }

        out
    }
}

/// Half-sample symmetric reflection (`d c b a | a b c d | d c b a`).
fn reflect_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - 1 - i;
    }
    i as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_wrapping() {
        let mut map = Tilemap::new_with(4, 2, 0.0f32);
        map.set(0, 1, 7.0);
        assert_eq!(*map.get(4, 1), 7.0);
        assert_eq!(*map.get(5, 1), 0.0);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Tilemap::from_vec(3, 3, vec![0u8; 8]).is_none());
        assert!(Tilemap::from_vec(3, 3, vec![0u8; 9]).is_some());
    }

    #[test]
    fn test_gradient_matches_central_differences() {
        // Value = 2 * column + 10 * row
        let data: Vec<f32> = (0..12).map(|i| (2 * (i % 4) + 10 * (i / 4)) as f32).collect();
        let map = Tilemap::from_vec(4, 3, data).unwrap();
        let (d_row, d_col) = map.gradient();
        for (_, _, &v) in d_row.iter() {
            assert!((v - 10.0).abs() < 1e-6);
        }
        for (_, _, &v) in d_col.iter() {
            assert!((v - 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gaussian_blur_preserves_constant_field() {
        let map = Tilemap::new_with(9, 5, 3.5f32);
        let blurred = map.gaussian_blur(1.5);
        for (_, _, &v) in blurred.iter() {
            assert!((v - 3.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gaussian_blur_spreads_spike() {
        let mut map = Tilemap::new_with(11, 11, 0.0f32);
        map.set(5, 5, 1.0);
        let blurred = map.gaussian_blur(1.5);
        assert!(*blurred.get(5, 5) < 1.0);
        assert!(*blurred.get(6, 5) > 0.0);
        let total: f32 = blurred.values().iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
    }
}
