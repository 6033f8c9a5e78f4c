use crate::error::{Result, TerrainError};

// Dense row-major grid of heights, addressed as (column, row)
// Linear index is `row * width + column`
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl HeightField {
    // Allocate a zeroed width×height field
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, 0.0)
    }

    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }

    // Wrap an existing row-major buffer (e.g. one read back from storage)
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        if data.len() != width * height {
            return Err(TerrainError::BufferLength {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    // A field always holds at least one cell
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        assert!(
            col < self.width && row < self.height,
            "cell ({col}, {row}) is outside a {}x{} height field",
            self.width,
            self.height
        );
        row * self.width + col
    }

    // Panics if (col, row) is out of range
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.data[self.index(col, row)]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: f32) {
        let i = self.index(col, row);
        self.data[i] = value;
    }

    #[inline]
    pub fn add(&mut self, col: usize, row: usize, delta: f32) {
        let i = self.index(col, row);
        self.data[i] += delta;
    }

    pub fn try_get(&self, col: usize, row: usize) -> Option<f32> {
        (col < self.width && row < self.height).then(|| self.data[row * self.width + col])
    }

    // Row-major view, ready for flat storage or image conversion
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.width)
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.data {
            *v *= factor;
        }
    }

    // Linearly remap the observed [min, max] onto [lo, hi]
    // A constant field (max <= min) is left untouched
    pub fn normalize(&mut self, lo: f32, hi: f32) {
        let (min, max) = self.min_max();
        if max <= min {
            log::debug!("normalize skipped: field is constant at {min}");
            return;
        }

        let delta = max - min;
        let range = hi - lo;
        for v in &mut self.data {
            *v = ((*v - min) / delta) * range + lo;
        }
    }

    // Bilinear sample at fractional grid coordinates, clamped to the field
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let fx = x.clamp(0.0, (self.width - 1) as f32);
        let fy = y.clamp(0.0, (self.height - 1) as f32);
        let xi = fx.floor() as usize;
        let yi = fy.floor() as usize;
        let xn = (xi + 1).min(self.width - 1);
        let yn = (yi + 1).min(self.height - 1);

        let tx = fx - xi as f32;
        let ty = fy - yi as f32;

        let a = self.get(xi, yi);
        let b = self.get(xn, yi);
        let c = self.get(xi, yn);
        let d = self.get(xn, yn);

        let ab = a * (1.0 - tx) + b * tx;
        let cd = c * (1.0 - tx) + d * tx;
        ab * (1.0 - ty) + cd * ty
    }
}

#[cfg(test)]
mod tests {
    use super::HeightField;

    #[test]
    fn set_then_get_every_cell() {
        let mut f = HeightField::new(5, 3).unwrap();
        for row in 0..3 {
            for col in 0..5 {
                f.set(col, row, (row * 10 + col) as f32);
            }
        }
        for row in 0..3 {
            for col in 0..5 {
                assert_eq!(f.get(col, row), (row * 10 + col) as f32);
            }
        }
        // Row-major layout
        assert_eq!(f.as_slice()[2 * 5 + 4], 24.0);
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(HeightField::new(0, 4).is_err());
        assert!(HeightField::new(4, 0).is_err());
        assert!(HeightField::from_vec(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    #[should_panic]
    fn out_of_range_access_panics() {
        let f = HeightField::new(4, 4).unwrap();
        let _ = f.get(4, 0);
    }

    #[test]
    fn try_get_guards_range() {
        let f = HeightField::filled(2, 2, 1.5).unwrap();
        assert_eq!(f.try_get(1, 1), Some(1.5));
        assert_eq!(f.try_get(2, 0), None);
    }

    #[test]
    fn normalize_hits_requested_bounds() {
        let data = vec![-3.0, 1.0, 4.0, 7.0, 2.5, 0.0];
        let mut f = HeightField::from_vec(3, 2, data).unwrap();
        f.normalize(10.0, 20.0);
        let (lo, hi) = f.min_max();
        assert!((lo - 10.0).abs() < 1e-5);
        assert!((hi - 20.0).abs() < 1e-5);
    }

    #[test]
    fn normalize_constant_field_is_noop() {
        let mut f = HeightField::filled(4, 4, 5.0).unwrap();
        f.normalize(0.0, 10.0);
        assert!(f.as_slice().iter().all(|&v| v == 5.0));
    }

    #[test]
    fn bilinear_sample_midpoint() {
        let f = HeightField::from_vec(2, 2, vec![0.0, 2.0, 4.0, 6.0]).unwrap();
        assert!((f.sample_bilinear(0.5, 0.5) - 3.0).abs() < 1e-6);
        assert_eq!(f.sample_bilinear(1.0, 0.0), 2.0);
        // Clamped outside the grid
        assert_eq!(f.sample_bilinear(-5.0, 9.0), 4.0);
    }
}
