use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;

// Draws for a distinct second point before falling back to a neighbour
const MAX_POINT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultFormationParams {
    pub iterations: u32, // one fault line per iteration
    pub min_height: f32,
    pub max_height: f32,
    pub filter: f32, // FIR blend constant in [0, 1); closer to 1 smooths more
}

impl Default for FaultFormationParams {
    fn default() -> Self {
        Self {
            iterations: 200,
            min_height: 0.0,
            max_height: 256.0,
            filter: 0.5,
        }
    }
}

// Raises one side of random fault lines, then erodes the ridges with a
// four-way exponential filter and normalizes into [min_height, max_height]
#[derive(Debug, Clone)]
pub struct FaultFormation {
    params: FaultFormationParams,
}

impl FaultFormationParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_height <= self.max_height) {
            return Err(TerrainError::InvalidHeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if !(0.0..1.0).contains(&self.filter) {
            return Err(TerrainError::InvalidFilter(self.filter));
        }
        Ok(())
    }
}

impl FaultFormation {
    pub fn new(params: FaultFormationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FaultFormationParams {
        &self.params
    }

    // Faults, filter, normalize. `field` should already hold a base surface.
    pub fn run<R: Rng + ?Sized>(&self, field: &mut HeightField, rng: &mut R) {
        log::debug!("fault formation: faulting, {} iterations", self.params.iterations);
        self.apply_faults(field, rng);
        log::debug!("fault formation: filtering, FIR {}", self.params.filter);
        self.apply_fir_filter(field);
        field.normalize(self.params.min_height, self.params.max_height);
        log::debug!("fault formation: normalized");
    }

    pub fn apply_faults<R: Rng + ?Sized>(&self, field: &mut HeightField, rng: &mut R) {
        let FaultFormationParams {
            iterations,
            min_height,
            max_height,
            ..
        } = self.params;
        let (w, h) = field.dimensions();
        let delta_height = max_height - min_height;

        for it in 0..iterations {
            // Fault strength decays linearly from max_height towards min_height
            let ratio = it as f32 / iterations as f32;
            let raise = max_height - ratio * delta_height;

            let Some((p1, p2)) = pick_fault_points(w, h, rng) else {
                log::warn!("fault formation: {w}x{h} field has no distinct point pair, skipping");
                return;
            };
            let dir_x = p2.0 - p1.0;
            let dir_z = p2.1 - p1.1;

            for z in 0..h {
                for x in 0..w {
                    let in_x = x as i64 - p1.0;
                    let in_z = z as i64 - p1.1;
                    // Sign of the 2D cross product picks the side of the line
                    if in_x * dir_z - dir_x * in_z > 0 {
                        field.add(x, z, raise);
                    }
                }
            }
        }
    }

    // Exponential smoothing swept along each axis in both directions
    pub fn apply_fir_filter(&self, field: &mut HeightField) {
        let fir = self.params.filter;
        let (w, h) = field.dimensions();

        // left to right
        for z in 0..h {
            let mut prev = field.get(0, z);
            for x in 1..w {
                prev = filter_point(field, x, z, prev, fir);
            }
        }

        // right to left
        for z in 0..h {
            let mut prev = field.get(w - 1, z);
            for x in (0..w - 1).rev() {
                prev = filter_point(field, x, z, prev, fir);
            }
        }

        // top to bottom
        for x in 0..w {
            let mut prev = field.get(x, 0);
            for z in 1..h {
                prev = filter_point(field, x, z, prev, fir);
            }
        }

        // bottom to top
        for x in 0..w {
            let mut prev = field.get(x, h - 1);
            for z in (0..h - 1).rev() {
                prev = filter_point(field, x, z, prev, fir);
            }
        }
    }
}

#[inline]
fn filter_point(field: &mut HeightField, x: usize, z: usize, prev: f32, fir: f32) -> f32 {
    let new = fir * prev + (1.0 - fir) * field.get(x, z);
    field.set(x, z, new);
    new
}

// Two distinct grid points defining a fault line, or None for a 1x1 grid
pub fn pick_fault_points<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    rng: &mut R,
) -> Option<((i64, i64), (i64, i64))> {
    if width * height < 2 {
        return None;
    }
    let point = |rng: &mut R| {
        (
            rng.random_range(0..width) as i64,
            rng.random_range(0..height) as i64,
        )
    };

    let p1 = point(rng);
    for _ in 0..MAX_POINT_ATTEMPTS {
        let p2 = point(rng);
        if p2 != p1 {
            return Some((p1, p2));
        }
    }

    // Out of attempts: step to a neighbour along whichever axis has room
    let p2 = if width > 1 {
        ((p1.0 + 1) % width as i64, p1.1)
    } else {
        (p1.0, (p1.1 + 1) % height as i64)
    };
    Some((p1, p2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::terrain_rng;
    use rand::RngCore;

    fn params(iterations: u32) -> FaultFormationParams {
        FaultFormationParams {
            iterations,
            min_height: 0.0,
            max_height: 100.0,
            filter: 0.5,
        }
    }

    fn ramp(w: usize, h: usize) -> HeightField {
        let data = (0..w * h).map(|i| (i % 7) as f32).collect();
        HeightField::from_vec(w, h, data).unwrap()
    }

    #[test]
    fn rejects_bad_params() {
        let mut p = params(10);
        p.filter = 1.0;
        assert!(matches!(
            FaultFormation::new(p),
            Err(TerrainError::InvalidFilter(_))
        ));
        p = params(10);
        p.min_height = 200.0;
        assert!(FaultFormation::new(p).is_err());
    }

    #[test]
    fn result_stays_in_height_range() {
        let ff = FaultFormation::new(params(50)).unwrap();
        let mut field = ramp(32, 32);
        ff.run(&mut field, &mut terrain_rng(Some(99)));
        let (lo, hi) = field.min_max();
        assert!((lo - 0.0).abs() < 1e-3, "min {lo}");
        assert!((hi - 100.0).abs() < 1e-3, "max {hi}");
        assert!(field.as_slice().iter().all(|&v| (-1e-3..=100.001).contains(&v)));
    }

    #[test]
    fn zero_iterations_only_filters_and_normalizes() {
        let ff = FaultFormation::new(params(0)).unwrap();
        let mut faulted = ramp(16, 16);
        ff.run(&mut faulted, &mut terrain_rng(Some(1)));

        let mut baseline = ramp(16, 16);
        ff.apply_fir_filter(&mut baseline);
        baseline.normalize(0.0, 100.0);

        assert_eq!(faulted, baseline);
    }

    #[test]
    fn a_fault_raises_exactly_one_side() {
        let ff = FaultFormation::new(FaultFormationParams {
            iterations: 1,
            min_height: 0.0,
            max_height: 10.0,
            filter: 0.0,
        })
        .unwrap();
        let mut field = HeightField::new(8, 8).unwrap();
        ff.apply_faults(&mut field, &mut terrain_rng(Some(4)));
        // First iteration raises by max_height; cells on the line stay put
        assert!(field.as_slice().iter().all(|&v| v == 0.0 || v == 10.0));
        assert!(field.as_slice().iter().any(|&v| v == 0.0));
    }

    #[test]
    fn zero_filter_leaves_field_alone() {
        let ff = FaultFormation::new(FaultFormationParams {
            filter: 0.0,
            ..params(0)
        })
        .unwrap();
        let mut field = ramp(9, 5);
        let before = field.clone();
        ff.apply_fir_filter(&mut field);
        assert_eq!(field, before);
    }

    #[test]
    fn filter_flattens_a_spike() {
        let ff = FaultFormation::new(FaultFormationParams {
            filter: 0.8,
            ..params(0)
        })
        .unwrap();
        let mut field = HeightField::new(9, 9).unwrap();
        field.set(4, 4, 100.0);
        ff.apply_fir_filter(&mut field);
        assert!(field.get(4, 4) < 100.0);
        assert!(field.get(5, 4) > 0.0);
    }

    #[test]
    fn fault_points_are_distinct() {
        let mut rng = terrain_rng(Some(12));
        for _ in 0..200 {
            let (p1, p2) = pick_fault_points(4, 3, &mut rng).unwrap();
            assert_ne!(p1, p2);
            assert!((0..4).contains(&p1.0) && (0..3).contains(&p1.1));
            assert!((0..4).contains(&p2.0) && (0..3).contains(&p2.1));
        }
        assert!(pick_fault_points(1, 1, &mut rng).is_none());
    }

    // Always yields the same number, so rejection sampling never succeeds
    struct Stuck;

    impl RngCore for Stuck {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn stuck_random_source_still_terminates() {
        let (p1, p2) = pick_fault_points(1, 6, &mut Stuck).unwrap();
        assert_ne!(p1, p2);
        assert_eq!(p2, (0, 1));
    }
}
