use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::random::{next_power_of_two, random_float_range, wrap_next};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidpointParams {
    pub roughness: f32, // displacement shrinks by 2^-roughness per level
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for MidpointParams {
    fn default() -> Self {
        Self {
            roughness: 1.0,
            min_height: 0.0,
            max_height: 256.0,
        }
    }
}

// Diamond–square refinement on a wrapping grid
#[derive(Debug, Clone)]
pub struct MidpointDisplacement {
    params: MidpointParams,
}

impl MidpointParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_height <= self.max_height) {
            return Err(TerrainError::InvalidHeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if !self.roughness.is_finite() {
            return Err(TerrainError::InvalidMetrics(format!(
                "roughness must be finite, got {}",
                self.roughness
            )));
        }
        Ok(())
    }
}

impl MidpointDisplacement {
    pub fn new(params: MidpointParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &MidpointParams {
        &self.params
    }

    // Refine at halving block sizes, then normalize into the height range
    pub fn run<R: Rng + ?Sized>(&self, field: &mut HeightField, rng: &mut R) {
        let mut rect_size = next_power_of_two(field.width());
        // Amplitude of the random offset, shrinking every level
        let mut cur_height = rect_size as f32 / 2.0;
        let height_reduce = 2.0f32.powf(-self.params.roughness);

        while rect_size > 0 {
            log::trace!("midpoint: rect {rect_size}, amplitude {cur_height}");
            diamond_step(field, rect_size, cur_height, rng);
            square_step(field, rect_size, cur_height, rng);

            rect_size /= 2;
            cur_height *= height_reduce;
        }

        field.normalize(self.params.min_height, self.params.max_height);
    }
}

// Offset in [-amplitude, amplitude]; a vanished amplitude adds nothing
#[inline]
fn displacement<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    if amplitude == 0.0 {
        return 0.0;
    }
    random_float_range(rng, -amplitude, amplitude)
}

// Square centres from the average of their four corners
pub fn diamond_step<R: Rng + ?Sized>(
    field: &mut HeightField,
    rect_size: usize,
    cur_height: f32,
    rng: &mut R,
) {
    let (w, h) = field.dimensions();
    let half = rect_size / 2;

    for y in (0..h).step_by(rect_size) {
        for x in (0..w).step_by(rect_size) {
            let next_x = wrap_next(x, rect_size, w);
            let next_y = wrap_next(y, rect_size, h);

            let top_left = field.get(x, y);
            let top_right = field.get(next_x, y);
            let bottom_left = field.get(x, next_y);
            let bottom_right = field.get(next_x, next_y);

            let mid_x = (x + half) % w;
            let mid_y = (y + half) % h;

            let avg = (top_left + top_right + bottom_left + bottom_right) / 4.0;
            field.set(mid_x, mid_y, avg + displacement(rng, cur_height));
        }
    }
}

// Edge midpoints from the average of their diamond neighbours
pub fn square_step<R: Rng + ?Sized>(
    field: &mut HeightField,
    rect_size: usize,
    cur_height: f32,
    rng: &mut R,
) {
    let (w, h) = field.dimensions();
    let half = rect_size / 2;

    for y in (0..h).step_by(rect_size) {
        for x in (0..w).step_by(rect_size) {
            let next_x = wrap_next(x, rect_size, w);
            let next_y = wrap_next(y, rect_size, h);

            let mid_x = (x + half) % w;
            let mid_y = (y + half) % h;

            // Centres of the squares to the left and above, wrapping around
            let prev_mid_x = (x + w - half % w) % w;
            let prev_mid_y = (y + h - half % h) % h;

            let top_left = field.get(x, y);
            let top_right = field.get(next_x, y);
            let bottom_left = field.get(x, next_y);
            let center = field.get(mid_x, mid_y);
            let prev_y_center = field.get(mid_x, prev_mid_y);
            let prev_x_center = field.get(prev_mid_x, mid_y);

            let left_mid = (top_left + center + bottom_left + prev_x_center) / 4.0
                + displacement(rng, cur_height);
            let top_mid = (top_left + center + top_right + prev_y_center) / 4.0
                + displacement(rng, cur_height);

            field.set(mid_x, y, top_mid);
            field.set(x, mid_y, left_mid);
        }
    }
}
