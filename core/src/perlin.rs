use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::random::{random_float, wrap_next};

// Parameters of one noise pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerlinParams {
    pub octaves: u32, // number of frequency bands blended
    pub bias: f32,    // each octave's weight is the previous one divided by this
    pub regenerate_seed: bool,
}

impl PerlinParams {
    // Width-independent checks; the octave ceiling depends on the grid
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 {
            return Err(TerrainError::InvalidMetrics(
                "at least one octave is required".into(),
            ));
        }
        if !self.bias.is_finite() || self.bias <= 0.0 {
            return Err(TerrainError::InvalidBias(self.bias));
        }
        Ok(())
    }
}

impl Default for PerlinParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            bias: 2.0,
            regenerate_seed: true,
        }
    }
}

// Uniform random grid the octaves are sampled from
#[derive(Debug, Clone)]
struct SeedField {
    values: HeightField,
}

impl SeedField {
    fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            values: HeightField::new(width, height)?,
        })
    }

    // Overwrite every cell with a fresh value in [0, 1)
    fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for v in self.values.as_mut_slice() {
            *v = random_float(rng);
        }
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> f32 {
        self.values.get(x, y)
    }
}

// Multi-octave value noise over a seed field, blended with bilinear interpolation
#[derive(Debug)]
pub struct PerlinNoise {
    width: usize,
    height: usize,
    seed: SeedField,
    seeded: bool,
    // Raw [0, 1) output of the last generate(), kept for dumps
    noise: Option<HeightField>,
}

impl PerlinNoise {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::check_size(width, height)?;
        Ok(Self {
            width,
            height,
            seed: SeedField::new(width, height)?,
            seeded: false,
            noise: None,
        })
    }

    fn check_size(width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        // The coarsest octave's pitch is the full width; halving must stay exact
        if !width.is_power_of_two() {
            return Err(TerrainError::WidthNotPowerOfTwo(width));
        }
        Ok(())
    }

    // Change the grid size. The seed field is reallocated and must be regenerated.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        Self::check_size(width, height)?;
        self.width = width;
        self.height = height;
        self.seed = SeedField::new(width, height)?;
        self.seeded = false;
        self.noise = None;
        Ok(())
    }

    pub fn regenerate_seed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seed.regenerate(rng);
        self.seeded = true;
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    // Largest octave count whose pitch stays >= 1
    pub fn octave_limit(&self) -> u32 {
        self.width.trailing_zeros() + 1
    }

    pub fn is_generated(&self) -> bool {
        self.noise.is_some()
    }

    pub fn noise_map(&self) -> Option<&HeightField> {
        self.noise.as_ref()
    }

    pub(crate) fn check_params(&self, octaves: u32, bias: f32) -> Result<()> {
        let max = self.octave_limit();
        if octaves == 0 || octaves > max {
            return Err(TerrainError::InvalidOctaves {
                octaves,
                max,
                width: self.width,
            });
        }
        if !bias.is_finite() || bias <= 0.0 {
            return Err(TerrainError::InvalidBias(bias));
        }
        Ok(())
    }

    // Weighted average of `octaves` bilinear resamples of the seed field
    // Every cell lies within the seed field's [min, max]
    pub fn synthesize(&self, octaves: u32, bias: f32) -> Result<HeightField> {
        self.check_params(octaves, bias)?;
        let (w, h) = (self.width, self.height);
        let mut out = HeightField::new(w, h)?;

        for y in 0..h {
            for x in 0..w {
                let mut noise = 0.0f32;
                let mut scale_acc = 0.0f32;
                let mut scale = 1.0f32;

                for oc in 0..octaves {
                    let pitch = w >> oc;
                    let sx1 = (x / pitch) * pitch;
                    let sy1 = (y / pitch) * pitch;
                    let sx2 = wrap_next(sx1, pitch, w);
                    let sy2 = wrap_next(sy1, pitch, h);

                    let blend_x = (x - sx1) as f32 / pitch as f32;
                    let blend_y = (y - sy1) as f32 / pitch as f32;

                    let top = (1.0 - blend_x) * self.seed.at(sx1, sy1)
                        + blend_x * self.seed.at(sx2, sy1);
                    let bottom = (1.0 - blend_x) * self.seed.at(sx1, sy2)
                        + blend_x * self.seed.at(sx2, sy2);

                    scale_acc += scale;
                    noise += (blend_y * (bottom - top) + top) * scale;
                    scale /= bias;
                }

                out.set(x, y, noise / scale_acc);
            }
        }
        Ok(out)
    }

    // Fill `field` with noise scaled by `max_height`
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        field: &mut HeightField,
        params: &PerlinParams,
        max_height: f32,
        rng: &mut R,
    ) -> Result<()> {
        if field.dimensions() != (self.width, self.height) {
            return Err(TerrainError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: field.dimensions(),
            });
        }
        self.check_params(params.octaves, params.bias)?;
        if params.regenerate_seed || !self.seeded {
            self.regenerate_seed(rng);
        }

        let noise = self.synthesize(params.octaves, params.bias)?;
        for (dst, &src) in field.as_mut_slice().iter_mut().zip(noise.as_slice()) {
            *dst = src * max_height;
        }
        log::debug!(
            "perlin: {}x{} field, {} octaves, bias {}",
            self.width,
            self.height,
            params.octaves,
            params.bias
        );
        self.noise = Some(noise);
        Ok(())
    }
}
