use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

use crate::height_field::HeightField;
use crate::metrics::ShadingParams;

// Lambertian hillshade with the light at 45° azimuth and altitude
// `z_scale` adjusts vertical exaggeration; border cells stay unlit
pub fn hillshade(field: &HeightField, z_scale: f32) -> HeightField {
    let (w, h) = field.dimensions();
    let mut shade = field.clone();
    shade.as_mut_slice().fill(0.0);

    let azimuth = std::f32::consts::FRAC_PI_4;
    let altitude = std::f32::consts::FRAC_PI_4;
    let (sin_alt, cos_alt) = altitude.sin_cos();
    let light = (azimuth.cos() * cos_alt, azimuth.sin() * cos_alt, sin_alt);

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            // central differences over the 3×3 neighbourhood
            let dzdx = (field.get(x + 1, y) - field.get(x - 1, y)) / 2.0 * z_scale;
            let dzdy = (field.get(x, y + 1) - field.get(x, y - 1)) / 2.0 * z_scale;
            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            let dot = (nx * light.0 + ny * light.1 + nz * light.2) / len;
            shade.set(x, y, dot.max(0.0));
        }
    }
    shade
}

// Water below the first texture band, then sand, grass, rock and snow at the
// texture blend heights, all expressed as fractions of the height range.
// Thresholds reaching past max_height (the 64..256 defaults on a low tile)
// are scaled down so the topmost one lands on max_height.
fn height_gradient(shading: &ShadingParams) -> Gradient<LinSrgb> {
    let [h0, h1, h2, h3] = shading.texture_heights.as_array();
    let range = shading.max_height - shading.min_height;
    let span = (h3 - shading.min_height).max(range);
    let mut last = 0.0f32;
    let mut stop = |h: f32| {
        let t = if span > 0.0 {
            ((h - shading.min_height) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        last = t.max(last);
        last
    };

    Gradient::with_domain(vec![
        (0.0, LinSrgb::new(0.0, 0.0, 0.5)),     // deep blue
        (stop(h0), LinSrgb::new(0.8, 0.8, 0.5)), // sand
        (stop(h1), LinSrgb::new(0.1, 0.6, 0.2)), // green
        (stop(h2), LinSrgb::new(0.5, 0.4, 0.3)), // rock
        (stop(h3), LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ])
}

// Colour a height field for inspection.
// Heights are placed on a gradient keyed to the shading's texture heights,
// then darkened by a hillshade.
pub fn render_preview(field: &HeightField, shading: &ShadingParams) -> RgbImage {
    let (w, h) = field.dimensions();
    let gradient = height_gradient(shading);
    let shade = hillshade(field, 1.0);
    let range = shading.max_height - shading.min_height;

    let mut img = RgbImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let norm = if range > 0.0 {
                ((field.get(x, y) - shading.min_height) / range).clamp(0.0, 1.0)
            } else {
                0.5
            };
            let col: LinSrgb = gradient.get(norm);
            let rgb = col.into_format::<u8>();
            let light = (shade.get(x, y) * 0.5 + 0.5).clamp(0.0, 1.0);
            img.put_pixel(
                x as u32,
                y as u32,
                Rgb([
                    (rgb.red as f32 * light) as u8,
                    (rgb.green as f32 * light) as u8,
                    (rgb.blue as f32 * light) as u8,
                ]),
            );
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TerrainMetrics;

    #[test]
    fn image_matches_field_size() {
        let field = HeightField::filled(12, 7, 30.0).unwrap();
        let img = render_preview(&field, &TerrainMetrics::square(12, 0.0, 256.0).shading());
        assert_eq!(img.dimensions(), (12, 7));
    }

    #[test]
    fn flat_field_is_evenly_lit() {
        let field = HeightField::filled(5, 5, 10.0).unwrap();
        let shade = hillshade(&field, 1.0);
        let inner = shade.get(2, 2);
        assert!((inner - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert_eq!(shade.get(0, 0), 0.0);
    }

    #[test]
    fn low_ground_is_blue_high_ground_is_bright() {
        let mut field = HeightField::new(3, 1).unwrap();
        field.set(2, 0, 256.0);
        let img = render_preview(&field, &TerrainMetrics::square(3, 0.0, 256.0).shading());
        let low = img.get_pixel(0, 0);
        let high = img.get_pixel(2, 0);
        assert!(low[2] > low[0]);
        assert!(high[0] > 100 && high[1] > 100 && high[2] > 100);
    }

    #[test]
    fn low_tile_still_gets_every_band() {
        let gradient = height_gradient(&TerrainMetrics::square(8, 0.0, 32.0).shading());
        let green: LinSrgb = gradient.get(0.5);
        assert!(green.green > green.red && green.green > green.blue);
        let snow: LinSrgb = gradient.get(1.0);
        assert!(snow.red > 0.99 && snow.green > 0.99 && snow.blue > 0.99);
    }

    #[test]
    fn thresholds_inside_range_are_kept() {
        let gradient = height_gradient(&TerrainMetrics::square(8, 0.0, 512.0).shading());
        // 128 of 512 is the green stop
        let green: LinSrgb = gradient.get(0.25);
        assert!((green.green - 0.6).abs() < 1e-5);
    }
}
