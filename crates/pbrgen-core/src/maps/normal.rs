//! Normal map generator.

use image::{Rgb, RgbImage};

use crate::color::rgb_to_luma;
use crate::convolve::sobel_gradients;
use crate::field::IntensityField;

/// Encoded color of the straight-out normal `(0, 0, 1)`.
pub const FLAT_NORMAL_RGB: [u8; 3] = [127, 127, 255];

/// Normal map generator.
///
/// Luminance gradients from the Sobel pair become the x and y components; z
/// is a constant bias equal to the 8-bit intensity range. Tangent-space
/// layout: R = x, G = y, B = z.
#[derive(Debug, Clone)]
pub struct NormalGenerator {
    /// Constant z component before normalization.
    pub z_bias: f32,
}

impl NormalGenerator {
    /// Create a new normal generator.
    pub fn new() -> Self {
        Self { z_bias: 255.0 }
    }

    /// Generate a normal map from an RGB image.
    pub fn generate(&self, image: &RgbImage) -> RgbImage {
        let luma = IntensityField::from_gray_image(&rgb_to_luma(image));
        self.generate_from_field(&luma)
    }

    /// Generate a normal map from a luminance field.
    pub fn generate_from_field(&self, luma: &IntensityField) -> RgbImage {
        let (dx, dy) = sobel_gradients(luma);

        RgbImage::from_fn(luma.width, luma.height, |x, y| {
            Rgb(encode_normal(self.unit_normal(dx.get(x, y), dy.get(x, y))))
        })
    }

    /// Unit normal for one gradient sample.
    ///
    /// A zero or non-finite magnitude falls back to `(0, 0, 1)`.
    fn unit_normal(&self, gx: f32, gy: f32) -> [f32; 3] {
        let nz = self.z_bias;
        let len = (gx * gx + gy * gy + nz * nz).sqrt();
        if len == 0.0 || !len.is_finite() {
            return [0.0, 0.0, 1.0];
        }
        [gx / len, gy / len, nz / len]
    }
}

impl Default for NormalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map `[-1, 1]` components to bytes via `(v + 1) * 127.5`, truncating.
#[inline]
fn encode_normal(n: [f32; 3]) -> [u8; 3] {
    n.map(|v| ((v + 1.0) * 127.5).clamp(0.0, 255.0) as u8)
}

/// Generate a normal map with default settings.
pub fn generate_normal(image: &RgbImage) -> RgbImage {
    NormalGenerator::new().generate(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(c: u8) -> f32 {
        2.0 * f32::from(c) / 255.0 - 1.0
    }

    #[test]
    fn flat_input_gives_straight_out_normal() {
        let img = RgbImage::from_pixel(32, 16, Rgb([200, 40, 90]));
        let normal = generate_normal(&img);
        assert_eq!(normal.dimensions(), (32, 16));
        assert!(normal.pixels().all(|p| p.0 == FLAT_NORMAL_RGB));
    }

    #[test]
    fn normals_are_unit_length() {
        let img = RgbImage::from_fn(24, 24, |x, y| {
            let v = ((x * 37 + y * 11) % 256) as u8;
            Rgb([v, v.wrapping_mul(3), 255 - v])
        });
        let normal = generate_normal(&img);
        for p in normal.pixels() {
            let [r, g, b] = p.0;
            let len2 = decode(r).powi(2) + decode(g).powi(2) + decode(b).powi(2);
            assert!((len2 - 1.0).abs() < 0.05, "length^2 {len2} for {:?}", p.0);
        }
    }

    #[test]
    fn rightward_brightening_tilts_red_up() {
        let img = RgbImage::from_fn(16, 16, |x, _| {
            let v = (x * 16) as u8;
            Rgb([v, v, v])
        });
        let normal = generate_normal(&img);
        let c = normal.get_pixel(8, 8).0;
        assert!(c[0] > 127, "red should exceed flat, got {}", c[0]);
        assert_eq!(c[1], 127);
    }

    #[test]
    fn downward_brightening_tilts_green_up() {
        let img = RgbImage::from_fn(16, 16, |_, y| {
            let v = (y * 16) as u8;
            Rgb([v, v, v])
        });
        let c = generate_normal(&img).get_pixel(8, 8).0;
        assert_eq!(c[0], 127);
        assert!(c[1] > 127);
    }

    #[test]
    fn degenerate_bias_falls_back_to_straight_out() {
        let generator = NormalGenerator { z_bias: 0.0 };
        let field = IntensityField::new(3, 3, 10.0);
        let normal = generator.generate_from_field(&field);
        assert!(normal.pixels().all(|p| p.0 == FLAT_NORMAL_RGB));
    }
}
