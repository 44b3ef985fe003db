//! Color-space conversions used by the map generators.
//!
//! Luminance uses ITU-R BT.601 weights (`0.299 R + 0.587 G + 0.114 B`),
//! rounded to the nearest 8-bit value. Two fixed-point precisions exist
//! because the normal and roughness maps are calibrated against different
//! 8-bit conversions; see [`LumaPrecision`]. HSV follows the 8-bit convention where
//! hue is stored as degrees / 2 so it fits a byte (`0..=180`).

use image::{GrayImage, Luma, RgbImage};

/// 8-bit HSV pixel: hue in `0..=180` (degrees / 2), saturation and value in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv8 {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// An image in 8-bit HSV representation (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Hsv8>,
}

impl HsvImage {
    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Hsv8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Fixed-point precision of the BT.601 weights.
///
/// Both round to nearest and map gray to itself, but they disagree by one
/// level on some colors (e.g. `(1, 215, 0)` is 127 in `Q16`, 126 in `Q14`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LumaPrecision {
    /// 16 fractional bits: weights 19595 / 38470 / 7471.
    #[default]
    Q16,
    /// 14 fractional bits: weights 4899 / 9617 / 1868.
    Q14,
}

/// BT.601 luma of one pixel at the given precision, rounded to nearest.
#[inline]
pub fn luma8_with(precision: LumaPrecision, r: u8, g: u8, b: u8) -> u8 {
    let (r, g, b) = (u32::from(r), u32::from(g), u32::from(b));
    let y = match precision {
        LumaPrecision::Q16 => (r * 19595 + g * 38470 + b * 7471 + (1 << 15)) >> 16,
        LumaPrecision::Q14 => (r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14,
    };
    y as u8
}

/// Convert an RGB image to single-channel luminance at 16-bit precision.
pub fn rgb_to_luma(img: &RgbImage) -> GrayImage {
    rgb_to_luma_with(img, LumaPrecision::Q16)
}

/// Convert an RGB image to single-channel luminance at the given precision.
pub fn rgb_to_luma_with(img: &RgbImage, precision: LumaPrecision) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b] = img.get_pixel(x, y).0;
        Luma([luma8_with(precision, r, g, b)])
    })
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn hsv8(r: u8, g: u8, b: u8) -> Hsv8 {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max > 0.0 { 255.0 * delta / max } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    Hsv8 {
        h: (h / 2.0).round().clamp(0.0, 180.0) as u8,
        s: s.round().clamp(0.0, 255.0) as u8,
        v: max as u8,
    }
}

/// Convert an RGB image to 8-bit HSV.
pub fn rgb_to_hsv(img: &RgbImage) -> HsvImage {
    let data = img
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            hsv8(r, g, b)
        })
        .collect();
    HsvImage {
        width: img.width(),
        height: img.height(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_of_gray_is_identity() {
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            assert_eq!(luma8_with(LumaPrecision::Q16, v, v, v), v);
        }
    }

    #[test]
    fn luma_weights_primaries() {
        assert_eq!(luma8_with(LumaPrecision::Q16, 255, 0, 0), 76);
        assert_eq!(luma8_with(LumaPrecision::Q16, 0, 255, 0), 150);
        assert_eq!(luma8_with(LumaPrecision::Q16, 0, 0, 255), 29);
    }

    #[test]
    fn q14_luma_keeps_gray_and_primaries() {
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            assert_eq!(luma8_with(LumaPrecision::Q14, v, v, v), v);
        }
        assert_eq!(luma8_with(LumaPrecision::Q14, 255, 0, 0), 76);
        assert_eq!(luma8_with(LumaPrecision::Q14, 0, 255, 0), 150);
        assert_eq!(luma8_with(LumaPrecision::Q14, 0, 0, 255), 29);
    }

    #[test]
    fn precisions_round_differently_on_some_colors() {
        assert_eq!(luma8_with(LumaPrecision::Q16, 1, 215, 0), 127);
        assert_eq!(luma8_with(LumaPrecision::Q14, 1, 215, 0), 126);
        assert_eq!(luma8_with(LumaPrecision::Q16, 25, 75, 0), 52);
        assert_eq!(luma8_with(LumaPrecision::Q14, 25, 75, 0), 51);
    }

    #[test]
    fn luma_image_uses_requested_precision() {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([5, 230, 0]));
        assert!(rgb_to_luma(&img).as_raw().iter().all(|&v| v == 137));
        assert!(rgb_to_luma_with(&img, LumaPrecision::Q14)
            .as_raw()
            .iter()
            .all(|&v| v == 136));
    }

    #[test]
    fn hsv_of_gray_has_no_saturation() {
        let hsv = hsv8(128, 128, 128);
        assert_eq!(hsv, Hsv8 { h: 0, s: 0, v: 128 });
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv8(255, 0, 0), Hsv8 { h: 0, s: 255, v: 255 });
        assert_eq!(hsv8(0, 255, 0), Hsv8 { h: 60, s: 255, v: 255 });
        assert_eq!(hsv8(0, 0, 255), Hsv8 { h: 120, s: 255, v: 255 });
    }

    #[test]
    fn hsv_image_matches_per_pixel_conversion() {
        let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([(x * 80) as u8, (y * 120) as u8, 40]));
        let hsv = rgb_to_hsv(&img);
        assert_eq!(hsv.width, 3);
        assert_eq!(hsv.height, 2);
        for y in 0..2 {
            for x in 0..3 {
                let [r, g, b] = img.get_pixel(x, y).0;
                assert_eq!(hsv.get(x, y), hsv8(r, g, b));
            }
        }
    }
}
