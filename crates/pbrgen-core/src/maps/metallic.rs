//! Metallic map generator.
//!
//! Low-saturation, moderately bright pixels are treated as metal. The raw
//! threshold mask is cleaned with a morphological closing so small holes and
//! speckles do not survive.

use image::{GrayImage, RgbImage};

use crate::color::{rgb_to_hsv, Hsv8};
use crate::filters::{close, in_range};

/// Metallic map generator.
#[derive(Debug, Clone)]
pub struct MetallicGenerator {
    /// Inclusive lower HSV bound.
    pub lower: Hsv8,
    /// Inclusive upper HSV bound.
    pub upper: Hsv8,
    /// Side of the square closing element.
    pub closing_size: u32,
}

impl MetallicGenerator {
    /// Create a new metallic generator (H 0..=180, S 0..=50, V 100..=255, 5x5 closing).
    pub fn new() -> Self {
        Self {
            lower: Hsv8 { h: 0, s: 0, v: 100 },
            upper: Hsv8 {
                h: 180,
                s: 50,
                v: 255,
            },
            closing_size: 5,
        }
    }

    /// Generate a binary metallic mask (0 or 255) from an RGB image.
    pub fn generate(&self, image: &RgbImage) -> GrayImage {
        let hsv = rgb_to_hsv(image);
        let mask = in_range(&hsv, self.lower, self.upper);
        close(&mask, self.closing_size)
    }
}

impl Default for MetallicGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a metallic mask with default settings.
pub fn generate_metallic(image: &RgbImage) -> GrayImage {
    MetallicGenerator::new().generate(image)
}
