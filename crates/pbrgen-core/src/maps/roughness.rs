//! Roughness map generator.
//!
//! Local edge density stands in for microsurface roughness: the image is
//! smoothed, edges are detected, and the sparse edge map is blurred into a
//! continuous field which is then stretched to the full 8-bit range.

use image::{GrayImage, RgbImage};

use crate::color::{rgb_to_luma_with, LumaPrecision};
use crate::filters::{canny, gaussian_blur_5x5, normalize_min_max};

/// Roughness map generator.
#[derive(Debug, Clone)]
pub struct RoughnessGenerator {
    /// Lower hysteresis threshold for edge detection.
    pub low_threshold: f32,
    /// Upper hysteresis threshold for edge detection.
    pub high_threshold: f32,
}

impl RoughnessGenerator {
    /// Create a new roughness generator with thresholds 50 / 150.
    pub fn new() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }

    /// Generate a roughness map from an RGB image.
    ///
    /// Luminance is taken at 14-bit precision, unlike the normal map.
    pub fn generate(&self, image: &RgbImage) -> GrayImage {
        let gray = rgb_to_luma_with(image, LumaPrecision::Q14);
        self.generate_from_gray(&gray)
    }

    /// Generate a roughness map from a luminance image.
    ///
    /// An image without any detected edge yields an all-zero map.
    pub fn generate_from_gray(&self, gray: &GrayImage) -> GrayImage {
        let blurred = gaussian_blur_5x5(gray);
        let edges = canny(&blurred, self.low_threshold, self.high_threshold);
        let density = gaussian_blur_5x5(&edges);
        normalize_min_max(&density)
    }
}

impl Default for RoughnessGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a roughness map with default settings.
pub fn generate_roughness(image: &RgbImage) -> GrayImage {
    RoughnessGenerator::new().generate(image)
}
