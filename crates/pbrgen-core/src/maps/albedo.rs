//! Albedo map generator.
//!
//! Currently a verbatim copy of the source. Replacing this stage (de-lighting,
//! shadow removal) does not change the orchestrator contract.

use image::RgbImage;

/// Albedo map generator.
#[derive(Debug, Clone, Default)]
pub struct AlbedoGenerator;

impl AlbedoGenerator {
    /// Create a new albedo generator.
    pub fn new() -> Self {
        Self
    }

    /// Generate the albedo map.
    pub fn generate(&self, image: &RgbImage) -> RgbImage {
        image.clone()
    }
}

/// Generate an albedo map with default settings.
pub fn generate_albedo(image: &RgbImage) -> RgbImage {
    AlbedoGenerator::new().generate(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn albedo_is_identity() {
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 70, 9]));
        assert_eq!(generate_albedo(&img), img);
        assert_eq!(generate_albedo(&generate_albedo(&img)), img);
    }
}
