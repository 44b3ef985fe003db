//! Single-channel floating point fields used for intermediate map math.

use image::GrayImage;

/// Single-channel `f32` field (row-major).
///
/// Values are unbounded while a map is being computed; generators quantize
/// them back to 8-bit themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityField {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<f32>,
}

impl IntensityField {
    /// Create a new field filled with a value.
    pub fn new(width: u32, height: u32, fill: f32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Wrap existing row-major data.
    ///
    /// Returns `None` when `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Build a field from an 8-bit gray image (values stay in 0..=255).
    pub fn from_gray_image(img: &GrayImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw().iter().map(|&v| f32::from(v)).collect(),
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Get a pixel with edge-replicated coordinates.
    ///
    /// Out-of-range coordinates are clamped to the nearest border pixel.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> f32 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get(cx, cy)
    }
}
