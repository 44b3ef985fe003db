//! PBR texture map generators.
//!
//! Each module derives one map type from the decoded source image. The
//! generators are independent of one another and never see each other's
//! output.

mod albedo;
mod metallic;
mod normal;
mod roughness;

pub use albedo::{generate_albedo, AlbedoGenerator};
pub use metallic::{generate_metallic, MetallicGenerator};
pub use normal::{generate_normal, NormalGenerator, FLAT_NORMAL_RGB};
pub use roughness::{generate_roughness, RoughnessGenerator};

use image::{GrayImage, RgbImage};

use crate::mode::MapType;

/// A generated map, ready to encode.
#[derive(Debug, Clone, PartialEq)]
pub enum MapImage {
    /// 3-channel color map (albedo, normal).
    Rgb(RgbImage),
    /// Single-channel map (roughness, metallic).
    Gray(GrayImage),
}

impl MapImage {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            MapImage::Rgb(img) => img.dimensions(),
            MapImage::Gray(img) => img.dimensions(),
        }
    }
}

/// Run the default generator for `map_type` on `source`.
pub fn generate_map(map_type: MapType, source: &RgbImage) -> MapImage {
    match map_type {
        MapType::Albedo => MapImage::Rgb(generate_albedo(source)),
        MapType::Normal => MapImage::Rgb(generate_normal(source)),
        MapType::Roughness => MapImage::Gray(generate_roughness(source)),
        MapType::Metallic => MapImage::Gray(generate_metallic(source)),
    }
}
