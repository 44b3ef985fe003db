//! Image decoding and deterministic PNG encoding.
//!
//! Inputs are decoded with the `image` crate (PNG, JPEG, BMP, TIFF) and
//! flattened to 8-bit RGB; alpha is discarded. Outputs are always PNG written
//! with fixed compression settings, so identical pixels give identical bytes.
//! Files are written to a temporary sibling and renamed into place, so a
//! failed write never leaves a partial file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::maps::MapImage;

/// Errors from decoding or encoding images.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("failed to move finished file into {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Create config optimized for file size (slower, but deterministic).
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Create config optimized for speed (faster, but larger files).
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }
}

/// Decode any supported image file into 8-bit RGB.
pub fn decode_rgb(path: &Path) -> Result<RgbImage, CodecError> {
    let img = image::open(path).map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(CodecError::InvalidDimensions(format!(
            "{} has an empty {}x{} raster",
            path.display(),
            rgb.width(),
            rgb.height()
        )));
    }
    Ok(rgb)
}

fn write_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color_type: ColorType,
    data: &[u8],
    config: &PngConfig,
) -> Result<(), CodecError> {
    let channels = match color_type {
        ColorType::Grayscale => 1,
        ColorType::Rgb => 3,
        other => {
            return Err(CodecError::InvalidDimensions(format!(
                "unsupported color type {:?}",
                other
            )))
        }
    };
    let expected = width as usize * height as usize * channels;
    if data.len() != expected {
        return Err(CodecError::InvalidDimensions(format!(
            "Expected {} bytes for {}x{} {:?}, got {}",
            expected,
            width,
            height,
            color_type,
            data.len()
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // No timestamps or other variable metadata
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;

    Ok(())
}

/// Encode an RGB image as PNG into any writer.
pub fn write_rgb_to_writer<W: Write>(
    img: &RgbImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), CodecError> {
    write_png(writer, img.width(), img.height(), ColorType::Rgb, img.as_raw(), config)
}

/// Encode a gray image as PNG into any writer.
pub fn write_gray_to_writer<W: Write>(
    img: &GrayImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), CodecError> {
    write_png(
        writer,
        img.width(),
        img.height(),
        ColorType::Grayscale,
        img.as_raw(),
        config,
    )
}

/// Encode a generated map into PNG bytes.
pub fn encode_map(map: &MapImage, config: &PngConfig) -> Result<Vec<u8>, CodecError> {
    let mut data = Vec::new();
    match map {
        MapImage::Rgb(img) => write_rgb_to_writer(img, &mut data, config)?,
        MapImage::Gray(img) => write_gray_to_writer(img, &mut data, config)?,
    }
    Ok(data)
}

/// Write `bytes` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CodecError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CodecError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Encode `map` and write it to `path`. Returns the BLAKE3 hash of the file.
pub fn write_map(path: &Path, map: &MapImage, config: &PngConfig) -> Result<String, CodecError> {
    let bytes = encode_map(map, config)?;
    write_atomic(path, &bytes)?;
    Ok(hash_bytes(&bytes))
}

/// Compute the BLAKE3 hash of encoded data as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn gradient_rgb() -> RgbImage {
        RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]))
    }

    #[test]
    fn rgb_encoding_is_deterministic() {
        let config = PngConfig::default();
        let map = MapImage::Rgb(gradient_rgb());
        let a = encode_map(&map, &config).unwrap();
        let b = encode_map(&map, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_bytes(&a), hash_bytes(&b));
    }

    #[test]
    fn gray_encoding_is_deterministic() {
        let config = PngConfig::best_compression();
        let map = MapImage::Gray(GrayImage::from_fn(32, 16, |x, y| Luma([(x + y) as u8])));
        assert_eq!(
            encode_map(&map, &config).unwrap(),
            encode_map(&map, &config).unwrap()
        );
    }

    #[test]
    fn write_then_decode_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = gradient_rgb();

        let hash = write_map(&path, &MapImage::Rgb(img.clone()), &PngConfig::fast()).unwrap();
        assert_eq!(hash, hash_bytes(&std::fs::read(&path).unwrap()));
        assert_eq!(decode_rgb(&path).unwrap(), img);
    }

    #[test]
    fn gray_png_decodes_to_replicated_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let img = GrayImage::from_fn(4, 4, |x, _| Luma([x as u8 * 60]));
        write_map(&path, &MapImage::Gray(img), &PngConfig::default()).unwrap();

        let rgb = decode_rgb(&path).unwrap();
        assert_eq!(rgb.get_pixel(2, 1).0, [120, 120, 120]);
    }

    #[test]
    fn decode_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_an_image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = decode_rgb(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(err.to_string().contains("not_an_image.png"));
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.png");
        let map = MapImage::Gray(GrayImage::new(2, 2));

        assert!(write_map(&path, &map, &PngConfig::default()).is_err());
        assert!(!path.exists());
    }
}
