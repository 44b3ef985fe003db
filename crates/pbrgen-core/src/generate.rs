//! Main entry point for texture set generation.
//!
//! [`generate_pbr_textures`] decodes one input image, runs every enabled map
//! generator and writes each result as `{output_dir}/{base}_{suffix}.png`.
//! A failing map is logged and recorded in the report; it never stops the
//! remaining maps.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{self, CodecError, PngConfig};
use crate::maps::generate_map;
use crate::mode::{MapModes, MapType};

/// Errors from texture generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Options shared by every map of a texture set.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// PNG encoder settings for every output file.
    pub png: PngConfig,
    /// Generate the maps of one image concurrently.
    pub parallel_maps: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            png: PngConfig::default(),
            parallel_maps: true,
        }
    }
}

/// Outcome of generating a single map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOutcome {
    /// The map type.
    pub map_type: MapType,
    /// Algorithm that produced (or failed to produce) the map.
    pub mode: String,
    /// Destination file.
    pub path: PathBuf,
    /// BLAKE3 hash of the written PNG, if the map was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Failure message, if the map was not written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time spent on this map in milliseconds.
    pub duration_ms: u64,
}

impl MapOutcome {
    /// Whether the map was written.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of generating the texture set for one input image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSetReport {
    /// Input image path.
    pub input: PathBuf,
    /// Directory holding the texture set.
    pub output_dir: PathBuf,
    /// Base name used for output files.
    pub base_name: String,
    /// One entry per enabled map, in output order.
    pub maps: Vec<MapOutcome>,
}

impl TextureSetReport {
    /// Number of maps written.
    pub fn succeeded(&self) -> usize {
        self.maps.iter().filter(|m| m.is_success()).count()
    }

    /// Number of maps that failed.
    pub fn failed(&self) -> usize {
        self.maps.len() - self.succeeded()
    }

    /// Whether every enabled map was written.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Record every enabled map of `modes` as failed with `message`.
    pub fn fail_all(&mut self, modes: &MapModes, message: &str) {
        self.maps = modes
            .enabled_maps()
            .into_iter()
            .map(|map_type| MapOutcome {
                map_type,
                mode: modes.mode_name(map_type).to_string(),
                path: self.output_dir.join(map_type.file_name(&self.base_name)),
                hash: None,
                error: Some(message.to_string()),
                duration_ms: 0,
            })
            .collect();
    }

    /// Outcome for `map_type`, if it was enabled.
    pub fn map(&self, map_type: MapType) -> Option<&MapOutcome> {
        self.maps.iter().find(|m| m.map_type == map_type)
    }
}

/// Base name of an input path (file name without its last extension).
pub fn base_name(input: &Path) -> Result<String, GenerateError> {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            GenerateError::InvalidInput(format!("{} has no file name", input.display()))
        })
}

/// Directory name for a texture set: `{base}_textures`, or
/// `{base}_{tag}_textures` when a disambiguating tag is given.
pub fn texture_dir_name(base: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}_{}_textures", base, tag),
        None => format!("{}_textures", base),
    }
}

/// Generate one map from a decoded source and write it to `path`.
///
/// Returns the BLAKE3 hash of the written file.
pub fn generate_map_file(
    map_type: MapType,
    source: &RgbImage,
    path: &Path,
    config: &PngConfig,
) -> Result<String, GenerateError> {
    let map = generate_map(map_type, source);
    Ok(codec::write_map(path, &map, config)?)
}

/// Generate the PBR texture set for one input image.
///
/// Creates `output_dir` if needed, then runs one generator per enabled mode.
/// Each map succeeds or fails on its own; a decode failure or an unusable
/// output directory fails every enabled map.
pub fn generate_pbr_textures(
    input: &Path,
    output_dir: &Path,
    modes: &MapModes,
    options: &GenerateOptions,
) -> TextureSetReport {
    let enabled = modes.enabled_maps();
    let base = base_name(input).unwrap_or_else(|_| "texture".to_string());

    let mut report = TextureSetReport {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        base_name: base.clone(),
        maps: Vec::with_capacity(enabled.len()),
    };
    if enabled.is_empty() {
        tracing::debug!(input = %input.display(), "no maps enabled");
        return report;
    }

    let prepared = base_name(input)
        .and_then(|_| {
            std::fs::create_dir_all(output_dir).map_err(|source| GenerateError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })
        })
        .and_then(|_| codec::decode_rgb(input).map_err(GenerateError::from));

    let source = match prepared {
        Ok(source) => source,
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(input = %input.display(), error = %message, "cannot generate texture set");
            report.fail_all(modes, &message);
            return report;
        }
    };

    tracing::debug!(
        input = %input.display(),
        width = source.width(),
        height = source.height(),
        "decoded source image"
    );

    let run = |map_type: MapType| -> MapOutcome {
        let path = output_dir.join(map_type.file_name(&base));
        let start = Instant::now();
        let result = generate_map_file(map_type, &source, &path, &options.png);
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(hash) => {
                tracing::info!(map = %map_type, path = %path.display(), duration_ms, "map saved");
                MapOutcome {
                    map_type,
                    mode: modes.mode_name(map_type).to_string(),
                    path,
                    hash: Some(hash),
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::warn!(map = %map_type, input = %input.display(), error = %e, "map failed");
                MapOutcome {
                    map_type,
                    mode: modes.mode_name(map_type).to_string(),
                    path,
                    hash: None,
                    error: Some(e.to_string()),
                    duration_ms,
                }
            }
        }
    };

    report.maps = if options.parallel_maps {
        enabled.par_iter().map(|&m| run(m)).collect()
    } else {
        enabled.iter().map(|&m| run(m)).collect()
    };

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::MapImage;
    use crate::mode::{AlbedoMode, MetallicMode, NormalMode, RoughnessMode};
    use image::Rgb;

    fn write_input(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
        let path = dir.join(name);
        codec::write_map(&path, &MapImage::Rgb(img.clone()), &PngConfig::default()).unwrap();
        path
    }

    #[test]
    fn base_name_strips_last_extension() {
        assert_eq!(base_name(Path::new("a/b/brick.wall.png")).unwrap(), "brick.wall");
        assert_eq!(base_name(Path::new("stone")).unwrap(), "stone");
        assert!(base_name(Path::new("/")).is_err());
    }

    #[test]
    fn texture_dir_name_with_and_without_tag() {
        assert_eq!(texture_dir_name("rock", None), "rock_textures");
        assert_eq!(texture_dir_name("rock", Some("1a2b3c4d")), "rock_1a2b3c4d_textures");
    }

    #[test]
    fn only_enabled_maps_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "tile.png", &RgbImage::from_pixel(8, 8, Rgb([9, 9, 9])));
        let out = dir.path().join("out");

        let modes = MapModes {
            albedo: AlbedoMode::None,
            normal: NormalMode::Sobel,
            roughness: RoughnessMode::None,
            metallic: MetallicMode::Hsv,
        };
        let report = generate_pbr_textures(&input, &out, &modes, &GenerateOptions::default());

        assert!(report.is_success());
        assert_eq!(report.maps.len(), 2);
        assert!(out.join("tile_normal.png").exists());
        assert!(out.join("tile_metallic.png").exists());
        assert!(!out.join("tile_albedo.png").exists());
        assert!(!out.join("tile_rough.png").exists());
    }

    #[test]
    fn no_enabled_maps_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        let report = generate_pbr_textures(
            &dir.path().join("missing.png"),
            &out,
            &MapModes::none(),
            &GenerateOptions::default(),
        );
        assert!(report.maps.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_input_fails_every_enabled_map() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"nope").unwrap();
        let out = dir.path().join("out");

        let report = generate_pbr_textures(&input, &out, &MapModes::default(), &GenerateOptions::default());

        assert_eq!(report.maps.len(), 4);
        assert_eq!(report.failed(), 4);
        assert!(report.maps.iter().all(|m| m.hash.is_none()));
        assert!(std::fs::read_dir(&out).unwrap().next().is_none());
    }

    #[test]
    fn sequential_and_parallel_runs_agree() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 60]));
        let input = write_input(dir.path(), "grad.png", &img);

        let seq = GenerateOptions {
            parallel_maps: false,
            ..GenerateOptions::default()
        };
        let a = generate_pbr_textures(&input, &dir.path().join("a"), &MapModes::default(), &seq);
        let b = generate_pbr_textures(&input, &dir.path().join("b"), &MapModes::default(), &GenerateOptions::default());

        let hashes = |r: &TextureSetReport| -> Vec<Option<String>> {
            r.maps.iter().map(|m| m.hash.clone()).collect()
        };
        assert_eq!(hashes(&a), hashes(&b));
        assert_eq!(
            a.maps.iter().map(|m| m.map_type).collect::<Vec<_>>(),
            MapType::ALL.to_vec()
        );
    }
}
