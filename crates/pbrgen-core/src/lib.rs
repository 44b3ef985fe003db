//! pbrgen texture derivation core
//!
//! This crate derives a PBR texture set (albedo, normal, roughness and
//! metallic maps) from a single photograph or texture image. The maps are
//! heuristic approximations driven by simple image statistics: luminance
//! gradients for normals, edge density for roughness and a low-saturation
//! color threshold for metallic.
//!
//! # Features
//!
//! - **Convolution engine**: odd square kernels, edge-replicated borders
//! - **Filters**: 5x5 Gaussian blur, Canny edges, morphological closing
//! - **Map generators**: albedo copy, Sobel normals, edge-density roughness,
//!   HSV metallic mask
//! - **Deterministic PNG**: fixed encoder settings, atomic writes
//! - **Batches**: parallel jobs with per-job reports and progress events
//!
//! # Example
//!
//! ```no_run
//! use pbrgen_core::{generate_pbr_textures, GenerateOptions, MapModes};
//! use std::path::Path;
//!
//! let report = generate_pbr_textures(
//!     Path::new("brick.jpg"),
//!     Path::new("brick_textures"),
//!     &MapModes::default(),
//!     &GenerateOptions::default(),
//! );
//! for map in &report.maps {
//!     println!("{} -> {}", map.map_type, map.path.display());
//! }
//! ```
//!
//! # Degenerate inputs
//!
//! Flat images never produce NaN: a zero-length gradient vector encodes as
//! the straight-out normal `(127, 127, 255)`, and a roughness field without
//! range normalizes to all zeros.

pub mod batch;
pub mod codec;
pub mod color;
pub mod convolve;
pub mod field;
pub mod filters;
pub mod generate;
pub mod maps;
pub mod mode;

// Re-export main types for convenience
pub use batch::{run_batch, BatchJob, BatchReport, JobReport, ProgressEvent};
pub use codec::{CodecError, PngConfig};
pub use convolve::{convolve, Kernel, KernelError};
pub use field::IntensityField;
pub use generate::{generate_pbr_textures, GenerateError, GenerateOptions, MapOutcome, TextureSetReport};
pub use maps::{generate_albedo, generate_metallic, generate_normal, generate_roughness, MapImage};
pub use mode::{AlbedoMode, MapModes, MapType, MetallicMode, NormalMode, RoughnessMode};
