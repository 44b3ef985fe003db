//! Input discovery for the generate command.
//!
//! Inputs are explicit image files or directories. Directories are scanned
//! one level deep; only files with a supported image extension are used.

use anyhow::{bail, Result};
use pbrgen_core::batch::is_supported_image;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Images found on the command line, plus files that were passed over.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputSet {
    /// Images to process, in command-line order (directory entries sorted).
    pub images: Vec<PathBuf>,
    /// Files ignored because of their extension.
    pub skipped: Vec<PathBuf>,
}

/// Resolve command-line paths into a list of images.
///
/// Fails if a path does not exist. Duplicate paths are kept once.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<InputSet> {
    let mut set = InputSet::default();

    for path in paths {
        if !path.exists() {
            bail!("Input does not exist: {}", path.display());
        }

        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .collect();
            found.sort();
            for file in found {
                push_file(&mut set, &file);
            }
        } else {
            push_file(&mut set, path);
        }
    }

    Ok(set)
}

fn push_file(set: &mut InputSet, file: &Path) {
    if !is_supported_image(file) {
        tracing::warn!(path = %file.display(), "skipping file with unsupported extension");
        set.skipped.push(file.to_path_buf());
    } else if !set.images.iter().any(|p| p == file) {
        set.images.push(file.to_path_buf());
    }
}
