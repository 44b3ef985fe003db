//! Batch generation over many input images.
//!
//! Every input becomes an independent job with its own output directory.
//! Jobs run in parallel; progress is reported through a caller-supplied sink
//! as [`ProgressEvent`]s tagged with the job id, and the run returns one
//! [`JobReport`] per input instead of updating shared counters.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::codec::hash_bytes;
use crate::generate::{
    base_name, generate_pbr_textures, texture_dir_name, GenerateError, GenerateOptions,
    TextureSetReport,
};
use crate::mode::{MapModes, MapType};

/// Input extensions accepted when scanning for images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

/// Whether `path` has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// One input image and where its texture set goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Stable identifier: `{base}-{hash16}`.
    pub job_id: String,
    /// Input image.
    pub input: PathBuf,
    /// Output directory owned by this job.
    pub output_dir: PathBuf,
}

/// Content hash of the input, or of the path itself when the file cannot be read.
fn input_digest(input: &Path) -> String {
    match std::fs::read(input) {
        Ok(bytes) => hash_bytes(&bytes),
        Err(_) => hash_bytes(input.to_string_lossy().as_bytes()),
    }
}

impl BatchJob {
    /// Plan a job writing into `{out_root}/{base}_textures`.
    ///
    /// With `unique_dirs` the directory becomes `{base}_{hash8}_textures`, so
    /// different files sharing a name do not collide.
    pub fn plan(input: &Path, out_root: &Path, unique_dirs: bool) -> Result<Self, GenerateError> {
        let base = base_name(input)?;
        let digest = input_digest(input);
        let tag = unique_dirs.then(|| &digest[..8]);

        Ok(Self {
            job_id: format!("{}-{}", base, &digest[..16]),
            input: input.to_path_buf(),
            output_dir: out_root.join(texture_dir_name(&base, tag)),
        })
    }

    /// Plan one job per input so that no two jobs share an output directory.
    ///
    /// Inputs whose `{base}_textures` names collide are moved to the
    /// content-hashed name. Same-named inputs with identical bytes are then
    /// told apart by a hash of their path.
    pub fn plan_all(
        inputs: &[PathBuf],
        out_root: &Path,
        unique_dirs: bool,
    ) -> Result<Vec<Self>, GenerateError> {
        let mut jobs = inputs
            .iter()
            .map(|input| Self::plan(input, out_root, unique_dirs))
            .collect::<Result<Vec<_>, _>>()?;

        let colliding = colliding_dirs(&jobs);
        if !colliding.is_empty() {
            for job in jobs.iter_mut() {
                if colliding.contains(&job.output_dir) {
                    let base = base_name(&job.input)?;
                    let digest = input_digest(&job.input);
                    job.output_dir = out_root.join(texture_dir_name(&base, Some(&digest[..8])));
                }
            }
        }

        let colliding = colliding_dirs(&jobs);
        if !colliding.is_empty() {
            for job in jobs.iter_mut() {
                if colliding.contains(&job.output_dir) {
                    let base = base_name(&job.input)?;
                    let path_digest = hash_bytes(job.input.to_string_lossy().as_bytes());
                    job.output_dir =
                        out_root.join(texture_dir_name(&base, Some(&path_digest[..8])));
                }
            }
        }

        if let Some(dir) = colliding_dirs(&jobs).into_iter().next() {
            return Err(GenerateError::InvalidInput(format!(
                "several inputs map to output directory {}",
                dir.display()
            )));
        }

        tracing::debug!(jobs = jobs.len(), "planned batch");
        Ok(jobs)
    }

    /// Plan a job with an explicit output directory.
    pub fn with_output_dir(input: &Path, output_dir: &Path) -> Result<Self, GenerateError> {
        let base = base_name(input)?;
        let digest = input_digest(input);
        Ok(Self {
            job_id: format!("{}-{}", base, &digest[..16]),
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
        })
    }
}

/// Output directories claimed by more than one job.
fn colliding_dirs(jobs: &[BatchJob]) -> HashSet<PathBuf> {
    let mut counts: HashMap<&Path, usize> = HashMap::new();
    for job in jobs {
        *counts.entry(job.output_dir.as_path()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(dir, _)| dir.to_path_buf())
        .collect()
}

/// Progress notification emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A job began.
    JobStarted { job_id: String, input: PathBuf },
    /// One map of a job finished.
    MapFinished {
        job_id: String,
        map_type: MapType,
        success: bool,
    },
    /// A job finished.
    JobFinished {
        job_id: String,
        succeeded: usize,
        failed: usize,
    },
}

/// Report for one job of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    #[serde(flatten)]
    pub report: TextureSetReport,
}

/// Report for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Modes used for every job.
    pub modes: MapModes,
    /// One report per job, in input order.
    pub jobs: Vec<JobReport>,
    /// Maps written across all jobs.
    pub succeeded: usize,
    /// Maps that failed across all jobs.
    pub failed: usize,
}

impl BatchReport {
    /// Whether every enabled map of every job was written.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Run every job, in parallel, reporting progress to `on_event`.
///
/// Events of one job are ordered; events of different jobs interleave.
/// Each output directory belongs to the first job naming it: a later job
/// with the same directory writes nothing and reports every map as failed.
pub fn run_batch<F>(
    jobs: &[BatchJob],
    modes: &MapModes,
    options: &GenerateOptions,
    on_event: F,
) -> BatchReport
where
    F: Fn(&ProgressEvent) + Sync,
{
    // First job to name a directory owns it; later ones are refused.
    let mut owners: HashMap<&Path, &str> = HashMap::new();
    let conflicts: Vec<Option<String>> = jobs
        .iter()
        .map(|job| match owners.get(job.output_dir.as_path()) {
            Some(owner) => Some(owner.to_string()),
            None => {
                owners.insert(job.output_dir.as_path(), job.job_id.as_str());
                None
            }
        })
        .collect();

    let reports: Vec<JobReport> = jobs
        .par_iter()
        .zip(conflicts.par_iter())
        .map(|(job, conflict)| {
            on_event(&ProgressEvent::JobStarted {
                job_id: job.job_id.clone(),
                input: job.input.clone(),
            });

            let report = match conflict {
                None => generate_pbr_textures(&job.input, &job.output_dir, modes, options),
                Some(owner) => {
                    tracing::warn!(
                        job = %job.job_id,
                        owner = %owner,
                        dir = %job.output_dir.display(),
                        "output directory already owned by another job"
                    );
                    let mut report = TextureSetReport {
                        input: job.input.clone(),
                        output_dir: job.output_dir.clone(),
                        base_name: base_name(&job.input).unwrap_or_else(|_| "texture".to_string()),
                        maps: Vec::new(),
                    };
                    report.fail_all(
                        modes,
                        &format!(
                            "output directory {} is already owned by job {}",
                            job.output_dir.display(),
                            owner
                        ),
                    );
                    report
                }
            };

            for map in &report.maps {
                on_event(&ProgressEvent::MapFinished {
                    job_id: job.job_id.clone(),
                    map_type: map.map_type,
                    success: map.is_success(),
                });
            }
            on_event(&ProgressEvent::JobFinished {
                job_id: job.job_id.clone(),
                succeeded: report.succeeded(),
                failed: report.failed(),
            });

            JobReport {
                job_id: job.job_id.clone(),
                report,
            }
        })
        .collect();

    let succeeded: usize = reports.iter().map(|j| j.report.succeeded()).sum();
    let failed: usize = reports.iter().map(|j| j.report.failed()).sum();

    tracing::debug!(jobs = reports.len(), succeeded, failed, "batch finished");

    BatchReport {
        modes: *modes,
        jobs: reports,
        succeeded,
        failed,
    }
}
