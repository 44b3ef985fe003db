//! Generate command implementation
//!
//! Derives a PBR texture set for every input image and prints a per-map
//! summary (or a JSON batch report).

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pbrgen_core::batch::{run_batch, BatchJob, BatchReport, ProgressEvent};
use pbrgen_core::{GenerateOptions, MapModes, PngConfig};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::input::collect_inputs;

/// Arguments for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Image files or directories.
    pub inputs: Vec<PathBuf>,
    /// Explicit output directory (single input only).
    pub output_dir: Option<PathBuf>,
    /// Root under which `{base}_textures` directories are created.
    pub out_root: Option<PathBuf>,
    /// Per-map modes.
    pub modes: MapModes,
    /// Suffix output directories with a content hash.
    pub unique_dirs: bool,
    /// PNG encoder preset: `fast`, `default` or `best`.
    pub png_compression: String,
    /// Emit a JSON report instead of colored text.
    pub json: bool,
}

/// Resolve a PNG preset name.
pub fn png_config(name: &str) -> Result<PngConfig> {
    match name {
        "fast" => Ok(PngConfig::fast()),
        "default" => Ok(PngConfig::default()),
        "best" => Ok(PngConfig::best_compression()),
        other => bail!("Unknown PNG compression preset: {}", other),
    }
}

/// Plan one job per input image, each with its own output directory.
pub fn plan_jobs(args: &GenerateArgs, images: &[PathBuf]) -> Result<Vec<BatchJob>> {
    if let Some(dir) = &args.output_dir {
        if images.len() != 1 {
            bail!(
                "--output-dir needs exactly one input image, got {}; use --out-root for batches",
                images.len()
            );
        }
        return BatchJob::with_output_dir(&images[0], dir)
            .with_context(|| format!("Failed to plan job for {}", images[0].display()))
            .map(|job| vec![job]);
    }

    let out_root = args.out_root.clone().unwrap_or_else(|| PathBuf::from("."));
    BatchJob::plan_all(images, &out_root, args.unique_dirs).context("Failed to plan batch")
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 if every enabled map was written, 1 otherwise
pub fn run(args: &GenerateArgs) -> Result<ExitCode> {
    let report = execute(args)?;
    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Generate every texture set and print the outcome.
pub fn execute(args: &GenerateArgs) -> Result<BatchReport> {
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.images.is_empty() {
        bail!("No supported images found (expected one of: png, jpg, jpeg, bmp, tiff)");
    }

    let jobs = plan_jobs(args, &inputs.images)?;
    let options = GenerateOptions {
        png: png_config(&args.png_compression)?,
        ..GenerateOptions::default()
    };

    if args.modes.enabled_maps().is_empty() {
        tracing::warn!("all map modes are 'none'; nothing will be generated");
    }

    if !args.json {
        println!(
            "{} {} image(s), maps: albedo={} normal={} roughness={} metallic={}",
            "Generating".cyan().bold(),
            jobs.len(),
            args.modes.albedo,
            args.modes.normal,
            args.modes.roughness,
            args.modes.metallic,
        );
        for skipped in &inputs.skipped {
            println!("  {} skipped {}", "!".yellow(), skipped.display());
        }
    }

    let json = args.json;
    let report = run_batch(&jobs, &args.modes, &options, |event| {
        if !json {
            print_event(event);
        }
    });

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        print_summary(&report);
    }

    Ok(report)
}

fn print_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::JobStarted { job_id, input } => {
            println!("{} {} ({})", "->".blue(), input.display(), job_id.dimmed());
        }
        ProgressEvent::MapFinished {
            job_id,
            map_type,
            success,
        } => {
            let mark = if *success { "ok".green() } else { "FAILED".red() };
            println!("   [{}] {:<9} {}", job_id.dimmed(), map_type.as_str(), mark);
        }
        ProgressEvent::JobFinished { .. } => {}
    }
}

fn print_summary(report: &BatchReport) {
    println!();
    for job in &report.jobs {
        let r = &job.report;
        let status = if r.is_success() {
            "done".green().bold()
        } else {
            "partial".yellow().bold()
        };
        println!("{} {} -> {}", status, r.input.display(), r.output_dir.display());
        for map in &r.maps {
            match &map.error {
                None => println!("  {} {}", "+".green(), map.path.display()),
                Some(err) => println!("  {} {}: {}", "x".red(), map.map_type, err),
            }
        }
    }

    println!();
    println!(
        "{} {} written, {} failed",
        "Summary:".blue().bold(),
        report.succeeded,
        report.failed
    );
}
