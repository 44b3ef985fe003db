//! pbrgen CLI - Command-line interface for PBR texture derivation
//!
//! This binary derives albedo, normal, roughness and metallic maps from
//! photographs or texture images.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbrgen_cli::commands;
use pbrgen_cli::commands::generate::GenerateArgs;
use pbrgen_core::{AlbedoMode, MapModes, MetallicMode, NormalMode, RoughnessMode};

/// pbrgen - Derive PBR texture sets from a single image
#[derive(Parser)]
#[command(name = "pbrgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PBR texture set for each input image
    Generate {
        /// Image files or directories of images (png, jpg, jpeg, bmp, tiff)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for a single input (default: ./{base}_textures)
        #[arg(short, long, conflicts_with = "out_root")]
        output_dir: Option<PathBuf>,

        /// Root directory for `{base}_textures` folders (default: current directory)
        #[arg(long)]
        out_root: Option<PathBuf>,

        /// Add a content hash to each output folder name to avoid collisions
        #[arg(long)]
        unique_dirs: bool,

        /// Albedo mode (none, copy)
        #[arg(long, default_value = "copy")]
        albedo: AlbedoMode,

        /// Normal map mode (none, sobel)
        #[arg(long, default_value = "sobel")]
        normal: NormalMode,

        /// Roughness mode (none, gaussian)
        #[arg(long, default_value = "gaussian")]
        roughness: RoughnessMode,

        /// Metallic mode (none, hsv)
        #[arg(long, default_value = "hsv")]
        metallic: MetallicMode,

        /// PNG compression preset
        #[arg(long, default_value = "default", value_parser = ["fast", "default", "best"])]
        png_compression: String,

        /// Output a machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the supported modes for each map type
    Modes {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    // Logs go to stderr so that `--json` output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pbrgen={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            inputs,
            output_dir,
            out_root,
            unique_dirs,
            albedo,
            normal,
            roughness,
            metallic,
            png_compression,
            json,
        } => commands::generate::run(&GenerateArgs {
            inputs,
            output_dir,
            out_root,
            modes: MapModes {
                albedo,
                normal,
                roughness,
                metallic,
            },
            unique_dirs,
            png_compression,
            json,
        }),
        Commands::Modes { json } => commands::modes::run(json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate_defaults() {
        let cli = Cli::try_parse_from(["pbrgen", "generate", "brick.jpg"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Generate {
                inputs,
                output_dir,
                out_root,
                unique_dirs,
                albedo,
                normal,
                roughness,
                metallic,
                png_compression,
                json,
            } => {
                assert_eq!(inputs, vec![PathBuf::from("brick.jpg")]);
                assert!(output_dir.is_none());
                assert!(out_root.is_none());
                assert!(!unique_dirs);
                assert_eq!(albedo, AlbedoMode::Copy);
                assert_eq!(normal, NormalMode::Sobel);
                assert_eq!(roughness, RoughnessMode::Gaussian);
                assert_eq!(metallic, MetallicMode::Hsv);
                assert_eq!(png_compression, "default");
                assert!(!json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_parses_generate_with_modes() {
        let cli = Cli::try_parse_from([
            "pbrgen",
            "generate",
            "a.png",
            "b.png",
            "--out-root",
            "out",
            "--normal",
            "none",
            "--metallic",
            "none",
            "--unique-dirs",
            "--json",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Generate {
                inputs,
                out_root,
                unique_dirs,
                normal,
                metallic,
                roughness,
                json,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(out_root, Some(PathBuf::from("out")));
                assert!(unique_dirs);
                assert_eq!(normal, NormalMode::None);
                assert_eq!(metallic, MetallicMode::None);
                assert_eq!(roughness, RoughnessMode::Gaussian);
                assert!(json);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let err = Cli::try_parse_from(["pbrgen", "generate", "a.png", "--normal", "scharr"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("scharr"));
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["pbrgen", "generate"]).is_err());
    }

    #[test]
    fn test_cli_output_dir_conflicts_with_out_root() {
        assert!(Cli::try_parse_from([
            "pbrgen",
            "generate",
            "a.png",
            "-o",
            "x",
            "--out-root",
            "y",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_png_preset() {
        assert!(Cli::try_parse_from([
            "pbrgen",
            "generate",
            "a.png",
            "--png-compression",
            "max",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parses_modes() {
        let cli = Cli::try_parse_from(["pbrgen", "modes", "--json"]).unwrap();
        match cli.command {
            Commands::Modes { json } => assert!(json),
            _ => panic!("expected modes command"),
        }
    }
}
