//! Modes command implementation
//!
//! Lists the generation modes accepted for each map type.

use anyhow::{Context, Result};
use colored::Colorize;
use pbrgen_core::{AlbedoMode, MapModes, MapType, MetallicMode, NormalMode, RoughnessMode};
use serde::Serialize;
use std::process::ExitCode;

/// Supported modes for one map type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapModeInfo {
    pub map_type: MapType,
    /// Output file suffix, e.g. `rough` for `{base}_rough.png`.
    pub file_suffix: &'static str,
    pub default: &'static str,
    pub modes: &'static [&'static str],
}

/// Describe every map type.
pub fn mode_table() -> Vec<MapModeInfo> {
    let defaults = MapModes::default();
    MapType::ALL
        .iter()
        .map(|&map_type| MapModeInfo {
            map_type,
            file_suffix: map_type.file_suffix(),
            default: defaults.mode_name(map_type),
            modes: match map_type {
                MapType::Albedo => AlbedoMode::NAMES,
                MapType::Normal => NormalMode::NAMES,
                MapType::Roughness => RoughnessMode::NAMES,
                MapType::Metallic => MetallicMode::NAMES,
            },
        })
        .collect()
}

/// Run the modes command
pub fn run(json: bool) -> Result<ExitCode> {
    let table = mode_table();

    if json {
        let text = serde_json::to_string_pretty(&table).context("Failed to serialize modes")?;
        println!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Map modes:".cyan().bold());
    for info in &table {
        let modes: Vec<String> = info
            .modes
            .iter()
            .map(|m| {
                if *m == info.default {
                    format!("{} (default)", m).green().to_string()
                } else {
                    m.to_string()
                }
            })
            .collect();
        println!(
            "  {:<10} {:<14} {}",
            info.map_type.as_str().bold(),
            format!("*_{}.png", info.file_suffix).dimmed(),
            modes.join(", ")
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_map_type() {
        let table = mode_table();
        assert_eq!(table.len(), 4);
        for info in &table {
            assert!(info.modes.contains(&"none"));
            assert!(info.modes.contains(&info.default));
            assert_ne!(info.default, "none");
        }
    }

    #[test]
    fn table_serializes_with_snake_case_types() {
        let json = serde_json::to_value(mode_table()).unwrap();
        assert_eq!(json[1]["map_type"], "normal");
        assert_eq!(json[1]["default"], "sobel");
        assert_eq!(json[2]["file_suffix"], "rough");
    }
}
