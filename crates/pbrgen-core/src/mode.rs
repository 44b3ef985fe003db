//! Map types and per-map generation modes.
//!
//! Each map type has a closed set of modes: `none` disables the map, every
//! other variant names an algorithm. Unknown mode strings are rejected when
//! parsed instead of silently disabling the map.

use serde::{Deserialize, Serialize};

/// Types of PBR texture maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    /// Base color map.
    Albedo,
    /// Tangent-space normal map.
    Normal,
    /// Roughness map.
    Roughness,
    /// Metallic mask.
    Metallic,
}

impl MapType {
    /// All map types in output order.
    pub const ALL: [MapType; 4] = [
        MapType::Albedo,
        MapType::Normal,
        MapType::Roughness,
        MapType::Metallic,
    ];

    /// Returns the map type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Albedo => "albedo",
            MapType::Normal => "normal",
            MapType::Roughness => "roughness",
            MapType::Metallic => "metallic",
        }
    }

    /// Suffix used in output file names (`{base}_{suffix}.png`).
    pub fn file_suffix(&self) -> &'static str {
        match self {
            MapType::Albedo => "albedo",
            MapType::Normal => "normal",
            MapType::Roughness => "rough",
            MapType::Metallic => "metallic",
        }
    }

    /// Output file name for an image with base name `base`.
    pub fn file_name(&self, base: &str) -> String {
        format!("{}_{}.png", base, self.file_suffix())
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

macro_rules! map_mode {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            /// Do not generate this map.
            None,
            $(
                #[doc = concat!("`", $text, "` algorithm.")]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted mode string, `none` first.
            pub const NAMES: &'static [&'static str] = &["none", $($text),+];

            /// Returns the mode as a string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::None => "none",
                    $($name::$variant => $text,)+
                }
            }

            /// Whether this mode produces a map.
            pub fn is_enabled(&self) -> bool {
                !matches!(self, $name::None)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "none" => Ok($name::None),
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!(
                        "unknown {} mode: {} (expected one of: {})",
                        $label,
                        s,
                        Self::NAMES.join(", ")
                    )),
                }
            }
        }
    };
}

map_mode! {
    /// Albedo generation mode.
    AlbedoMode, "albedo" { Copy => "copy" }
    default = Copy
}

map_mode! {
    /// Normal map generation mode.
    NormalMode, "normal" { Sobel => "sobel" }
    default = Sobel
}

map_mode! {
    /// Roughness generation mode.
    RoughnessMode, "roughness" { Gaussian => "gaussian" }
    default = Gaussian
}

map_mode! {
    /// Metallic generation mode.
    MetallicMode, "metallic" { Hsv => "hsv" }
    default = Hsv
}

/// Mode selection for all four maps of one texture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapModes {
    #[serde(default)]
    pub albedo: AlbedoMode,
    #[serde(default)]
    pub normal: NormalMode,
    #[serde(default)]
    pub roughness: RoughnessMode,
    #[serde(default)]
    pub metallic: MetallicMode,
}

impl MapModes {
    /// Modes with every map disabled.
    pub fn none() -> Self {
        Self {
            albedo: AlbedoMode::None,
            normal: NormalMode::None,
            roughness: RoughnessMode::None,
            metallic: MetallicMode::None,
        }
    }

    /// Whether `map_type` is enabled.
    pub fn is_enabled(&self, map_type: MapType) -> bool {
        match map_type {
            MapType::Albedo => self.albedo.is_enabled(),
            MapType::Normal => self.normal.is_enabled(),
            MapType::Roughness => self.roughness.is_enabled(),
            MapType::Metallic => self.metallic.is_enabled(),
        }
    }

    /// Enabled map types in output order.
    pub fn enabled_maps(&self) -> Vec<MapType> {
        MapType::ALL
            .into_iter()
            .filter(|m| self.is_enabled(*m))
            .collect()
    }

    /// Algorithm name selected for `map_type`.
    pub fn mode_name(&self, map_type: MapType) -> &'static str {
        match map_type {
            MapType::Albedo => self.albedo.as_str(),
            MapType::Normal => self.normal.as_str(),
            MapType::Roughness => self.roughness.as_str(),
            MapType::Metallic => self.metallic.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!("copy".parse::<AlbedoMode>(), Ok(AlbedoMode::Copy));
        assert_eq!("none".parse::<NormalMode>(), Ok(NormalMode::None));
        assert_eq!("gaussian".parse::<RoughnessMode>(), Ok(RoughnessMode::Gaussian));
        assert_eq!("hsv".parse::<MetallicMode>(), Ok(MetallicMode::Hsv));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "canny".parse::<NormalMode>().unwrap_err();
        assert!(err.contains("unknown normal mode: canny"));
        assert!(err.contains("none, sobel"));
        assert!("Sobel".parse::<NormalMode>().is_err());
    }

    #[test]
    fn defaults_enable_every_map() {
        let modes = MapModes::default();
        assert_eq!(modes.enabled_maps(), MapType::ALL.to_vec());
        assert!(MapModes::none().enabled_maps().is_empty());
    }

    #[test]
    fn file_names_use_short_roughness_suffix() {
        assert_eq!(MapType::Albedo.file_name("brick"), "brick_albedo.png");
        assert_eq!(MapType::Normal.file_name("brick"), "brick_normal.png");
        assert_eq!(MapType::Roughness.file_name("brick"), "brick_rough.png");
        assert_eq!(MapType::Metallic.file_name("brick"), "brick_metallic.png");
    }

    #[test]
    fn modes_serialize_as_lowercase_strings() {
        let modes = MapModes {
            normal: NormalMode::None,
            ..MapModes::default()
        };
        let json = serde_json::to_value(modes).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "albedo": "copy",
                "normal": "none",
                "roughness": "gaussian",
                "metallic": "hsv"
            })
        );
        let back: MapModes = serde_json::from_value(json).unwrap();
        assert_eq!(back, modes);
    }
}
