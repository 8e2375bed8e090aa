//! Configuration for the tag pipeline
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; the default location is the platform config directory.
//!
//! Configuration is organized into sections:
//! - Body settings (edge rounding)
//! - Engrave settings (depth and font-size calibration, text plane)
//! - Tessellation tolerances
//! - Font selection

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "sealtag";
const CONFIG_FILE: &str = "config.toml";

/// Base body settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// Radius applied to every body edge (mm); 0 disables rounding
    pub fillet_radius: f64,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self { fillet_radius: 0.2 }
    }
}

/// The plane text outlines are placed on before extrusion.
///
/// A glyph point `(x, y)` (y pointing down) lands at
/// `origin + x * x_axis - y * up_axis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravePlane {
    pub origin: [f64; 3],
    pub x_axis: [f64; 3],
    pub up_axis: [f64; 3],
    /// Direction the text is swept into the body
    pub extrude_axis: [f64; 3],
}

impl Default for EngravePlane {
    fn default() -> Self {
        Self {
            origin: [0.0, -0.01, 0.0],
            x_axis: [1.0, 0.0, 0.0],
            up_axis: [0.0, 0.0, 1.0],
            extrude_axis: [0.0, 1.0, 0.0],
        }
    }
}

fn vector(a: &[f64; 3]) -> Vector3<f64> {
    Vector3::new(a[0], a[1], a[2])
}

impl EngravePlane {
    /// Checks that the axes are finite, non-zero, that `x_axis` and
    /// `up_axis` are not parallel and that `extrude_axis` leaves the plane.
    pub fn validate(&self) -> ConfigResult<()> {
        let all = [self.origin, self.x_axis, self.up_axis, self.extrude_axis];
        if all.iter().flatten().any(|c| !c.is_finite()) {
            return Err(ConfigError::InvalidPlane(
                "components must be finite".to_string(),
            ));
        }
        let (x_axis, up_axis, extrude_axis) = (
            vector(&self.x_axis),
            vector(&self.up_axis),
            vector(&self.extrude_axis),
        );
        for (name, axis) in [
            ("x_axis", &x_axis),
            ("up_axis", &up_axis),
            ("extrude_axis", &extrude_axis),
        ] {
            if axis.norm() < 1e-9 {
                return Err(ConfigError::InvalidPlane(format!("{name} is zero")));
            }
        }
        let normal = x_axis.cross(&up_axis);
        if normal.norm() < 1e-9 {
            return Err(ConfigError::InvalidPlane(
                "x_axis and up_axis are parallel".to_string(),
            ));
        }
        if normal.normalize().dot(&extrude_axis.normalize()).abs() < 1e-6 {
            return Err(ConfigError::InvalidPlane(
                "extrude_axis lies in the text plane".to_string(),
            ));
        }
        Ok(())
    }
}

/// Engraving calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngraveSettings {
    /// Points per flattened Bezier segment
    pub curve_samples: usize,
    /// Engraving depth as a fraction of the body height
    pub depth_fraction: f64,
    /// Minimum engraving depth (mm)
    pub depth_floor: f64,
    /// Extra sweep length reaching past the surface (mm), > 0
    pub overshoot: f64,
    /// Fraction of the body width the text may span
    pub text_width_fraction: f64,
    /// Assumed glyph advance per unit font size
    pub glyph_aspect: f64,
    /// Upper bound on font size as a fraction of the body depth
    pub text_depth_fraction: f64,
    pub plane: EngravePlane,
}

impl Default for EngraveSettings {
    fn default() -> Self {
        Self {
            curve_samples: 8,
            depth_fraction: 0.05,
            depth_floor: 0.02,
            overshoot: 0.01,
            text_width_fraction: 0.8,
            glyph_aspect: 0.6,
            text_depth_fraction: 0.4,
            plane: EngravePlane::default(),
        }
    }
}

impl EngraveSettings {
    /// Sweep length for a body of the given height and depth scale
    pub fn engrave_depth(&self, body_height: f64, text_height: f64) -> f64 {
        (body_height * self.depth_fraction).max(self.depth_floor) * text_height + self.overshoot
    }

    /// Font size that fits `chars` glyphs on a body of the given footprint
    pub fn font_size(&self, width: f64, depth: f64, chars: usize) -> f64 {
        let chars = chars.max(1) as f64;
        let by_width = width * self.text_width_fraction / (chars * self.glyph_aspect);
        let by_depth = depth * self.text_depth_fraction;
        by_width.min(by_depth)
    }
}

/// Tessellation tolerances for preview meshes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationSettings {
    /// Chordal deflection (mm)
    pub linear_deflection: f64,
    /// Angular deflection (radians)
    pub angular_deflection: f64,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        Self {
            linear_deflection: 0.1,
            angular_deflection: 0.1,
        }
    }
}

/// Font selection
///
/// An explicit `path` wins over `family`; with neither set, the host's
/// usual sans-serif fonts are tried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub path: Option<PathBuf>,
    pub family: Option<String>,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub body: BodySettings,
    pub engrave: EngraveSettings,
    pub tessellation: TessellationSettings,
    pub font: FontSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/sealtag/config.toml`
    pub fn default_path() -> ConfigResult<PathBuf> {
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file at the default path, or defaults when there is none
    pub fn load_or_default() -> SettingsResult<Self> {
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let radius = self.body.fillet_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::out_of_range("body.fillet_radius", radius));
        }

        let engrave = &self.engrave;
        if engrave.curve_samples == 0 {
            return Err(ConfigError::out_of_range("engrave.curve_samples", 0));
        }
        for (key, value) in [
            ("engrave.depth_fraction", engrave.depth_fraction),
            ("engrave.depth_floor", engrave.depth_floor),
            ("engrave.overshoot", engrave.overshoot),
            ("engrave.text_width_fraction", engrave.text_width_fraction),
            ("engrave.glyph_aspect", engrave.glyph_aspect),
            ("engrave.text_depth_fraction", engrave.text_depth_fraction),
            ("tessellation.linear_deflection", self.tessellation.linear_deflection),
            ("tessellation.angular_deflection", self.tessellation.angular_deflection),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::out_of_range(key, value));
            }
        }
        engrave.plane.validate()?;

        Ok(())
    }
}
