//! SealTag Settings Crate
//!
//! Typed configuration for the tag pipeline: body rounding, engraving
//! calibration and plane, tessellation tolerances and font selection.

pub mod config;
pub mod error;

pub use config::{
    BodySettings, Config, EngravePlane, EngraveSettings, FontSettings, TessellationSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
