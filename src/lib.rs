//! # SealTag
//!
//! Parametric seal tags: a triangular prism with rounded edges and text
//! engraved into its bottom face, produced as a render mesh and as binary STL.
//!
//! ## Architecture
//!
//! SealTag is organized as a workspace with multiple crates:
//!
//! 1. **sealtag-core** - Build parameters, render mesh, shared errors
//! 2. **sealtag-kernel** - Solid-modeling capability trait and the csgrs adapter
//! 3. **sealtag-settings** - Calibration and plane configuration (JSON/TOML)
//! 4. **sealtag-designer** - Glyph pipeline, engraving and the geometry service
//! 5. **sealtag** - Command-line front end tying the crates together

pub use sealtag_core::{MeshBounds, MeshData, MeshError, ParamError, Point2D, TagParams};
pub use sealtag_designer as designer;
pub use sealtag_designer::{
    BuildError, EngraveOutcome, FontError, GeometryService, ServiceError, TagBuilder, TagModel,
};
pub use sealtag_kernel::{BrepKernel, CsgKernel, Deflection, KernelError};
pub use sealtag_settings::{Config, ConfigError, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Pretty formatted output on stderr, so stdout stays free for data
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
