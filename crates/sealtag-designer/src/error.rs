//! Error types for the designer crate.

use sealtag_core::ParamError;
use sealtag_kernel::KernelError;
use thiserror::Error;

/// Font resolution and outline errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// None of the configured or well-known fonts could be loaded
    #[error("No usable font found (tried: {tried})")]
    NotFound { tried: String },

    /// A font file exists but could not be read
    #[error("Failed to read font file {path}: {reason}")]
    Read { path: String, reason: String },

    /// A font file was read but is not a font rusttype can parse
    #[error("Not a valid font: {0}")]
    Invalid(String),

    /// The requested family is not installed
    #[error("Font family '{0}' is not installed")]
    FamilyNotFound(String),
}

/// Errors that abort a tag build
#[derive(Error, Debug)]
pub enum BuildError {
    /// The request failed validation before any kernel call
    #[error("Invalid tag parameters: {0}")]
    InvalidParams(#[from] ParamError),

    /// The base body could not be constructed
    #[error("Failed to build tag body: {0}")]
    Body(#[source] KernelError),

    /// Text was requested but no font could be resolved
    #[error(transparent)]
    Font(#[from] FontError),

    /// Preview tessellation failed
    #[error("Failed to tessellate solid: {0}")]
    Tessellation(#[source] KernelError),
}

/// Errors reported by [`GeometryService`](crate::GeometryService)
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// `export` was called before any successful build
    #[error("No solid has been built yet")]
    NothingToExport,

    #[error("Export failed: {0}")]
    Export(#[source] KernelError),

    /// The kernel factory failed on the worker thread
    #[error("Kernel initialization failed: {0}")]
    KernelInit(String),

    /// The worker thread is gone
    #[error("Geometry worker stopped")]
    WorkerStopped,
}

impl ServiceError {
    pub fn is_build_error(&self) -> bool {
        matches!(self, ServiceError::Build(_))
    }
}
