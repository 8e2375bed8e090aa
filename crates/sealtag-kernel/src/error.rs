//! Error types for kernel operations.

use thiserror::Error;

/// Kernel operation error type
///
/// Every fallible `BrepKernel` call reports one of these instead of panicking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A primitive, edge, wire or face could not be constructed
    #[error("Construction failed: {0}")]
    Construction(String),

    /// A boolean operation produced no usable solid
    #[error("Boolean {op} failed: {reason}")]
    BooleanFailed {
        /// The operation name (`fuse` or `cut`).
        op: &'static str,
        /// What went wrong.
        reason: String,
    },

    /// A sweep could not be built
    #[error("Extrusion failed: {0}")]
    Extrusion(String),

    /// Edge rounding failed
    #[error("Fillet failed: {0}")]
    Fillet(String),

    /// The adapter cannot perform this request
    #[error("Unsupported by {kernel}: {what}")]
    Unsupported {
        /// Kernel name.
        kernel: &'static str,
        /// Description of the unsupported request.
        what: String,
    },

    /// Triangulation failed or was requested with bad parameters
    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    /// Encoding the solid for export failed
    #[error("Export failed: {0}")]
    Export(String),
}

impl KernelError {
    /// Whether this error came from a boolean operation
    pub fn is_boolean(&self) -> bool {
        matches!(self, KernelError::BooleanFailed { .. })
    }
}

/// Result type for kernel operations
pub type KernelResult<T> = std::result::Result<T, KernelError>;
