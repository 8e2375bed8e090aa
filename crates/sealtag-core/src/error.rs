//! Error handling for SealTag
//!
//! Provides the error types for the shared data layer:
//! - Parameter errors (invalid tag dimensions)
//! - Mesh errors (render mesh invariant violations)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Tag parameter error type
///
/// Raised when a build request carries dimensions that cannot describe a solid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A dimension is zero, negative or not a finite number
    #[error("Parameter '{name}' must be a finite value > 0, got {value}")]
    NotPositive {
        /// The parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Render mesh error type
///
/// Describes which invariant of a flattened triangle mesh does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Vertex and normal buffers disagree in length
    #[error("Vertex buffer has {vertices} floats but normal buffer has {normals}")]
    NormalCountMismatch {
        /// Length of the vertex buffer.
        vertices: usize,
        /// Length of the normal buffer.
        normals: usize,
    },

    /// A buffer length is not a multiple of three
    #[error("{buffer} buffer length {len} is not a multiple of 3")]
    NotTriples {
        /// Name of the offending buffer.
        buffer: &'static str,
        /// Its length.
        len: usize,
    },

    /// A triangle references a vertex that does not exist
    #[error("Triangle {triangle} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange {
        /// Triangle number.
        triangle: usize,
        /// Offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A triangle uses the same vertex twice
    #[error("Triangle {triangle} is degenerate (repeated vertex index)")]
    DegenerateTriangle {
        /// Triangle number.
        triangle: usize,
    },
}
