//! # SealTag Core
//!
//! Core data types and error definitions shared by every SealTag crate.
//! Provides the request parameters for a tag build, the 2D point type used
//! by the glyph pipeline and the flattened render mesh handed back to callers.

pub mod data;
pub mod error;

pub use data::{MeshBounds, MeshData, Point2D, TagParams};
pub use error::{MeshError, ParamError};
