//! Data models for tag requests and geometry
//!
//! This module provides:
//! - 2D points in glyph/outline space
//! - Tag build parameters with validation
//! - The flattened render mesh returned to callers

pub mod mesh;

pub use mesh::{MeshBounds, MeshData};

use crate::error::ParamError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate in glyph outline space (font units or millimeters after scaling)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2D {
    /// Creates a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point shifted by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

fn default_text_height() -> f64 {
    1.0
}

/// Parameters of a single tag build request.
///
/// All dimensions are millimeters. `text_height` is a scale applied to the
/// engraving depth, not a font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagParams {
    /// Extent along X (prism length)
    pub width: f64,
    /// Extent along Z (base of the triangular profile)
    pub depth: f64,
    /// Extent along Y (apex of the triangular profile)
    pub height: f64,
    /// Text engraved into the bottom face; empty skips engraving
    #[serde(default)]
    pub text: String,
    /// Engraving depth scale
    #[serde(default = "default_text_height")]
    pub text_height: f64,
}

impl TagParams {
    /// Creates parameters with the default engraving depth scale
    pub fn new(width: f64, depth: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            width,
            depth,
            height,
            text: text.into(),
            text_height: default_text_height(),
        }
    }

    /// Sets the engraving depth scale
    pub fn with_text_height(mut self, text_height: f64) -> Self {
        self.text_height = text_height;
        self
    }

    /// Whether this request asks for engraving at all
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Checks that every numeric field is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (name, value) in [
            ("width", self.width),
            ("depth", self.depth),
            ("height", self.height),
            ("text_height", self.text_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParamError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

impl Default for TagParams {
    fn default() -> Self {
        Self::new(40.0, 40.0, 15.0, "")
    }
}
