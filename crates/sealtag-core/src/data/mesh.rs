//! # Render Mesh
//!
//! Flattened, indexed triangle mesh handed to renderers. Positions and
//! normals are interleaved per vertex as `[x, y, z]` triples in separate
//! buffers; `indices` holds one `u32` triple per triangle.

use crate::error::MeshError;
use serde::{Deserialize, Serialize};

/// A flattened triangle mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions `[x, y, z, x, y, z, ...]`
    pub vertices: Vec<f32>,
    /// Vertex normals `[nx, ny, nz, ...]`
    pub normals: Vec<f32>,
    /// Triangle indices `[i0, i1, i2, ...]`
    pub indices: Vec<u32>,
}

/// Axis-aligned bounds of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl MeshBounds {
    /// Size along each axis
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

impl MeshData {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with room for `vertices` vertices and `triangles` triangles
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends a vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&position);
        self.normals.extend_from_slice(&normal);
        index
    }

    pub fn push_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Position of vertex `index`
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        self.vertices
            .get(index * 3..index * 3 + 3)
            .map(|v| [v[0], v[1], v[2]])
    }

    /// Normal of vertex `index`
    pub fn normal(&self, index: usize) -> Option<[f32; 3]> {
        self.normals
            .get(index * 3..index * 3 + 3)
            .map(|n| [n[0], n[1], n[2]])
    }

    /// Iterates triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<MeshBounds> {
        let mut chunks = self.vertices.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for v in chunks {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some(MeshBounds { min, max })
    }

    /// Checks the buffer invariants renderers rely on.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.vertices.len() != self.normals.len() {
            return Err(MeshError::NormalCountMismatch {
                vertices: self.vertices.len(),
                normals: self.normals.len(),
            });
        }
        if self.vertices.len() % 3 != 0 {
            return Err(MeshError::NotTriples {
                buffer: "vertex",
                len: self.vertices.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::NotTriples {
                buffer: "index",
                len: self.indices.len(),
            });
        }

        let vertex_count = self.vertex_count();
        for (triangle, [a, b, c]) in self.triangles().enumerate() {
            for index in [a, b, c] {
                if index as usize >= vertex_count {
                    return Err(MeshError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
            if a == b || b == c || a == c {
                return Err(MeshError::DegenerateTriangle { triangle });
            }
        }
        Ok(())
    }
}
