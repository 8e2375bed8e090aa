//! Per-face triangulation records produced by a kernel.

use nalgebra::{Isometry3, Point3, Vector3};

/// Tessellation tolerances passed to [`BrepKernel::triangulate`](crate::BrepKernel::triangulate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deflection {
    /// Maximum chordal distance between the surface and the mesh (mm)
    pub linear: f64,
    /// Maximum angle between adjacent facet normals (radians)
    pub angular: f64,
}

impl Deflection {
    pub const fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    pub fn is_valid(&self) -> bool {
        self.linear.is_finite() && self.linear > 0.0 && self.angular.is_finite() && self.angular > 0.0
    }
}

impl Default for Deflection {
    fn default() -> Self {
        Self::new(0.1, 0.1)
    }
}

/// Triangulation of one face, expressed in the face's local frame.
///
/// `triangles` hold 1-based indices into `nodes`. `location` maps the local
/// frame to model space. A `reversed` face has its material on the other
/// side: consumers flip its normals and winding.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTriangulation {
    pub nodes: Vec<Point3<f64>>,
    pub normals: Option<Vec<Vector3<f64>>>,
    pub triangles: Vec<[u32; 3]>,
    pub location: Isometry3<f64>,
    pub reversed: bool,
}

impl FaceTriangulation {
    /// Creates a triangulation in model space without stored normals
    pub fn new(nodes: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            nodes,
            normals: None,
            triangles,
            location: Isometry3::identity(),
            reversed: false,
        }
    }

    pub fn with_location(mut self, location: Isometry3<f64>) -> Self {
        self.location = location;
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Per-node normals: the stored ones, or area-weighted triangle normals
    /// accumulated at each node and normalized.
    ///
    /// Triangles with indices outside `1..=nodes.len()` do not contribute.
    /// Nodes touched by no usable triangle get a zero vector.
    pub fn node_normals(&self) -> Vec<Vector3<f64>> {
        if let Some(normals) = &self.normals {
            if normals.len() == self.nodes.len() {
                return normals.clone();
            }
        }
        self.compute_normals()
    }

    /// Area-weighted node normals from the triangle list
    pub fn compute_normals(&self) -> Vec<Vector3<f64>> {
        let n = self.nodes.len();
        let mut acc = vec![Vector3::zeros(); n];
        for tri in &self.triangles {
            let Some([a, b, c]) = zero_based(*tri, n) else {
                continue;
            };
            // |cross| = 2 * area
            let face = (self.nodes[b] - self.nodes[a]).cross(&(self.nodes[c] - self.nodes[a]));
            for i in [a, b, c] {
                acc[i] += face;
            }
        }
        for normal in &mut acc {
            let len = normal.norm();
            if len > f64::EPSILON {
                *normal /= len;
            } else {
                *normal = Vector3::zeros();
            }
        }
        acc
    }
}

fn zero_based(tri: [u32; 3], node_count: usize) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for (slot, index) in out.iter_mut().zip(tri) {
        let index = index as usize;
        if index == 0 || index > node_count {
            return None;
        }
        *slot = index - 1;
    }
    Some(out)
}
