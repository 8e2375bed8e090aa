//! Planar kernel faces from classified glyph contours.

use nalgebra::{Point3, Vector3};
use sealtag_core::Point2D;
use sealtag_kernel::BrepKernel;
use sealtag_settings::EngravePlane;
use tracing::{debug, trace, warn};

use crate::classify::{regions, ClassifiedContour};
use crate::contour::Contour;

/// Edges shorter than this (in glyph units) are skipped
pub const EDGE_EPSILON: f64 = 1e-6;

/// Maps y-down glyph coordinates onto the text plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneMapping {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub up_axis: Vector3<f64>,
    pub extrude_axis: Vector3<f64>,
}

impl PlaneMapping {
    /// Axes are normalized; the plane is assumed validated
    pub fn from_settings(plane: &EngravePlane) -> Self {
        let v = |a: [f64; 3]| Vector3::new(a[0], a[1], a[2]).normalize();
        Self {
            origin: Point3::new(plane.origin[0], plane.origin[1], plane.origin[2]),
            x_axis: v(plane.x_axis),
            up_axis: v(plane.up_axis),
            extrude_axis: v(plane.extrude_axis),
        }
    }

    pub fn map(&self, p: &Point2D) -> Point3<f64> {
        self.origin + self.x_axis * p.x - self.up_axis * p.y
    }

    /// Sweep vector of length `depth` along the extrude axis
    pub fn extrusion(&self, depth: f64) -> Vector3<f64> {
        self.extrude_axis * depth
    }
}

impl Default for PlaneMapping {
    fn default() -> Self {
        Self::from_settings(&EngravePlane::default())
    }
}

fn build_wire<K: BrepKernel>(
    kernel: &K,
    contour: &Contour,
    mapping: &PlaneMapping,
) -> Option<K::Wire> {
    let points = contour.points();
    let n = points.len();
    let mut edges = Vec::with_capacity(n);
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if a.distance_to(&b) < EDGE_EPSILON {
            continue;
        }
        match kernel.make_segment(mapping.map(&a), mapping.map(&b)) {
            Ok(edge) => edges.push(edge),
            Err(e) => trace!("skipping edge {} -> {}: {}", a, b, e),
        }
    }
    if edges.len() < 3 {
        trace!("skipping wire with {} edges", edges.len());
        return None;
    }
    match kernel.make_wire(&edges) {
        Ok(wire) => Some(wire),
        Err(e) => {
            trace!("skipping wire: {}", e);
            None
        }
    }
}

/// Builds one face per outer contour, with its holes cut in, and gathers
/// them into a compound. Returns `None` when no face could be built.
pub fn build_text_faces<K: BrepKernel>(
    kernel: &K,
    classified: &[ClassifiedContour],
    mapping: &PlaneMapping,
) -> Option<K::Compound> {
    let mut faces = Vec::new();
    for region in regions(classified) {
        let Some(outer) = build_wire(kernel, region.outer, mapping) else {
            continue;
        };
        let mut face = match kernel.make_face(&outer) {
            Ok(face) => face,
            Err(e) => {
                warn!("Skipping glyph region the kernel rejected: {}", e);
                continue;
            }
        };
        for hole in &region.holes {
            let Some(wire) = build_wire(kernel, hole, mapping) else {
                continue;
            };
            if let Err(e) = kernel.add_hole(&mut face, &wire) {
                warn!("Skipping glyph hole the kernel rejected: {}", e);
            }
        }
        faces.push(face);
    }

    debug!("Built {} text faces", faces.len());
    if faces.is_empty() {
        None
    } else {
        Some(kernel.make_compound(faces))
    }
}
