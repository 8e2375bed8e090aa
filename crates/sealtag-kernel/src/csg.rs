//! # CSG Kernel Adapter
//!
//! Implements [`BrepKernel`] over `csgrs`. Solids are polygon meshes, so
//! "faces" of a solid are its polygons and edges are polygon sides. Planar
//! faces built by the caller are kept as 3D rings until they are swept.

use std::collections::HashSet;

use csgrs::mesh::Mesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

use crate::error::{KernelError, KernelResult};
use crate::geometry::{
    intersect_planes, newell_normal, point_key, ring_area, HalfSpace, PlaneFrame, POINT_TOLERANCE,
};
use crate::triangulation::{Deflection, FaceTriangulation};
use crate::BrepKernel;

const KERNEL_NAME: &str = "csgrs";

/// Straight edge between two points
#[derive(Debug, Clone, PartialEq)]
pub struct CsgEdge {
    start: Point3<f64>,
    end: Point3<f64>,
}

impl CsgEdge {
    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Direction-independent identity used to match edges
    fn key(&self) -> ([i64; 3], [i64; 3]) {
        let a = point_key(&self.start);
        let b = point_key(&self.end);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Closed loop of connected edges, stored as its corner points
#[derive(Debug, Clone, PartialEq)]
pub struct CsgWire {
    points: Vec<Point3<f64>>,
}

impl CsgWire {
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn edge_count(&self) -> usize {
        self.points.len()
    }
}

/// Planar face: an outer ring, optional inner rings and the outer ring's normal
#[derive(Debug, Clone, PartialEq)]
pub struct CsgFace {
    outer: Vec<Point3<f64>>,
    holes: Vec<Vec<Point3<f64>>>,
    normal: Vector3<f64>,
}

impl CsgFace {
    /// Unit normal following the outer ring's winding
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    fn on_plane(&self, p: &Point3<f64>) -> bool {
        (p - self.outer[0]).dot(&self.normal).abs() <= POINT_TOLERANCE
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsgCompound {
    faces: Vec<CsgFace>,
}

impl CsgCompound {
    pub fn faces(&self) -> &[CsgFace] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A polygon-mesh solid plus its stored triangulation, if computed
#[derive(Debug, Clone)]
pub struct CsgSolid {
    mesh: Mesh<()>,
    triangulation: Option<Vec<Option<FaceTriangulation>>>,
}

impl CsgSolid {
    fn new(mesh: Mesh<()>) -> Self {
        Self {
            mesh,
            triangulation: None,
        }
    }

    pub fn mesh(&self) -> &Mesh<()> {
        &self.mesh
    }

    pub fn face_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    pub fn is_triangulated(&self) -> bool {
        self.triangulation.is_some()
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self
            .mesh
            .polygons
            .iter()
            .flat_map(|poly| poly.vertices.iter().map(|v| v.pos));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.mesh
            .polygons
            .iter()
            .flat_map(|poly| poly.vertices.iter().map(|v| v.pos))
    }

    /// Supporting planes of every polygon, duplicates merged
    fn support_planes(&self) -> Vec<HalfSpace> {
        let mut planes: Vec<HalfSpace> = Vec::new();
        for poly in &self.mesh.polygons {
            let ring: Vec<Point3<f64>> = poly.vertices.iter().map(|v| v.pos).collect();
            if ring.len() < 3 {
                continue;
            }
            let n = newell_normal(&ring);
            let len = n.norm();
            if len < POINT_TOLERANCE {
                continue;
            }
            let normal = n / len;
            let plane = HalfSpace {
                normal,
                offset: normal.dot(&ring[0].coords),
            };
            if !planes.iter().any(|p| p.same_as(&plane, 1e-6)) {
                planes.push(plane);
            }
        }
        planes
    }
}

/// [`BrepKernel`] over `csgrs` polygon meshes.
///
/// Curved primitives are faceted at construction time using the configured
/// sphere resolution.
#[derive(Debug, Clone)]
pub struct CsgKernel {
    sphere_segments: usize,
    sphere_stacks: usize,
    fillet_segments: usize,
    fillet_stacks: usize,
}

impl Default for CsgKernel {
    fn default() -> Self {
        Self {
            sphere_segments: 32,
            sphere_stacks: 16,
            fillet_segments: 16,
            fillet_stacks: 8,
        }
    }
}

impl CsgKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Facet counts for [`BrepKernel::make_sphere`]
    pub fn with_sphere_resolution(mut self, segments: usize, stacks: usize) -> Self {
        self.sphere_segments = segments.max(3);
        self.sphere_stacks = stacks.max(2);
        self
    }

    /// Facet counts for the rounding spheres placed by [`BrepKernel::fillet`]
    pub fn with_fillet_resolution(mut self, segments: usize, stacks: usize) -> Self {
        self.fillet_segments = segments.max(3);
        self.fillet_stacks = stacks.max(2);
        self
    }

    fn sweep(&self, face: &CsgFace, vector: Vector3<f64>) -> KernelResult<Mesh<()>> {
        let along = vector.dot(&face.normal);
        if along.abs() <= POINT_TOLERANCE {
            return Err(KernelError::Extrusion(
                "sweep vector lies in the face plane".to_string(),
            ));
        }

        // Local +z points along the sweep so the sketch extrudes upward.
        let frame = PlaneFrame::new(face.outer[0], face.normal * along.signum());
        let mut sketch = Sketch::polygon(&project_ring(&frame, &face.outer), None);
        for hole in &face.holes {
            sketch = sketch.difference(&Sketch::polygon(&project_ring(&frame, hole), None));
        }

        let local = frame.to_local_vector(&vector);
        let prism = if local.x.abs() <= POINT_TOLERANCE && local.y.abs() <= POINT_TOLERANCE {
            sketch.extrude(local.z)
        } else {
            sketch.extrude_vector(local)
        };
        let mesh = prism.transform(&frame.isometry().to_homogeneous());
        if mesh.polygons.is_empty() {
            return Err(KernelError::Extrusion("sweep produced no faces".to_string()));
        }
        Ok(mesh)
    }

    fn unsupported(&self, what: impl Into<String>) -> KernelError {
        KernelError::Unsupported {
            kernel: KERNEL_NAME,
            what: what.into(),
        }
    }
}

/// Projects a ring into `frame`'s plane, wound counter-clockwise
fn project_ring(frame: &PlaneFrame, ring: &[Point3<f64>]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = ring
        .iter()
        .map(|p| {
            let local = frame.to_local(p);
            [local.x, local.y]
        })
        .collect();
    if ring_area(&out) < 0.0 {
        out.reverse();
    }
    out
}

fn positive(name: &str, value: f64) -> KernelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::Construction(format!(
            "{name} must be a finite value > 0, got {value}"
        )))
    }
}

impl BrepKernel for CsgKernel {
    type Edge = CsgEdge;
    type Wire = CsgWire;
    type Face = CsgFace;
    type Compound = CsgCompound;
    type Solid = CsgSolid;

    fn name(&self) -> &'static str {
        KERNEL_NAME
    }

    fn make_box(&self, origin: Point3<f64>, size: Vector3<f64>) -> KernelResult<CsgSolid> {
        positive("box width", size.x)?;
        positive("box length", size.y)?;
        positive("box height", size.z)?;

        let (x0, y0, z0) = (origin.x, origin.y, origin.z);
        let (x1, y1, z1) = (x0 + size.x, y0 + size.y, z0 + size.z);
        let points = [
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ];
        let faces: [&[usize]; 6] = [
            &[0, 3, 2, 1],
            &[4, 5, 6, 7],
            &[0, 1, 5, 4],
            &[3, 7, 6, 2],
            &[0, 4, 7, 3],
            &[1, 2, 6, 5],
        ];
        let mesh = Mesh::polyhedron(&points, &faces, None)
            .map_err(|e| KernelError::Construction(format!("box: {e:?}")))?;
        Ok(CsgSolid::new(mesh))
    }

    fn make_sphere(&self, center: Point3<f64>, radius: f64) -> KernelResult<CsgSolid> {
        positive("sphere radius", radius)?;
        let mesh = Mesh::sphere(radius, self.sphere_segments, self.sphere_stacks, None)
            .translate(center.x, center.y, center.z);
        Ok(CsgSolid::new(mesh))
    }

    fn fuse(&self, a: &CsgSolid, b: &CsgSolid) -> KernelResult<CsgSolid> {
        if a.is_empty() && b.is_empty() {
            return Err(KernelError::BooleanFailed {
                op: "fuse",
                reason: "both operands are empty".to_string(),
            });
        }
        let mesh = a.mesh.union(&b.mesh);
        debug!(
            "fuse: {} + {} -> {} polygons",
            a.face_count(),
            b.face_count(),
            mesh.polygons.len()
        );
        if mesh.polygons.is_empty() {
            return Err(KernelError::BooleanFailed {
                op: "fuse",
                reason: "result has no faces".to_string(),
            });
        }
        Ok(CsgSolid::new(mesh))
    }

    fn cut(&self, body: &CsgSolid, tool: &CsgSolid) -> KernelResult<CsgSolid> {
        if body.is_empty() {
            return Err(KernelError::BooleanFailed {
                op: "cut",
                reason: "body is empty".to_string(),
            });
        }
        let mesh = body.mesh.difference(&tool.mesh);
        debug!(
            "cut: {} - {} -> {} polygons",
            body.face_count(),
            tool.face_count(),
            mesh.polygons.len()
        );
        if mesh.polygons.is_empty() {
            return Err(KernelError::BooleanFailed {
                op: "cut",
                reason: "result has no faces".to_string(),
            });
        }
        let finite = mesh
            .polygons
            .iter()
            .flat_map(|poly| poly.vertices.iter())
            .all(|v| v.pos.iter().all(|c| c.is_finite()));
        if !finite {
            return Err(KernelError::BooleanFailed {
                op: "cut",
                reason: "result has non-finite vertices".to_string(),
            });
        }
        Ok(CsgSolid::new(mesh))
    }

    fn make_segment(&self, start: Point3<f64>, end: Point3<f64>) -> KernelResult<CsgEdge> {
        if (end - start).norm() <= POINT_TOLERANCE {
            return Err(KernelError::Construction(format!(
                "segment endpoints coincide at {start}"
            )));
        }
        Ok(CsgEdge { start, end })
    }

    fn make_wire(&self, edges: &[CsgEdge]) -> KernelResult<CsgWire> {
        if edges.len() < 3 {
            return Err(KernelError::Construction(format!(
                "a closed wire needs at least 3 edges, got {}",
                edges.len()
            )));
        }
        for (i, edge) in edges.iter().enumerate() {
            let next = &edges[(i + 1) % edges.len()];
            if (next.start - edge.end).norm() > POINT_TOLERANCE {
                return Err(KernelError::Construction(format!(
                    "edge {i} does not connect to edge {}",
                    (i + 1) % edges.len()
                )));
            }
        }
        Ok(CsgWire {
            points: edges.iter().map(|e| e.start).collect(),
        })
    }

    fn make_face(&self, outer: &CsgWire) -> KernelResult<CsgFace> {
        let n = newell_normal(&outer.points);
        let len = n.norm();
        if len <= POINT_TOLERANCE * POINT_TOLERANCE {
            return Err(KernelError::Construction(
                "face boundary encloses no area".to_string(),
            ));
        }
        let face = CsgFace {
            outer: outer.points.clone(),
            holes: Vec::new(),
            normal: n / len,
        };
        if !outer.points.iter().all(|p| face.on_plane(p)) {
            return Err(KernelError::Construction(
                "face boundary is not planar".to_string(),
            ));
        }
        Ok(face)
    }

    fn add_hole(&self, face: &mut CsgFace, hole: &CsgWire) -> KernelResult<()> {
        if !hole.points.iter().all(|p| face.on_plane(p)) {
            return Err(KernelError::Construction(
                "hole does not lie in the face plane".to_string(),
            ));
        }
        face.holes.push(hole.points.clone());
        Ok(())
    }

    fn make_compound(&self, faces: Vec<CsgFace>) -> CsgCompound {
        CsgCompound { faces }
    }

    fn extrude_face(&self, face: &CsgFace, vector: Vector3<f64>) -> KernelResult<CsgSolid> {
        self.sweep(face, vector).map(CsgSolid::new)
    }

    fn extrude_compound(
        &self,
        compound: &CsgCompound,
        vector: Vector3<f64>,
    ) -> KernelResult<CsgSolid> {
        let mut faces = compound.faces.iter();
        let first = faces
            .next()
            .ok_or_else(|| KernelError::Extrusion("compound has no faces".to_string()))?;
        let mut mesh = self.sweep(first, vector)?;
        for face in faces {
            mesh = mesh.union(&self.sweep(face, vector)?);
        }
        debug!(
            "extruded {} faces into {} polygons",
            compound.len(),
            mesh.polygons.len()
        );
        Ok(CsgSolid::new(mesh))
    }

    fn edges(&self, solid: &CsgSolid) -> Vec<CsgEdge> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for poly in &solid.mesh.polygons {
            let count = poly.vertices.len();
            for i in 0..count {
                let edge = CsgEdge {
                    start: poly.vertices[i].pos,
                    end: poly.vertices[(i + 1) % count].pos,
                };
                if edge.length() > POINT_TOLERANCE && seen.insert(edge.key()) {
                    out.push(edge);
                }
            }
        }
        out
    }

    /// Rounds every edge of a convex solid.
    ///
    /// The result is the convex hull of spheres of `radius` centred on the
    /// corners of the solid shrunk inward by `radius`. Rounding only some
    /// edges, or rounding a concave solid, is not supported.
    fn fillet(&self, solid: &CsgSolid, radius: f64, edges: &[CsgEdge]) -> KernelResult<CsgSolid> {
        if edges.is_empty() {
            return Ok(solid.clone());
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(KernelError::Fillet(format!(
                "radius must be a finite value > 0, got {radius}"
            )));
        }

        let selected: HashSet<_> = edges.iter().map(CsgEdge::key).collect();
        if self.edges(solid).iter().any(|e| !selected.contains(&e.key())) {
            return Err(self.unsupported("rounding a subset of the solid's edges"));
        }

        let planes = solid.support_planes();
        let scale = solid
            .bounds()
            .map(|(lo, hi)| (hi - lo).norm())
            .unwrap_or(1.0)
            .max(1.0);
        let tolerance = 1e-6 * scale;
        let convex = solid
            .vertices()
            .all(|v| planes.iter().all(|p| p.signed_distance(&v) <= tolerance));
        if !convex {
            return Err(self.unsupported("rounding a non-convex solid"));
        }

        let shrunk: Vec<HalfSpace> = planes.iter().map(|p| p.shifted(-radius)).collect();
        let mut corners: Vec<Point3<f64>> = Vec::new();
        let mut keys = HashSet::new();
        for i in 0..shrunk.len() {
            for j in (i + 1)..shrunk.len() {
                for k in (j + 1)..shrunk.len() {
                    let Some(p) = intersect_planes(&shrunk[i], &shrunk[j], &shrunk[k]) else {
                        continue;
                    };
                    let inside = shrunk.iter().all(|h| h.signed_distance(&p) <= tolerance);
                    if inside && keys.insert(point_key(&p)) {
                        corners.push(p);
                    }
                }
            }
        }
        trace!("fillet: {} planes, {} shrunk corners", planes.len(), corners.len());
        if corners.len() < 4 {
            return Err(KernelError::Fillet(format!(
                "radius {radius} is too large for this solid"
            )));
        }

        let sphere = Mesh::sphere(radius, self.fillet_segments, self.fillet_stacks, None);
        let mut spheres = corners.iter().map(|c| sphere.translate(c.x, c.y, c.z));
        let mut cloud = spheres
            .next()
            .ok_or_else(|| KernelError::Fillet("no corners to round".to_string()))?;
        for s in spheres {
            cloud = cloud.union(&s);
        }
        let rounded = cloud.convex_hull();
        if rounded.polygons.is_empty() {
            return Err(KernelError::Fillet("hull produced no faces".to_string()));
        }
        Ok(CsgSolid::new(rounded))
    }

    /// Splits every polygon into a triangle fan in the polygon's own frame.
    ///
    /// Curved surfaces were faceted when they were built, so `deflection` is
    /// only checked for validity.
    fn triangulate(&self, solid: &mut CsgSolid, deflection: Deflection) -> KernelResult<()> {
        if !deflection.is_valid() {
            return Err(KernelError::Triangulation(format!(
                "deflection must be positive, got {deflection:?}"
            )));
        }

        let faces = solid
            .mesh
            .polygons
            .iter()
            .map(|poly| {
                let ring: Vec<Point3<f64>> = poly.vertices.iter().map(|v| v.pos).collect();
                if ring.len() < 3 {
                    return None;
                }
                let n = newell_normal(&ring);
                if n.norm() <= POINT_TOLERANCE * POINT_TOLERANCE {
                    return None;
                }
                let frame = PlaneFrame::new(ring[0], n);
                let nodes = ring.iter().map(|p| frame.to_local(p)).collect();
                let normals = poly
                    .vertices
                    .iter()
                    .map(|v| {
                        // booleans can leave vertex normals facing into the material
                        let normal = if v.normal.dot(&n) < 0.0 { -v.normal } else { v.normal };
                        frame.to_local_vector(&normal)
                    })
                    .collect();
                let triangles = (2..ring.len() as u32).map(|i| [1, i, i + 1]).collect();
                Some(
                    FaceTriangulation::new(nodes, triangles)
                        .with_normals(normals)
                        .with_location(frame.isometry()),
                )
            })
            .collect::<Vec<_>>();

        debug!(
            "triangulated {} of {} faces",
            faces.iter().filter(|f| f.is_some()).count(),
            faces.len()
        );
        solid.triangulation = Some(faces);
        Ok(())
    }

    fn face_triangulations(&self, solid: &CsgSolid) -> Vec<Option<FaceTriangulation>> {
        match &solid.triangulation {
            Some(faces) => faces.clone(),
            None => vec![None; solid.face_count()],
        }
    }

    fn write_stl(&self, solid: &CsgSolid) -> KernelResult<Vec<u8>> {
        solid
            .mesh
            .to_stl_binary("sealtag")
            .map_err(|e| KernelError::Export(e.to_string()))
    }
}
