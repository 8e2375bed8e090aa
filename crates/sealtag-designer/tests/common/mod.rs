//! Shared fixtures: a deterministic outline source and a kernel whose
//! booleans always fail.

use nalgebra::{Point3, Vector3};
use sealtag_designer::{FontError, MeshData, OutlineSource, PathCommand, Point2D, TextOutline};
use sealtag_kernel::{
    BrepKernel, CsgCompound, CsgEdge, CsgFace, CsgKernel, CsgSolid, CsgWire, Deflection,
    FaceTriangulation, KernelError, KernelResult,
};

fn corner(mesh: &MeshData, index: u32) -> Vector3<f64> {
    let p = mesh.position(index as usize).unwrap_or_default();
    Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64)
}

/// Enclosed volume of a closed, outward-wound mesh
pub fn mesh_volume(mesh: &MeshData) -> f64 {
    mesh.triangles()
        .map(|[a, b, c]| {
            let (a, b, c) = (corner(mesh, a), corner(mesh, b), corner(mesh, c));
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum()
}

/// Triangles whose winding disagrees with one of their vertex normals
pub fn inward_normal_count(mesh: &MeshData) -> usize {
    mesh.triangles()
        .filter(|&[a, b, c]| {
            let (pa, pb, pc) = (corner(mesh, a), corner(mesh, b), corner(mesh, c));
            let winding = (pb - pa).cross(&(pc - pa));
            if winding.norm() < 1e-9 {
                return false;
            }
            [a, b, c].iter().any(|&i| {
                let n = mesh.normal(i as usize).unwrap_or_default();
                winding.dot(&Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64)) <= 0.0
            })
        })
        .count()
}

/// Draws every character as a square ring: an outer box with one
/// rectangular hole, laid out at a fixed advance of `0.6 * size`.
pub struct RingSource;

impl OutlineSource for RingSource {
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, FontError> {
        let mut commands = Vec::new();
        let mut pen = 0.0;
        for _ in text.chars() {
            let at = |x: f64, y: f64| Point2D::new(pen + x * size, y * size);
            // outer, positive area in y-down space
            commands.push(PathCommand::MoveTo(at(0.05, 0.0)));
            commands.push(PathCommand::LineTo(at(0.05, -0.7)));
            commands.push(PathCommand::LineTo(at(0.55, -0.7)));
            commands.push(PathCommand::LineTo(at(0.55, 0.0)));
            commands.push(PathCommand::Close);
            // hole, opposite winding
            commands.push(PathCommand::MoveTo(at(0.2, -0.2)));
            commands.push(PathCommand::LineTo(at(0.4, -0.2)));
            commands.push(PathCommand::LineTo(at(0.4, -0.5)));
            commands.push(PathCommand::LineTo(at(0.2, -0.5)));
            commands.push(PathCommand::Close);
            pen += 0.6 * size;
        }
        Ok(TextOutline {
            commands,
            advance_width: pen,
            ascender: 0.8 * size,
            descender: -0.2 * size,
        })
    }
}

/// [`CsgKernel`] with `fuse` and `cut` rigged to fail
#[derive(Default)]
pub struct FailingBooleans {
    inner: CsgKernel,
}

impl BrepKernel for FailingBooleans {
    type Edge = CsgEdge;
    type Wire = CsgWire;
    type Face = CsgFace;
    type Compound = CsgCompound;
    type Solid = CsgSolid;

    fn name(&self) -> &'static str {
        "failing-booleans"
    }

    fn make_box(&self, origin: Point3<f64>, size: Vector3<f64>) -> KernelResult<CsgSolid> {
        self.inner.make_box(origin, size)
    }

    fn make_sphere(&self, center: Point3<f64>, radius: f64) -> KernelResult<CsgSolid> {
        self.inner.make_sphere(center, radius)
    }

    fn fuse(&self, _: &CsgSolid, _: &CsgSolid) -> KernelResult<CsgSolid> {
        Err(KernelError::BooleanFailed {
            op: "fuse",
            reason: "rigged".to_string(),
        })
    }

    fn cut(&self, _: &CsgSolid, _: &CsgSolid) -> KernelResult<CsgSolid> {
        Err(KernelError::BooleanFailed {
            op: "cut",
            reason: "rigged".to_string(),
        })
    }

    fn make_segment(&self, start: Point3<f64>, end: Point3<f64>) -> KernelResult<CsgEdge> {
        self.inner.make_segment(start, end)
    }

    fn make_wire(&self, edges: &[CsgEdge]) -> KernelResult<CsgWire> {
        self.inner.make_wire(edges)
    }

    fn make_face(&self, outer: &CsgWire) -> KernelResult<CsgFace> {
        self.inner.make_face(outer)
    }

    fn add_hole(&self, face: &mut CsgFace, hole: &CsgWire) -> KernelResult<()> {
        self.inner.add_hole(face, hole)
    }

    fn make_compound(&self, faces: Vec<CsgFace>) -> CsgCompound {
        self.inner.make_compound(faces)
    }

    fn extrude_face(&self, face: &CsgFace, vector: Vector3<f64>) -> KernelResult<CsgSolid> {
        self.inner.extrude_face(face, vector)
    }

    fn extrude_compound(
        &self,
        compound: &CsgCompound,
        vector: Vector3<f64>,
    ) -> KernelResult<CsgSolid> {
        self.inner.extrude_compound(compound, vector)
    }

    fn edges(&self, solid: &CsgSolid) -> Vec<CsgEdge> {
        self.inner.edges(solid)
    }

    fn fillet(&self, solid: &CsgSolid, radius: f64, edges: &[CsgEdge]) -> KernelResult<CsgSolid> {
        self.inner.fillet(solid, radius, edges)
    }

    fn triangulate(&self, solid: &mut CsgSolid, deflection: Deflection) -> KernelResult<()> {
        self.inner.triangulate(solid, deflection)
    }

    fn face_triangulations(&self, solid: &CsgSolid) -> Vec<Option<FaceTriangulation>> {
        self.inner.face_triangulations(solid)
    }

    fn write_stl(&self, solid: &CsgSolid) -> KernelResult<Vec<u8>> {
        self.inner.write_stl(solid)
    }
}
