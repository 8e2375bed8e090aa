//! # SealTag Kernel
//!
//! The solid modelling capabilities the tag pipeline needs, expressed as the
//! [`BrepKernel`] trait. Geometry handles are associated types: callers build
//! and combine them but never look inside.
//!
//! [`CsgKernel`] implements the trait on top of the `csgrs` CSG library.

pub mod csg;
pub mod error;
mod geometry;
pub mod triangulation;

pub use csg::{CsgCompound, CsgEdge, CsgFace, CsgKernel, CsgSolid, CsgWire};
pub use error::{KernelError, KernelResult};
pub use triangulation::{Deflection, FaceTriangulation};

pub use nalgebra::{Isometry3, Point3, Vector3};

/// Boundary-representation operations used to build, combine, tessellate and
/// export solids.
///
/// Handles are only meaningful to the kernel that produced them.
pub trait BrepKernel {
    type Edge: Clone;
    type Wire;
    type Face;
    type Compound;
    type Solid: Clone;

    /// Short identifier used in logs and errors
    fn name(&self) -> &'static str;

    /// Axis-aligned box with one corner at `origin`
    fn make_box(&self, origin: Point3<f64>, size: Vector3<f64>) -> KernelResult<Self::Solid>;

    fn make_sphere(&self, center: Point3<f64>, radius: f64) -> KernelResult<Self::Solid>;

    /// Union of two solids
    fn fuse(&self, a: &Self::Solid, b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// `body` minus `tool`
    fn cut(&self, body: &Self::Solid, tool: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Straight edge between two distinct points
    fn make_segment(&self, start: Point3<f64>, end: Point3<f64>) -> KernelResult<Self::Edge>;

    /// Closed wire from consecutive edges
    fn make_wire(&self, edges: &[Self::Edge]) -> KernelResult<Self::Wire>;

    /// Planar face bounded by `outer`
    fn make_face(&self, outer: &Self::Wire) -> KernelResult<Self::Face>;

    /// Adds an inner boundary to a planar face
    fn add_hole(&self, face: &mut Self::Face, hole: &Self::Wire) -> KernelResult<()>;

    fn make_compound(&self, faces: Vec<Self::Face>) -> Self::Compound;

    /// Linear sweep of a face along `vector`
    fn extrude_face(&self, face: &Self::Face, vector: Vector3<f64>) -> KernelResult<Self::Solid>;

    /// Linear sweep of every face in a compound, as one solid
    fn extrude_compound(
        &self,
        compound: &Self::Compound,
        vector: Vector3<f64>,
    ) -> KernelResult<Self::Solid>;

    /// Every edge of the solid, each reported once
    fn edges(&self, solid: &Self::Solid) -> Vec<Self::Edge>;

    /// Rounds the given edges with a constant radius
    fn fillet(
        &self,
        solid: &Self::Solid,
        radius: f64,
        edges: &[Self::Edge],
    ) -> KernelResult<Self::Solid>;

    /// Computes and stores the face triangulations of `solid`
    fn triangulate(&self, solid: &mut Self::Solid, deflection: Deflection) -> KernelResult<()>;

    /// Stored triangulation of each face in enumeration order; `None` for
    /// faces that have not been triangulated
    fn face_triangulations(&self, solid: &Self::Solid) -> Vec<Option<FaceTriangulation>>;

    /// Binary STL encoding of the solid
    fn write_stl(&self, solid: &Self::Solid) -> KernelResult<Vec<u8>>;
}
