//! Small vector-geometry helpers for the CSG adapter.

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Distance below which two points are the same point
pub(crate) const POINT_TOLERANCE: f64 = 1e-6;

/// Newell normal of a closed loop. Its length is twice the enclosed area.
pub(crate) fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut n = Vector3::zeros();
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n
}

/// Right-handed orthonormal frame whose z axis is a plane normal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneFrame {
    pub origin: Point3<f64>,
    pub x: Vector3<f64>,
    pub y: Vector3<f64>,
    pub z: Vector3<f64>,
}

impl PlaneFrame {
    /// `normal` must be non-zero
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let z = normal.normalize();
        let helper = if z.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let x = (helper - z * helper.dot(&z)).normalize();
        let y = z.cross(&x);
        Self { origin, x, y, z }
    }

    pub fn to_local(&self, p: &Point3<f64>) -> Point3<f64> {
        let d = p - self.origin;
        Point3::new(d.dot(&self.x), d.dot(&self.y), d.dot(&self.z))
    }

    pub fn to_local_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    /// Local to model transform
    pub fn isometry(&self) -> Isometry3<f64> {
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            self.x, self.y, self.z,
        ]));
        Isometry3::from_parts(
            Translation3::from(self.origin.coords),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

/// Closed half-space `normal · p <= offset` with a unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HalfSpace {
    pub normal: Vector3<f64>,
    pub offset: f64,
}

impl HalfSpace {
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    pub fn same_as(&self, other: &HalfSpace, tolerance: f64) -> bool {
        (self.normal - other.normal).norm() < tolerance && (self.offset - other.offset).abs() < tolerance
    }

    pub fn shifted(&self, by: f64) -> HalfSpace {
        HalfSpace {
            normal: self.normal,
            offset: self.offset + by,
        }
    }
}

/// Common point of three planes, `None` when two of them are parallel
pub(crate) fn intersect_planes(a: &HalfSpace, b: &HalfSpace, c: &HalfSpace) -> Option<Point3<f64>> {
    let m = Matrix3::from_rows(&[
        a.normal.transpose(),
        b.normal.transpose(),
        c.normal.transpose(),
    ]);
    if m.determinant().abs() < 1e-9 {
        return None;
    }
    let rhs = Vector3::new(a.offset, b.offset, c.offset);
    m.try_inverse().map(|inv| Point3::from(inv * rhs))
}

/// Grid key for matching coincident points
pub(crate) fn point_key(p: &Point3<f64>) -> [i64; 3] {
    let q = |v: f64| (v / POINT_TOLERANCE).round() as i64;
    [q(p.x), q(p.y), q(p.z)]
}

/// Signed area of a 2D ring (counter-clockwise positive)
pub(crate) fn ring_area(ring: &[[f64; 2]]) -> f64 {
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        sum += p[0] * q[1] - q[0] * p[1];
    }
    sum * 0.5
}
