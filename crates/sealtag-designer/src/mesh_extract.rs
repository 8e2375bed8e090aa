//! Kernel face triangulations to one indexed render mesh.
//!
//! Faces are appended in enumeration order. Positions go through the face
//! location; normals are rotated by it and negated on reversed faces, whose
//! triangles also get their second and third index swapped so every
//! triangle winds outward.

use sealtag_core::MeshData;
use sealtag_kernel::{BrepKernel, Deflection, FaceTriangulation, KernelResult};
use tracing::{debug, trace};

/// Triangulates `solid` and assembles its faces into a [`MeshData`]
pub fn extract_mesh<K: BrepKernel>(
    kernel: &K,
    solid: &mut K::Solid,
    deflection: Deflection,
) -> KernelResult<MeshData> {
    kernel.triangulate(solid, deflection)?;
    Ok(assemble_mesh(kernel.face_triangulations(solid)))
}

/// Concatenates face triangulations; `None` entries are skipped
pub fn assemble_mesh<I>(faces: I) -> MeshData
where
    I: IntoIterator<Item = Option<FaceTriangulation>>,
{
    let mut mesh = MeshData::new();
    let mut offset: usize = 0;
    let mut dropped = 0usize;

    for face in faces.into_iter().flatten() {
        let normals = face.node_normals();
        let sign = if face.reversed { -1.0 } else { 1.0 };
        for (node, normal) in face.nodes.iter().zip(&normals) {
            let p = face.location * node;
            let n = face.location.rotation * normal * sign;
            mesh.push_vertex(
                [p.x as f32, p.y as f32, p.z as f32],
                [n.x as f32, n.y as f32, n.z as f32],
            );
        }

        let count = face.node_count();
        for tri in &face.triangles {
            let [a, b, c] = tri.map(|i| i as usize);
            let in_range = [a, b, c].iter().all(|&i| i >= 1 && i <= count);
            if !in_range || a == b || b == c || a == c {
                trace!("dropping triangle {:?} of {}-node face", tri, count);
                dropped += 1;
                continue;
            }
            let [a, b, c] = [a, b, c].map(|i| (offset + i - 1) as u32);
            if face.reversed {
                mesh.push_triangle(a, c, b);
            } else {
                mesh.push_triangle(a, b, c);
            }
        }
        offset += count;
    }

    debug!(
        "Assembled mesh: {} vertices, {} triangles ({} dropped)",
        mesh.vertex_count(),
        mesh.triangle_count(),
        dropped
    );
    mesh
}
