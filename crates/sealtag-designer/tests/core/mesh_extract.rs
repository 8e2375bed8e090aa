use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use proptest::prelude::*;
use sealtag_designer::assemble_mesh;
use sealtag_kernel::FaceTriangulation;

fn unit_triangle() -> FaceTriangulation {
    FaceTriangulation::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[1, 2, 3]],
    )
}

#[test]
fn test_empty_input() {
    let mesh = assemble_mesh(Vec::new());
    assert!(mesh.is_empty());
    assert_eq!(mesh.triangle_count(), 0);
}

#[test]
fn test_single_face_is_zero_based() {
    let mesh = assemble_mesh(vec![Some(unit_triangle())]);
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.normal(0).unwrap(), [0.0, 0.0, 1.0]);
    assert!(mesh.validate().is_ok());
}

#[test]
fn test_reversed_face_flips_winding_and_normals() {
    let face = unit_triangle().reversed(true);
    let mesh = assemble_mesh(vec![Some(face)]);
    assert_eq!(mesh.indices, vec![0, 2, 1]);
    for i in 0..3 {
        assert_eq!(mesh.normal(i).unwrap(), [0.0, 0.0, -1.0]);
    }
}

#[test]
fn test_location_moves_positions_and_rotates_normals() {
    // quarter turn about X sends +Z to -Y
    let rotation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2);
    let location = Isometry3::from_parts(Translation3::new(10.0, 0.0, 5.0), rotation);
    let mesh = assemble_mesh(vec![Some(unit_triangle().with_location(location))]);

    let p = mesh.position(2).unwrap();
    assert!((p[0] - 10.0).abs() < 1e-6);
    assert!(p[1].abs() < 1e-6);
    assert!((p[2] - 6.0).abs() < 1e-6);

    let n = mesh.normal(0).unwrap();
    assert!(n[0].abs() < 1e-6);
    assert!((n[1] + 1.0).abs() < 1e-6);
    assert!(n[2].abs() < 1e-6);
}

#[test]
fn test_faces_are_offset_and_missing_ones_skipped() {
    let moved = unit_triangle().with_location(Isometry3::translation(0.0, 0.0, 2.0));
    let mesh = assemble_mesh(vec![Some(unit_triangle()), None, Some(moved)]);
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(mesh.position(3).unwrap(), [0.0, 0.0, 2.0]);
}

#[test]
fn test_bad_triangles_are_dropped() {
    let mut face = unit_triangle();
    face.triangles = vec![[1, 2, 3], [0, 1, 2], [1, 2, 4], [1, 1, 2]];
    let mesh = assemble_mesh(vec![Some(face)]);
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.vertex_count(), 3);
}

#[test]
fn test_stored_normals_are_used() {
    let face = unit_triangle().with_normals(vec![Vector3::new(1.0, 0.0, 0.0); 3]);
    let mesh = assemble_mesh(vec![Some(face)]);
    assert_eq!(mesh.normal(1).unwrap(), [1.0, 0.0, 0.0]);
}

fn arb_face() -> impl Strategy<Value = Option<FaceTriangulation>> {
    let nodes = prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0), 3..12);
    (nodes, any::<bool>(), any::<bool>(), -5.0f64..5.0).prop_flat_map(
        |(nodes, reversed, present, shift)| {
            let n = nodes.len() as u32;
            let tris = prop::collection::vec((0..=n + 1, 0..=n + 1, 0..=n + 1), 0..16);
            tris.prop_map(move |tris| {
                if !present {
                    return None;
                }
                let nodes = nodes.iter().map(|(x, y, z)| Point3::new(*x, *y, *z)).collect();
                let tris = tris.into_iter().map(|(a, b, c)| [a, b, c]).collect();
                Some(
                    FaceTriangulation::new(nodes, tris)
                        .with_location(Isometry3::translation(shift, 0.0, 0.0))
                        .reversed(reversed),
                )
            })
        },
    )
}

proptest! {
    #[test]
    fn prop_assembled_mesh_is_well_formed(faces in prop::collection::vec(arb_face(), 0..6)) {
        let expected_vertices: usize = faces.iter().flatten().map(|f| f.node_count()).sum();
        let mesh = assemble_mesh(faces);
        prop_assert_eq!(mesh.vertex_count(), expected_vertices);
        prop_assert!(mesh.validate().is_ok());
        for tri in mesh.triangles() {
            prop_assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }
}
