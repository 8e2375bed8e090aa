use nalgebra::Vector3;
use sealtag_designer::{
    build_contours, build_text_faces, classify_contours, OutlineSource, PlaneMapping, Point2D,
};
use sealtag_kernel::{BrepKernel, CsgKernel};

use crate::common::RingSource;

#[test]
fn test_default_mapping() {
    let mapping = PlaneMapping::default();
    let p = mapping.map(&Point2D::new(1.0, 2.0));
    assert!((p.x - 1.0).abs() < 1e-12);
    assert!((p.y + 0.01).abs() < 1e-12);
    assert!((p.z + 2.0).abs() < 1e-12);
    assert_eq!(mapping.extrusion(0.5), Vector3::new(0.0, 0.5, 0.0));
}

#[test]
fn test_ring_glyph_becomes_face_with_hole() {
    let kernel = CsgKernel::new();
    let outline = RingSource.outline("O", 10.0).unwrap().centered();
    let classified = classify_contours(build_contours(&outline.commands, 8));
    assert_eq!(classified.len(), 2);

    let compound = build_text_faces(&kernel, &classified, &PlaneMapping::default()).unwrap();
    assert_eq!(compound.len(), 1);
    assert_eq!(compound.faces()[0].hole_count(), 1);
    // every face lies in the y = -0.01 plane
    assert!(compound.faces()[0].normal().y.abs() > 0.999);
}

#[test]
fn test_faces_per_glyph() {
    let kernel = CsgKernel::new();
    let outline = RingSource.outline("ABC", 5.0).unwrap().centered();
    let classified = classify_contours(build_contours(&outline.commands, 8));
    let compound = build_text_faces(&kernel, &classified, &PlaneMapping::default()).unwrap();
    assert_eq!(compound.len(), 3);

    let tool = kernel
        .extrude_compound(&compound, PlaneMapping::default().extrusion(1.0))
        .unwrap();
    let (min, max) = tool.bounds().unwrap();
    assert!((min.y + 0.01).abs() < 1e-6);
    assert!((max.y - 0.99).abs() < 1e-6);
    // three glyphs of 0.6 * 5 advance, centered
    assert!((min.x + 4.25).abs() < 1e-6);
    assert!((max.x - 4.25).abs() < 1e-6);
}

#[test]
fn test_nothing_buildable_gives_none() {
    let kernel = CsgKernel::new();
    assert!(build_text_faces(&kernel, &[], &PlaneMapping::default()).is_none());
}
