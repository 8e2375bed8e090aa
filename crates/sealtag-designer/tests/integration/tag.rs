use std::io::Cursor;
use std::path::PathBuf;

use sealtag_designer::{
    extract_mesh, BuildError, EngraveOutcome, FontError, SystemFontSource, TagBuilder, TagParams,
};
use sealtag_kernel::{BrepKernel, CsgKernel, Deflection};
use sealtag_settings::Config;

use crate::common::{inward_normal_count, mesh_volume, FailingBooleans, RingSource};

fn params(text: &str) -> TagParams {
    TagParams::new(40.0, 40.0, 15.0, text)
}

#[test]
fn test_body_bounds() {
    let kernel = CsgKernel::new();
    let mut config = Config::default();
    config.body.fillet_radius = 0.0;
    let body = TagBuilder::new(&kernel, &config)
        .build_body(&params(""))
        .unwrap();

    let (min, max) = body.bounds().unwrap();
    assert!((min.x + 20.0).abs() < 1e-6 && (max.x - 20.0).abs() < 1e-6);
    assert!(min.y.abs() < 1e-6 && (max.y - 15.0).abs() < 1e-6);
    assert!((min.z + 20.0).abs() < 1e-6 && (max.z - 20.0).abs() < 1e-6);
}

#[test]
fn test_rounded_body_stays_inside_sharp_one() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let body = TagBuilder::new(&kernel, &config)
        .build_body(&params(""))
        .unwrap();

    let (min, max) = body.bounds().unwrap();
    assert!(min.x >= -20.0 - 1e-6 && max.x <= 20.0 + 1e-6);
    assert!(min.y >= -1e-6 && max.y <= 15.0 + 1e-6);
    assert!(min.z >= -20.0 - 1e-6 && max.z <= 20.0 + 1e-6);
}

#[test]
fn test_empty_text_is_plain_body() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config);

    let model = builder.build(&params("")).unwrap();
    assert_eq!(model.engraving, EngraveOutcome::Skipped);

    let mut body = builder.build_body(&params("")).unwrap();
    let expected = extract_mesh(&kernel, &mut body, Deflection::default()).unwrap();
    assert_eq!(model.mesh, expected);
    assert!(model.mesh.validate().is_ok());
}

#[test]
fn test_text_is_engraved() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config).with_outline_source(&RingSource);

    let plain = builder.build(&params("")).unwrap();
    let engraved = builder.build(&params("AB")).unwrap();
    assert!(engraved.engraving.is_engraved());
    assert_ne!(engraved.mesh, plain.mesh);
    assert!(engraved.mesh.triangle_count() > plain.mesh.triangle_count());
    assert!(engraved.mesh.validate().is_ok());

    // the cut only removes material, so the envelope is unchanged
    let (a, b) = (plain.mesh.bounds().unwrap(), engraved.mesh.bounds().unwrap());
    for i in 0..3 {
        assert!((a.min[i] - b.min[i]).abs() < 1e-3);
        assert!((a.max[i] - b.max[i]).abs() < 1e-3);
    }

    // two rings of 0.29 * 16^2 mm^2 each, cut 0.75 mm deep
    let removed = mesh_volume(&plain.mesh) - mesh_volume(&engraved.mesh);
    assert!(removed > 80.0 && removed < 140.0, "removed {removed} mm^3");
    assert_eq!(inward_normal_count(&engraved.mesh), 0);

    let bytes = kernel.write_stl(&engraved.solid).unwrap();
    let stl = stl_io::read_stl(&mut Cursor::new(bytes)).unwrap();
    assert!(!stl.faces.is_empty());
}

#[test]
fn test_builds_are_repeatable() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config).with_outline_source(&RingSource);

    let first = builder.build(&params("7")).unwrap();
    let second = builder.build(&params("7")).unwrap();
    assert_eq!(first.mesh, second.mesh);
}

#[test]
fn test_text_height_scales_depth() {
    let config = Config::default();
    let shallow = config.engrave.engrave_depth(15.0, 1.0);
    let deep = config.engrave.engrave_depth(15.0, 2.0);
    assert!((shallow - 0.76).abs() < 1e-12);
    assert!((deep - 1.51).abs() < 1e-12);

    let kernel = CsgKernel::new();
    let builder = TagBuilder::new(&kernel, &config).with_outline_source(&RingSource);
    let model = builder
        .build(&params("A").with_text_height(2.0))
        .unwrap();
    assert!(model.engraving.is_engraved());
}

#[test]
fn test_failed_cut_keeps_body() {
    let kernel = FailingBooleans::default();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config).with_outline_source(&RingSource);

    let engraved = builder.build(&params("AB")).unwrap();
    let plain = builder.build(&params("")).unwrap();
    assert!(matches!(engraved.engraving, EngraveOutcome::Failed { .. }));
    assert_eq!(engraved.mesh, plain.mesh);
}

#[test]
fn test_invalid_params_are_rejected() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config);

    for bad in [
        TagParams::new(0.0, 40.0, 15.0, ""),
        TagParams::new(40.0, -1.0, 15.0, ""),
        TagParams::new(40.0, 40.0, f64::NAN, ""),
    ] {
        assert!(matches!(
            builder.build(&bad),
            Err(BuildError::InvalidParams(_))
        ));
    }
}

#[test]
fn test_missing_font_only_matters_with_text() {
    let kernel = CsgKernel::new();
    let mut config = Config::default();
    config.font.path = Some(PathBuf::from("/nonexistent/sealtag/missing.ttf"));
    let builder = TagBuilder::new(&kernel, &config);

    assert!(builder.build(&params("")).is_ok());
    assert!(matches!(
        builder.build(&params("A")),
        Err(BuildError::Font(FontError::Read { .. }))
    ));
}

#[test]
fn test_font_size_tracks_text_length() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let builder = TagBuilder::new(&kernel, &config);

    assert!((builder.font_size(&params("A")) - 16.0).abs() < 1e-12);
    assert!((builder.font_size(&params("ABCDEFGH")) - 40.0 * 0.8 / (8.0 * 0.6)).abs() < 1e-12);
}

#[test]
fn test_system_font_engraving() {
    let config = Config::default();
    let Ok(source) = SystemFontSource::from_settings(&config.font) else {
        eprintln!("no system font available, skipping");
        return;
    };
    let kernel = CsgKernel::new();
    let builder = TagBuilder::new(&kernel, &config).with_outline_source(&source);
    let plain = builder.build(&params("")).unwrap();
    let model = builder.build(&params("A")).unwrap();
    assert!(model.mesh.validate().is_ok());
    assert!(model.engraving.is_engraved(), "{:?}", model.engraving);
    assert!(mesh_volume(&model.mesh) < mesh_volume(&plain.mesh) - 1.0);
}

#[test]
fn test_sample_solid() {
    let kernel = CsgKernel::new();
    let config = Config::default();
    let model = TagBuilder::new(&kernel, &config).build_sample().unwrap();

    assert!(model.mesh.validate().is_ok());
    // the cavity's vertex normals point toward the sphere center
    assert_eq!(inward_normal_count(&model.mesh), 0);
    let volume = mesh_volume(&model.mesh);
    assert!(volume > 0.0 && volume < 1.0);
    let bounds = model.mesh.bounds().unwrap();
    for i in 0..3 {
        assert!(bounds.min[i].abs() < 1e-4);
        assert!((bounds.max[i] - 1.0).abs() < 1e-4);
    }
}

#[test]
fn test_font_families_are_sorted_and_unique() {
    let families = sealtag_designer::font_manager::list_font_families();
    assert!(families.windows(2).all(|pair| pair[0] < pair[1]));
}
