use sealtag_designer::{GeometryService, TagParams};
use sealtag_kernel::CsgKernel;
use sealtag_settings::Config;
use tempfile::tempdir;

#[tokio::test]
async fn test_config_file_drives_service() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sealtag").join("config.toml");

    let mut config = Config::default();
    config.body.fillet_radius = 0.0;
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let service = GeometryService::start(loaded, || Ok(CsgKernel::new()))
        .await
        .unwrap();
    let mesh = service
        .build(TagParams::new(20.0, 10.0, 5.0, ""))
        .await
        .unwrap();
    mesh.validate().unwrap();
    // two triangular caps and three quads at least
    assert!(mesh.triangle_count() >= 8);

    let stl_path = dir.path().join("tag.stl");
    std::fs::write(&stl_path, service.export().await.unwrap()).unwrap();
    let bytes = std::fs::read(&stl_path).unwrap();
    // 80-byte header, u32 count, 50 bytes per facet
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    assert!(count >= 8);
    assert_eq!(bytes.len(), 84 + 50 * count);
}
