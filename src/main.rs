use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sealtag::{init_logging, Config, GeometryService, TagParams, BUILD_DATE, VERSION};
use tracing::info;

/// Builds a seal tag and writes its STL and/or render mesh
#[derive(Debug, Parser)]
#[command(name = "sealtag", version)]
struct Cli {
    /// Body width along X (mm)
    #[arg(long, default_value_t = 40.0)]
    width: f64,

    /// Body depth along Z (mm)
    #[arg(long, default_value_t = 40.0)]
    depth: f64,

    /// Body height along Y (mm)
    #[arg(long, default_value_t = 15.0)]
    height: f64,

    /// Text engraved into the bottom face
    #[arg(long, default_value = "")]
    text: String,

    /// Engraving depth multiplier
    #[arg(long, default_value_t = 1.0)]
    text_height: f64,

    /// Configuration file (.toml or .json); defaults to the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the solid as binary STL
    #[arg(long)]
    stl: Option<PathBuf>,

    /// Write the render mesh as JSON
    #[arg(long)]
    mesh_json: Option<PathBuf>,

    /// Build the box-minus-sphere sample instead of a tag
    #[arg(long)]
    sample: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Config::load_or_default().context("loading default config"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    info!("sealtag {} (built {})", VERSION, BUILD_DATE);

    let config = load_config(cli.config.as_ref())?;
    let service = GeometryService::shared(config).await?;

    let mesh = if cli.sample {
        service.build_sample().await?
    } else {
        let params = TagParams::new(cli.width, cli.depth, cli.height, cli.text)
            .with_text_height(cli.text_height);
        service.build(params).await?
    };
    mesh.validate()?;
    if let Some(bounds) = mesh.bounds() {
        info!(
            "Mesh: {} vertices, {} triangles, size {:?}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            bounds.size()
        );
    }

    if let Some(path) = &cli.mesh_json {
        let json = serde_json::to_string(&mesh)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote mesh to {}", path.display());
    }
    if let Some(path) = &cli.stl {
        let bytes = service.export().await?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote STL to {}", path.display());
    }

    Ok(())
}
