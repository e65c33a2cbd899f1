use std::path::PathBuf;

use anyhow::{Context as _, Result, ensure};
use clap::Parser;

use scene::ImportOptions;

/// Converts a glTF or OBJ model into a preprocessed asset next to it.
#[derive(Parser, Debug)]
#[command(name = "preprocess", version)]
struct Cli {
    /// Model to convert (.gltf, .glb or .obj)
    path: PathBuf,

    /// Keep OBJ texture coordinates as authored
    #[arg(long)]
    no_flip_uvs: bool,

    #[arg(long)]
    no_tangents: bool,
}

impl Cli {
    fn import_options(&self) -> ImportOptions {
        ImportOptions {
            flip_uvs: !self.no_flip_uvs,
            calc_tangents: !self.no_tangents,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    ensure!(
        !scene::io::is_asset(&cli.path),
        "{} is already preprocessed",
        cli.path.display()
    );

    let scene = scene::loader::load(&cli.path, &cli.import_options())
        .with_context(|| format!("Failed to load {}", cli.path.display()))?;
    let asset = scene::io::save(&scene, &cli.path)
        .with_context(|| format!("Failed to save asset for {}", cli.path.display()))?;
    log::info!("Wrote {}", asset.display());
    Ok(())
}
