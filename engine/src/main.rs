mod app;
mod context;
mod data;
mod input;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use scene::ImportOptions;

use crate::app::App;

/// Phong-lit viewer for glTF, OBJ and preprocessed scene assets.
#[derive(Parser, Debug)]
#[command(name = "viewer", version)]
pub struct Cli {
    /// Model to view (.gltf, .glb, .obj or a preprocessed .lgasset)
    path: PathBuf,

    #[arg(long, default_value_t = app::conf::FRAME_RESOLUTION.0)]
    width: u32,

    #[arg(long, default_value_t = app::conf::FRAME_RESOLUTION.1)]
    height: u32,

    /// Initial vertical field of view in degrees
    #[arg(long, default_value_t = app::conf::FOV_DEGREES)]
    fov: f32,

    /// Start in wireframe mode (toggle with 1 and 2)
    #[arg(long)]
    wireframe: bool,

    #[arg(long)]
    no_vsync: bool,

    /// Keep OBJ texture coordinates as authored
    #[arg(long)]
    no_flip_uvs: bool,
}

impl Cli {
    fn import_options(&self) -> ImportOptions {
        ImportOptions {
            flip_uvs: !self.no_flip_uvs,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let scene = scene::loader::load(&cli.path, &cli.import_options())
        .with_context(|| format!("Failed to load {}", cli.path.display()))?;
    log::info!(
        "Scene has {} meshes, {} vertices and {} instances",
        scene.meshes.len(),
        scene.vertex_count(),
        scene.instances.len()
    );

    let event_loop = EventLoop::new()?;
    let window = App::window_builder(&cli).build(&event_loop)?;

    App::new(window, &scene, &cli)?.run(event_loop)
}
