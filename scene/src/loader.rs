use std::path::Path;

use crate::{Error, ImportOptions, Result, Scene, gltf::Gltf, io, io::FileLoader, obj::Obj};

/// Loads a scene from any supported model format or from a preprocessed
/// asset, picking the loader by file extension.
pub fn load(file: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene> {
    let filepath = file.as_ref();

    if io::is_asset(filepath) {
        let scene = io::load(filepath)?;
        scene.validate()?;
        Ok(scene)
    } else if Gltf::can_load(filepath) {
        Gltf::load(filepath, options)
    } else if Obj::can_load(filepath) {
        Obj::load(filepath, options)
    } else {
        Err(Error::UnsupportedFormat(filepath.display().to_string()))
    }
}
