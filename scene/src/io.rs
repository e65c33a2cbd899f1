use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{Error, ImportOptions, Result, Scene};

pub trait FileLoader {
    const SUPPORTED_EXTENSIONS: &'static [&'static str];
    fn load(filename: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene>;

    fn can_load(filename: impl AsRef<Path>) -> bool {
        extension_of(filename.as_ref()).is_some_and(|extension| {
            Self::SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(&extension))
        })
    }
}

pub const FILE_EXTENSION: &str = "lgasset";

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_asset(file: impl AsRef<Path>) -> bool {
    extension_of(file.as_ref()).is_some_and(|extension| extension == FILE_EXTENSION)
}

pub fn load(file: impl AsRef<Path>) -> Result<Scene> {
    firestorm::profile_fn!(load);

    let filepath = file.as_ref();
    if !is_asset(filepath) {
        return Err(Error::NotPreprocessed(filepath.to_owned()));
    }
    let file = File::open(filepath).map_err(Error::io(filepath))?;
    let reader = flate2::bufread::GzDecoder::new(BufReader::new(file));
    let scene: Scene = rmp_serde::decode::from_read(reader)?;

    log::info!(
        "Loaded asset {}: {} meshes, {} textures",
        filepath.display(),
        scene.meshes.len(),
        scene.textures.len()
    );
    Ok(scene)
}

/// Writes `scene` next to `file` with the asset extension and returns the
/// path written.
pub fn save(scene: &Scene, file: impl AsRef<Path>) -> Result<PathBuf> {
    firestorm::profile_fn!(save);

    let output_filename = file.as_ref().with_extension(FILE_EXTENSION);
    let output_file = File::create(&output_filename).map_err(Error::io(&output_filename))?;
    let mut writer =
        flate2::write::GzEncoder::new(BufWriter::new(output_file), flate2::Compression::default());
    rmp_serde::encode::write(&mut writer, &scene)?;
    writer
        .finish()
        .and_then(|mut inner| inner.flush())
        .map_err(Error::io(&output_filename))?;

    log::info!("Asset processed and saved to {}", output_filename.display());
    Ok(output_filename)
}
