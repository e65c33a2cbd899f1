use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No loader found for {0}")]
    UnsupportedFormat(String),
    #[error("Couldn't read glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("Couldn't read OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("Failed to save processed asset: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Failed to load scene asset: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Asset {} must be preprocessed before loading", .0.display())]
    NotPreprocessed(PathBuf),
    #[error("Incomplete scene: {0}")]
    IncompleteScene(String),
    #[error("Mesh {mesh:?}, primitive {primitive}: {reason}")]
    InvalidPrimitive {
        mesh: String,
        primitive: usize,
        reason: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
