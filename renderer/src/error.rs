use std::path::PathBuf;

use crate::backend::ShaderStage;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Graphics backend error: {0}")]
    Backend(String),

    #[error("Failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to compile {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("Failed to link shader program:\n{0}")]
    ProgramLink(String),

    #[error(transparent)]
    Scene(#[from] scene::Error),
}
