use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read boundary file '{0}'")]
    BoundaryRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse boundary file '{0}'")]
    BoundaryParse(PathBuf, #[source] serde_json::Error),

    #[error("Boundary file '{0}' contains no polygon rings")]
    BoundaryEmpty(PathBuf),

    // plotters backend errors are not 'static across backends, so they are
    // carried as rendered text.
    #[error("Drawing failed for '{path}': {message}")]
    Draw { path: PathBuf, message: String },
}
