use crate::composite::error::CompositeError;
use crate::forecast::error::ForecastError;
use crate::output::error::OutputError;
use crate::render::error::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadarcastError {
    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
