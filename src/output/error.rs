use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to list output directory '{0}'")]
    DirList(PathBuf, #[source] std::io::Error),

    #[error("Failed to delete stale artifact '{0}'")]
    StaleDelete(PathBuf, #[source] std::io::Error),

    #[error("Failed to write encoder frame list '{0}'")]
    FrameListWrite(PathBuf, #[source] std::io::Error),

    #[error("No frames to assemble into an animation")]
    NoFrames,

    #[error("Failed to spawn the external encoder")]
    EncoderSpawn(#[source] std::io::Error),

    #[error("External encoder exited with {status}: {stderr}")]
    EncoderExit {
        status: std::process::ExitStatus,
        stderr: String,
    },
}
