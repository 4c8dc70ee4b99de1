use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("HDF5 support is not available in this build")]
    BackendUnavailable,
    #[error("failed to open {}: {message}", path.display())]
    Open { path: PathBuf, message: String },
    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },
}
