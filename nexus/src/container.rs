use std::path::Path;

use crate::ContainerError;
use crate::Dataset;

/// A read-only hierarchical container addressed by slash-separated key paths.
pub trait Container {
    /// Returns the dataset stored at `key`, or `Ok(None)` when no such key
    /// exists. Errors are reserved for keys that exist but cannot be read.
    fn dataset(&self, key: &str) -> Result<Option<Dataset>, ContainerError>;
}

/// Opens containers from the filesystem. The returned handle owns the
/// underlying file and releases it on drop.
pub trait ContainerBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Container>, ContainerError>;
}

/// Backend used when the crate is built without HDF5 support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl ContainerBackend for UnavailableBackend {
    fn open(&self, _path: &Path) -> Result<Box<dyn Container>, ContainerError> {
        Err(ContainerError::BackendUnavailable)
    }
}

/// The backend compiled into this build: HDF5 when the `hdf5` feature is
/// enabled, otherwise [`UnavailableBackend`].
pub fn default_backend() -> &'static dyn ContainerBackend {
    #[cfg(feature = "hdf5")]
    {
        &crate::Hdf5Backend
    }
    #[cfg(not(feature = "hdf5"))]
    {
        &UnavailableBackend
    }
}
