//! Best-effort metadata extraction from NeXus containers.
//!
//! Instrument and reduction outputs are HDF5 files whose internal layout
//! drifts between workflow versions. Nothing here treats a missing or
//! malformed key as fatal: every key is read through [`KeyReader`], which
//! substitutes a typed default for that key alone, and the two known file
//! flavours (reduced output vs. raw acquisition) are described by an
//! [`ExtractionProfile`] rather than separate code paths.

mod container;
mod error;
#[cfg(feature = "hdf5")]
mod hdf5_backend;
pub mod memory;
mod profile;
mod reader;
mod value;

pub use container::Container;
pub use container::ContainerBackend;
pub use container::UnavailableBackend;
pub use container::default_backend;
pub use error::ContainerError;
#[cfg(feature = "hdf5")]
pub use hdf5_backend::Hdf5Backend;
pub use profile::ExtractedFields;
pub use profile::ExtractionProfile;
pub use profile::MANTID_WORKSPACE_ROOT;
pub use profile::RAW_PROFILE;
pub use profile::REDUCED_PROFILE;
pub use profile::extract;
pub use profile::extract_file;
pub use reader::KeyReader;
pub use value::Dataset;
pub use value::FromValue;
pub use value::Value;
