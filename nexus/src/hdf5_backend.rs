use std::path::Path;
use std::path::PathBuf;

use hdf5::types::FixedAscii;
use hdf5::types::FixedUnicode;
use hdf5::types::TypeDescriptor;
use hdf5::types::VarLenAscii;
use hdf5::types::VarLenUnicode;

use crate::Container;
use crate::ContainerBackend;
use crate::ContainerError;
use crate::Dataset;
use crate::Value;

/// Upper bound for fixed-length string datasets; HDF5 converts shorter
/// fixed strings into this width on read.
const MAX_FIXED_STRING_LEN: usize = 4096;

/// Reads NeXus files through the system HDF5 library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Backend;

impl ContainerBackend for Hdf5Backend {
    fn open(&self, path: &Path) -> Result<Box<dyn Container>, ContainerError> {
        let file = hdf5::File::open(path).map_err(|err| ContainerError::Open {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Box::new(Hdf5Container {
            path: path.to_path_buf(),
            file,
        }))
    }
}

struct Hdf5Container {
    path: PathBuf,
    file: hdf5::File,
}

impl Hdf5Container {
    fn read_error(&self, key: &str, err: impl std::fmt::Display) -> ContainerError {
        ContainerError::Read {
            key: key.to_string(),
            message: format!("{err} (in {})", self.path.display()),
        }
    }
}

impl Container for Hdf5Container {
    fn dataset(&self, key: &str) -> Result<Option<Dataset>, ContainerError> {
        // `link_exists` is false for missing intermediate groups too.
        if !self.file.link_exists(key) {
            return Ok(None);
        }
        let dataset = self
            .file
            .dataset(key)
            .map_err(|err| self.read_error(key, err))?;
        let descriptor = dataset
            .dtype()
            .and_then(|dtype| dtype.to_descriptor())
            .map_err(|err| self.read_error(key, err))?;

        let values: Vec<Value> = match descriptor {
            TypeDescriptor::Integer(_) => dataset
                .read_raw::<i64>()
                .map(|raw| raw.into_iter().map(Value::Int).collect()),
            TypeDescriptor::Unsigned(_) => dataset
                .read_raw::<u64>()
                .map(|raw| raw.into_iter().map(Value::UInt).collect()),
            TypeDescriptor::Float(_) => dataset
                .read_raw::<f64>()
                .map(|raw| raw.into_iter().map(Value::Float).collect()),
            TypeDescriptor::Boolean => dataset
                .read_raw::<bool>()
                .map(|raw| raw.into_iter().map(Value::Bool).collect()),
            TypeDescriptor::VarLenUnicode => dataset.read_raw::<VarLenUnicode>().map(|raw| {
                raw.iter()
                    .map(|s| Value::Text(s.as_str().to_string()))
                    .collect()
            }),
            TypeDescriptor::VarLenAscii => dataset.read_raw::<VarLenAscii>().map(|raw| {
                raw.iter()
                    .map(|s| Value::Bytes(s.as_bytes().to_vec()))
                    .collect()
            }),
            TypeDescriptor::FixedAscii(_) => dataset
                .read_raw::<FixedAscii<MAX_FIXED_STRING_LEN>>()
                .map(|raw| {
                    raw.iter()
                        .map(|s| Value::Bytes(s.as_bytes().to_vec()))
                        .collect()
                }),
            TypeDescriptor::FixedUnicode(_) => dataset
                .read_raw::<FixedUnicode<MAX_FIXED_STRING_LEN>>()
                .map(|raw| {
                    raw.iter()
                        .map(|s| Value::Text(s.as_str().to_string()))
                        .collect()
                }),
            other => {
                return Err(self.read_error(key, format!("unsupported datatype {other:?}")));
            }
        }
        .map_err(|err| self.read_error(key, err))?;

        Ok(Some(Dataset::with_shape(dataset.shape(), values)))
    }
}
