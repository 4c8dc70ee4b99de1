use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid experiment identifier {0:?}: expected <PREFIX>-<digits>, e.g. IPTS-12345")]
    InvalidExperimentId(String),
    #[error("invalid state identifier {0:?}: expected 16 hexadecimal characters")]
    InvalidStateId(String),
    #[error("no experiment configured; pass --experiment or set `experiment` in config.toml")]
    ExperimentNotConfigured,
    #[error("NEUTRONOTE_HOME must name an existing directory, got {}", path.display())]
    InvalidHome { path: PathBuf },
    #[error("could not determine the user's home directory; set NEUTRONOTE_HOME")]
    HomeNotFound,
    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
