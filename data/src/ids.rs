use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::DataError;

static EXPERIMENT_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]+-[0-9]+$").unwrap_or_else(|_| std::process::abort())
});

static STATE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{16}$").unwrap_or_else(|_| std::process::abort()));

static REDUCTION_TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{6}$").unwrap_or_else(|_| std::process::abort())
});

/// A data-collection campaign identifier such as `IPTS-12345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ExperimentId(String);

impl ExperimentId {
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        let trimmed = raw.trim();
        if EXPERIMENT_ID_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DataError::InvalidExperimentId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The alphabetic part before the dash (`IPTS` for `IPTS-12345`).
    pub fn prefix(&self) -> &str {
        self.0.split_once('-').map_or(self.0.as_str(), |(prefix, _)| prefix)
    }
}

impl FromStr for ExperimentId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 16-character hex digest naming one instrument configuration. Case is
/// preserved exactly as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    pub fn parse(raw: &str) -> Option<Self> {
        is_state_id(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StateId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DataError::InvalidStateId(s.to_string()))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_state_id(name: &str) -> bool {
    STATE_ID_PATTERN.is_match(name)
}

/// `YYYY-MM-DDThhmmss`, the folder name the reduction workflow gives each
/// execution.
pub(crate) fn is_reduction_timestamp(name: &str) -> bool {
    REDUCTION_TIMESTAMP_PATTERN.is_match(name)
}

/// Which flavour of data to look at: the condensed "lite" files or the full
/// native-resolution ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataMode {
    #[default]
    Lite,
    Native,
}

impl DataMode {
    pub fn from_prefer_condensed(prefer_condensed: bool) -> Self {
        if prefer_condensed {
            DataMode::Lite
        } else {
            DataMode::Native
        }
    }

    /// Directory name used for this mode under a state folder.
    pub fn as_str(self) -> &'static str {
        match self {
            DataMode::Lite => "lite",
            DataMode::Native => "native",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
