use std::path::Path;

use crate::Container;
use crate::ContainerBackend;
use crate::ContainerError;
use crate::KeyReader;

/// Root group Mantid writes reduced workspaces under.
pub const MANTID_WORKSPACE_ROOT: &str = "mantid_workspace_1";

/// Where each metadata field lives inside one flavour of container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionProfile {
    /// Title candidates, tried in order.
    pub title_chain: &'static [&'static str],
    pub start_time: &'static str,
    pub end_time: Option<&'static str>,
    pub duration: &'static str,
    pub total_counts: Option<&'static str>,
}

/// Reduced output: sample logs live under `mantid_workspace_1/logs/<name>/value`
/// and the workspace title may be missing, in which case the `run_title` log
/// is used.
pub const REDUCED_PROFILE: ExtractionProfile = ExtractionProfile {
    title_chain: &[
        "mantid_workspace_1/title",
        "mantid_workspace_1/logs/run_title/value",
    ],
    start_time: "mantid_workspace_1/logs/start_time/value",
    end_time: None,
    duration: "mantid_workspace_1/logs/duration/value",
    total_counts: None,
};

/// Raw acquisition files as written by the data acquisition system.
pub const RAW_PROFILE: ExtractionProfile = ExtractionProfile {
    title_chain: &["entry/title"],
    start_time: "entry/start_time",
    end_time: Some("entry/end_time"),
    duration: "entry/duration",
    total_counts: Some("entry/total_counts"),
};

/// The metadata fields a profile can produce. Fields a profile does not map
/// stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    /// Seconds, never negative.
    pub duration: f64,
    pub total_counts: u64,
}

pub fn extract(container: &dyn Container, profile: &ExtractionProfile) -> ExtractedFields {
    let reader = KeyReader::new(container);
    ExtractedFields {
        title: reader.read_first(profile.title_chain, String::new()),
        start_time: reader.read(profile.start_time, String::new()),
        end_time: profile
            .end_time
            .map(|key| reader.read(key, String::new()))
            .unwrap_or_default(),
        duration: reader.read(profile.duration, 0.0_f64).max(0.0),
        total_counts: profile
            .total_counts
            .map(|key| reader.read(key, 0_u64))
            .unwrap_or_default(),
    }
}

/// Opens `path` with `backend` and extracts `profile` from it. The container
/// is closed before this returns.
pub fn extract_file(
    backend: &dyn ContainerBackend,
    path: &Path,
    profile: &ExtractionProfile,
) -> Result<ExtractedFields, ContainerError> {
    let container = backend.open(path)?;
    Ok(extract(container.as_ref(), profile))
}
