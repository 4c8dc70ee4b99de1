use std::path::PathBuf;

use serde::Serialize;
use serde::Serializer;

use crate::display::format_duration;
use crate::display::format_iso_timestamp;
use crate::display::format_reduction_timestamp;

/// One timestamped output of the reduction workflow for one run.
///
/// Built by [`crate::ReductionDiscoverer`] only after the reduced file was
/// seen on disk; companion files are attached only if they existed at
/// discovery time and may have gone stale since.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ReducedRun {
    pub run_number: u64,
    pub state_id: String,
    /// `YYYY-MM-DDThhmmss`; lexical order is chronological order.
    pub timestamp: String,
    pub reduced_file: PathBuf,
    pub record_file: Option<PathBuf>,
    pub pixelmask_file: Option<PathBuf>,
    pub title: String,
    /// Seconds.
    pub duration: f64,
    pub start_time: String,
}

impl ReducedRun {
    pub(crate) fn new(
        run_number: u64,
        state_id: String,
        timestamp: String,
        reduced_file: PathBuf,
    ) -> Self {
        Self {
            run_number,
            state_id,
            timestamp,
            reduced_file,
            record_file: None,
            pixelmask_file: None,
            title: String::new(),
            duration: 0.0,
            start_time: String::new(),
        }
    }

    pub fn timestamp_display(&self) -> String {
        format_reduction_timestamp(&self.timestamp)
    }

    pub fn duration_display(&self) -> String {
        format_duration(self.duration, "hr")
    }

    pub fn start_time_display(&self) -> String {
        format_iso_timestamp(&self.start_time, "%Y-%m-%d %H:%M")
    }
}

#[derive(Serialize)]
struct ReducedRunView<'a> {
    run_number: u64,
    state_id: &'a str,
    timestamp: &'a str,
    timestamp_display: String,
    reduced_file: String,
    record_file: Option<String>,
    pixelmask_file: Option<String>,
    title: &'a str,
    duration: f64,
    duration_display: String,
    start_time: &'a str,
    start_time_display: String,
}

impl Serialize for ReducedRun {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ReducedRunView {
            run_number: self.run_number,
            state_id: &self.state_id,
            timestamp: &self.timestamp,
            timestamp_display: self.timestamp_display(),
            reduced_file: self.reduced_file.display().to_string(),
            record_file: self
                .record_file
                .as_ref()
                .map(|path| path.display().to_string()),
            pixelmask_file: self
                .pixelmask_file
                .as_ref()
                .map(|path| path.display().to_string()),
            title: &self.title,
            duration: self.duration,
            duration_display: self.duration_display(),
            start_time: &self.start_time,
            start_time_display: self.start_time_display(),
        }
        .serialize(serializer)
    }
}
