use std::collections::BTreeMap;

use neutronote_nexus::ExtractedFields;
use serde::Serialize;
use serde::Serializer;

use crate::display::format_count_rate;
use crate::display::format_duration;
use crate::display::format_file_size;
use crate::display::format_iso_timestamp;

const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata for one run, read from its raw acquisition file.
///
/// Either every field is populated and [`RunMetadata::error`] is `None`, or
/// the error explains what went wrong and the remaining fields hold
/// zero/empty placeholders. Fields are read-only outside this module so the
/// two constructors are the only way to reach either state.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    run_number: u64,
    title: String,
    start_time: String,
    end_time: String,
    duration: f64,
    total_counts: u64,
    file_size_bytes: u64,
    file_path: String,
    error: Option<String>,
    extras: BTreeMap<String, serde_json::Value>,
}

impl RunMetadata {
    pub fn from_fields(
        run_number: u64,
        fields: ExtractedFields,
        file_size_bytes: u64,
        file_path: String,
    ) -> Self {
        let ExtractedFields {
            title,
            start_time,
            end_time,
            duration,
            total_counts,
        } = fields;
        Self {
            run_number,
            title,
            start_time,
            end_time,
            duration,
            total_counts,
            file_size_bytes,
            file_path,
            error: None,
            extras: BTreeMap::new(),
        }
    }

    pub fn failed(run_number: u64, error: impl Into<String>) -> Self {
        Self {
            run_number,
            title: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            duration: 0.0,
            total_counts: 0,
            file_size_bytes: 0,
            file_path: String::new(),
            error: Some(error.into()),
            extras: BTreeMap::new(),
        }
    }

    pub fn run_number(&self) -> u64 {
        self.run_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    /// Seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn total_counts(&self) -> u64 {
        self.total_counts
    }

    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_bytes
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Additional keys merged into the serialized record.
    pub fn extras(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.extras
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn with_extra(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn file_size_display(&self) -> String {
        format_file_size(self.file_size_bytes)
    }

    pub fn duration_display(&self) -> String {
        format_duration(self.duration, "hours")
    }

    pub fn count_rate_display(&self) -> String {
        format_count_rate(self.total_counts, self.duration)
    }

    pub fn start_time_formatted(&self) -> String {
        format_iso_timestamp(&self.start_time, TIMESTAMP_OUTPUT_FORMAT)
    }

    pub fn end_time_formatted(&self) -> String {
        format_iso_timestamp(&self.end_time, TIMESTAMP_OUTPUT_FORMAT)
    }
}

#[derive(Serialize)]
struct RunMetadataView<'a> {
    run_number: u64,
    title: &'a str,
    start_time: &'a str,
    end_time: &'a str,
    start_time_formatted: String,
    end_time_formatted: String,
    duration: f64,
    duration_display: String,
    total_counts: u64,
    count_rate_display: String,
    file_size_bytes: u64,
    file_size_display: String,
    file_path: &'a str,
    error: Option<&'a str>,
    #[serde(flatten)]
    extras: &'a BTreeMap<String, serde_json::Value>,
}

impl Serialize for RunMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RunMetadataView {
            run_number: self.run_number,
            title: &self.title,
            start_time: &self.start_time,
            end_time: &self.end_time,
            start_time_formatted: self.start_time_formatted(),
            end_time_formatted: self.end_time_formatted(),
            duration: self.duration,
            duration_display: self.duration_display(),
            total_counts: self.total_counts,
            count_rate_display: self.count_rate_display(),
            file_size_bytes: self.file_size_bytes,
            file_size_display: self.file_size_display(),
            file_path: &self.file_path,
            error: self.error.as_deref(),
            extras: &self.extras,
        }
        .serialize(serializer)
    }
}
