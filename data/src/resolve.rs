use std::fs;
use std::path::Path;
use std::path::PathBuf;

use neutronote_nexus::ContainerBackend;
use neutronote_nexus::RAW_PROFILE;
use neutronote_nexus::extract_file;
use tracing::debug;

use crate::DataLayout;
use crate::ExperimentId;
use crate::RunMetadata;
use crate::discovery::collect_dirs;

/// Finds raw acquisition files and reads their metadata.
///
/// Failures never surface as `Err`: a run that cannot be located or read
/// yields a [`RunMetadata`] whose `error` says why.
pub struct RunMetadataResolver<'a> {
    layout: &'a DataLayout,
    backend: &'a dyn ContainerBackend,
}

impl<'a> RunMetadataResolver<'a> {
    pub fn new(layout: &'a DataLayout, backend: &'a dyn ContainerBackend) -> Self {
        Self { layout, backend }
    }

    /// Looks in `experiment` first when given, then in every
    /// `<prefix>-*` directory of the data root, newest name first. Native
    /// files win over lite files within one experiment.
    pub fn locate_raw_file(&self, run: u64, experiment: Option<&ExperimentId>) -> Option<PathBuf> {
        if let Some(experiment) = experiment {
            let root = self.layout.experiment_root(experiment);
            if root.is_dir()
                && let Some(path) = self.layout.existing_raw_path_in(&root, run)
            {
                return Some(path);
            }
        }

        let prefix = format!("{}-", self.layout.experiment_prefix);
        let mut experiments = collect_dirs(&self.layout.data_root, |name| {
            name.starts_with(&prefix).then_some(())
        });
        experiments.reverse();
        let found = experiments
            .into_iter()
            .find_map(|(_, root)| self.layout.existing_raw_path_in(&root, run));
        if found.is_none() {
            debug!(
                "run {run} not found under {}",
                self.layout.data_root.display()
            );
        }
        found
    }

    pub fn read_file(&self, path: &Path) -> RunMetadata {
        if !path.exists() {
            return RunMetadata::failed(0, format!("File not found: {}", path.display()));
        }
        let run_number = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.layout.parse_raw_run_number(name))
            .unwrap_or(0);

        let file_size_bytes = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                return RunMetadata::failed(run_number, format!("Error reading file: {err}"));
            }
        };
        match extract_file(self.backend, path, &RAW_PROFILE) {
            Ok(fields) => RunMetadata::from_fields(
                run_number,
                fields,
                file_size_bytes,
                path.display().to_string(),
            ),
            Err(err) => RunMetadata::failed(run_number, format!("Error reading file: {err}")),
        }
    }

    pub fn resolve(&self, run: u64, experiment: Option<&ExperimentId>) -> RunMetadata {
        match self.locate_raw_file(run, experiment) {
            Some(path) => self.read_file(&path),
            None => {
                let error = match experiment {
                    Some(experiment) => {
                        format!("Could not locate file for run {run} in {experiment}")
                    }
                    None => format!("Could not locate file for run {run}"),
                };
                RunMetadata::failed(run, error)
            }
        }
    }
}
