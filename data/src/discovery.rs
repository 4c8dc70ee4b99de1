//! Walks the reduction tree of an experiment:
//!
//! ```text
//! <reduction_root>/<state:16 hex>/<lite|native>/<run:digits>/<YYYY-MM-DDThhmmss>/
//!     reduced_<run:06>_<timestamp>.nxs
//!     ReductionRecord.json        (optional)
//!     pixelmask_<run:06>_<timestamp>.h5   (optional)
//! ```
//!
//! Absent directories are normal on a shared filesystem and produce empty
//! results. Nothing here returns an error.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use neutronote_nexus::ContainerBackend;
use neutronote_nexus::ContainerError;
use neutronote_nexus::REDUCED_PROFILE;
use neutronote_nexus::extract_file;
use tracing::debug;
use tracing::info;
use tracing::warn;
use wildmatch::WildMatch;

use crate::DataLayout;
use crate::DataMode;
use crate::ExperimentId;
use crate::ReducedRun;
use crate::StateId;
use crate::StateInfo;
use crate::ids::is_reduction_timestamp;
use crate::layout::REDUCTION_RECORD_FILE;
use crate::layout::pixelmask_file_name;
use crate::layout::reduced_file_name;

/// Fallback pattern when the canonical reduced file name is absent.
const REDUCED_FILE_PATTERN: &str = "reduced_*.nxs";

pub struct ReductionDiscoverer<'a> {
    layout: &'a DataLayout,
    backend: &'a dyn ContainerBackend,
}

impl<'a> ReductionDiscoverer<'a> {
    pub fn new(layout: &'a DataLayout, backend: &'a dyn ContainerBackend) -> Self {
        Self { layout, backend }
    }

    /// State folders under the reduction root, sorted ascending.
    pub fn discover_state_ids(&self, experiment: &ExperimentId) -> Vec<String> {
        self.state_dirs(experiment)
            .into_iter()
            .map(|state_id| state_id.as_str().to_string())
            .collect()
    }

    fn state_dirs(&self, experiment: &ExperimentId) -> Vec<StateId> {
        let root = self.layout.reduction_root(experiment);
        collect_dirs(&root, StateId::parse)
            .into_iter()
            .map(|(state_id, _)| state_id)
            .collect()
    }

    /// Reduced runs of one state, in ascending run-number order. With
    /// `latest_only` each run contributes only its most recent reduction;
    /// otherwise every reduction, oldest first.
    pub fn discover_reduced_runs(
        &self,
        experiment: &ExperimentId,
        state_id: &StateId,
        mode: DataMode,
        latest_only: bool,
    ) -> Vec<ReducedRun> {
        let root = self.layout.state_mode_root(experiment, state_id, mode);
        let mut by_run: BTreeMap<u64, Vec<ReducedRun>> = BTreeMap::new();

        for (run_number, run_dir) in collect_dirs(&root, parse_run_folder) {
            for (timestamp, timestamp_dir) in collect_dirs(&run_dir, |name| {
                is_reduction_timestamp(name).then(|| name.to_string())
            }) {
                let Some(reduced_file) = find_reduced_file(&timestamp_dir, run_number, &timestamp)
                else {
                    debug!("no reduced file in {}", timestamp_dir.display());
                    continue;
                };
                let mut run =
                    ReducedRun::new(run_number, state_id.to_string(), timestamp, reduced_file);
                let record_file = timestamp_dir.join(REDUCTION_RECORD_FILE);
                if record_file.is_file() {
                    run.record_file = Some(record_file);
                }
                let pixelmask_file =
                    timestamp_dir.join(pixelmask_file_name(run_number, &run.timestamp));
                if pixelmask_file.is_file() {
                    run.pixelmask_file = Some(pixelmask_file);
                }
                by_run.entry(run_number).or_default().push(run);
            }
        }

        let mut runs = Vec::new();
        for (_, mut reductions) in by_run {
            if latest_only {
                // `max_by` yields the last of equal maxima.
                if let Some(latest) = reductions
                    .into_iter()
                    .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
                {
                    runs.push(latest);
                }
            } else {
                reductions.sort_by(|a, b| a.timestamp.as_str().cmp(b.timestamp.as_str()));
                runs.extend(reductions);
            }
        }

        for run in &mut runs {
            self.enrich(run);
        }

        info!(
            "discovered {} reduced run(s) for {experiment} state {state_id} ({mode})",
            runs.len()
        );
        runs
    }

    /// Latest reductions of every state that has at least one.
    pub fn discover_all_reduced_data(
        &self,
        experiment: &ExperimentId,
        mode: DataMode,
    ) -> Vec<StateInfo> {
        self.state_dirs(experiment)
            .into_iter()
            .filter_map(|state_id| {
                let reduced_runs = self.discover_reduced_runs(experiment, &state_id, mode, true);
                (!reduced_runs.is_empty()).then(|| StateInfo {
                    state_id: state_id.as_str().to_string(),
                    reduced_runs,
                })
            })
            .collect()
    }

    /// The latest reduction of `run_number` within one state.
    pub fn find_reduced_run(
        &self,
        experiment: &ExperimentId,
        state_id: &StateId,
        run_number: u64,
        mode: DataMode,
    ) -> Option<ReducedRun> {
        self.discover_reduced_runs(experiment, state_id, mode, true)
            .into_iter()
            .find(|run| run.run_number == run_number)
    }

    fn enrich(&self, run: &mut ReducedRun) {
        match extract_file(self.backend, &run.reduced_file, &REDUCED_PROFILE) {
            Ok(fields) => {
                run.title = fields.title;
                run.start_time = fields.start_time;
                run.duration = fields.duration;
            }
            Err(ContainerError::BackendUnavailable) => {}
            Err(err) => warn!(
                "could not read metadata from {}: {err}",
                run.reduced_file.display()
            ),
        }
    }
}

/// Narrows a reduced-run list the way listing endpoints do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilter {
    /// Digits that must appear in the decimal run number. Non-numeric
    /// searches are ignored.
    pub search: Option<String>,
    /// Keep at most this many runs; zero means no limit.
    pub limit: Option<usize>,
}

impl RunFilter {
    pub fn apply(&self, runs: Vec<ReducedRun>) -> Vec<ReducedRun> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()));
        let mut runs: Vec<ReducedRun> = match needle {
            Some(needle) => runs
                .into_iter()
                .filter(|run| run.run_number.to_string().contains(needle))
                .collect(),
            None => runs,
        };
        if let Some(limit) = self.limit
            && limit > 0
        {
            runs.truncate(limit);
        }
        runs
    }
}

fn parse_run_folder(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn find_reduced_file(dir: &Path, run_number: u64, timestamp: &str) -> Option<PathBuf> {
    let exact = dir.join(reduced_file_name(run_number, timestamp));
    if exact.is_file() {
        return Some(exact);
    }

    let pattern = WildMatch::new(REDUCED_FILE_PATTERN);
    let mut candidates = read_entries(dir)
        .into_iter()
        .filter(|(name, path)| pattern.matches(name) && path.is_file())
        .collect::<Vec<_>>();
    candidates.sort_by(|(a, _), (b, _)| a.cmp(b));
    candidates.into_iter().next().map(|(_, path)| path)
}

/// Subdirectories of `parent` whose names `parse` accepts, sorted by name.
/// Symlinks to directories count as directories.
pub(crate) fn collect_dirs<T, F>(parent: &Path, parse: F) -> Vec<(T, PathBuf)>
where
    F: Fn(&str) -> Option<T>,
{
    let mut dirs: Vec<(String, T, PathBuf)> = read_entries(parent)
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .filter_map(|(name, path)| parse(&name).map(|value| (name, value, path)))
        .collect();
    dirs.sort_by(|(a, ..), (b, ..)| a.cmp(b));
    dirs.into_iter().map(|(_, value, path)| (value, path)).collect()
}

/// `(file name, path)` of every entry with a UTF-8 name. A missing or
/// unreadable directory reads as empty.
fn read_entries(parent: &Path) -> Vec<(String, PathBuf)> {
    let dir = match fs::read_dir(parent) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            debug!("cannot list {}: {err}", parent.display());
            return Vec::new();
        }
    };
    dir.filter_map(|entry| match entry {
        Ok(entry) => entry
            .file_name()
            .to_str()
            .map(|name| (name.to_string(), entry.path())),
        Err(err) => {
            debug!("skipping unreadable entry in {}: {err}", parent.display());
            None
        }
    })
    .collect()
}
