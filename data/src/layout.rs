//! Path conventions of the shared data filesystem.
//!
//! ```text
//! <data_root>/<experiment>/
//!     nexus/<INSTR>_<run>.nxs.h5                       native raw file
//!     shared/lite/<INSTR>_<run>.lite.nxs.h5            condensed raw file
//!     shared/<tool>/<state>/<mode>/<run>/<timestamp>/  one reduction execution
//! ```
//!
//! Everything here is a pure function of its inputs except
//! [`DataLayout::resolve_existing_raw_path`], which stats the candidates.
//! Nothing is ever created.

use std::path::Path;
use std::path::PathBuf;

use crate::DataMode;
use crate::ExperimentId;
use crate::StateId;

pub const DEFAULT_DATA_ROOT: &str = "/SNS/SNAP";
pub const DEFAULT_INSTRUMENT: &str = "SNAP";
pub const DEFAULT_REDUCTION_TOOL: &str = "SNAPRed";
pub const DEFAULT_EXPERIMENT_PREFIX: &str = "IPTS";

/// Companion written next to each reduced file.
pub const REDUCTION_RECORD_FILE: &str = "ReductionRecord.json";

const NATIVE_SUFFIX: &str = ".nxs.h5";
const LITE_SUFFIX: &str = ".lite.nxs.h5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub data_root: PathBuf,
    pub instrument: String,
    pub reduction_tool: String,
    /// Alphabetic prefix shared by experiment directories (`IPTS`).
    pub experiment_prefix: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            instrument: DEFAULT_INSTRUMENT.to_string(),
            reduction_tool: DEFAULT_REDUCTION_TOOL.to_string(),
            experiment_prefix: DEFAULT_EXPERIMENT_PREFIX.to_string(),
        }
    }
}

impl DataLayout {
    /// Default naming under a different root.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    pub fn experiment_root(&self, experiment: &ExperimentId) -> PathBuf {
        self.data_root.join(experiment.as_str())
    }

    /// Where the raw file for `run` would live. Existence is not checked.
    pub fn raw_path(&self, experiment: &ExperimentId, run: u64, mode: DataMode) -> PathBuf {
        self.raw_path_in(&self.experiment_root(experiment), run, mode)
    }

    /// Native first, then lite; `None` when neither exists.
    pub fn resolve_existing_raw_path(
        &self,
        experiment: &ExperimentId,
        run: u64,
    ) -> Option<PathBuf> {
        self.existing_raw_path_in(&self.experiment_root(experiment), run)
    }

    pub fn reduction_root(&self, experiment: &ExperimentId) -> PathBuf {
        self.experiment_root(experiment)
            .join("shared")
            .join(&self.reduction_tool)
    }

    pub fn state_mode_root(
        &self,
        experiment: &ExperimentId,
        state_id: &StateId,
        mode: DataMode,
    ) -> PathBuf {
        self.reduction_root(experiment)
            .join(state_id.as_str())
            .join(mode.as_str())
    }

    /// Raw-file location relative to an arbitrary experiment directory.
    pub(crate) fn raw_path_in(&self, experiment_root: &Path, run: u64, mode: DataMode) -> PathBuf {
        let instrument = &self.instrument;
        match mode {
            DataMode::Lite => experiment_root
                .join("shared")
                .join("lite")
                .join(format!("{instrument}_{run}{LITE_SUFFIX}")),
            DataMode::Native => experiment_root
                .join("nexus")
                .join(format!("{instrument}_{run}{NATIVE_SUFFIX}")),
        }
    }

    pub(crate) fn existing_raw_path_in(&self, experiment_root: &Path, run: u64) -> Option<PathBuf> {
        [DataMode::Native, DataMode::Lite]
            .into_iter()
            .map(|mode| self.raw_path_in(experiment_root, run, mode))
            .find(|path| path.is_file())
    }

    /// Run number from a raw file name such as `SNAP_12345.nxs.h5` or
    /// `SNAP_12345.lite.nxs.h5`.
    pub fn parse_raw_run_number(&self, file_name: &str) -> Option<u64> {
        let rest = file_name.strip_prefix(self.instrument.as_str())?.strip_prefix('_')?;
        let digits = rest
            .strip_suffix(LITE_SUFFIX)
            .or_else(|| rest.strip_suffix(NATIVE_SUFFIX))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// `reduced_<run:06>_<timestamp>.nxs`
pub fn reduced_file_name(run: u64, timestamp: &str) -> String {
    format!("reduced_{run:06}_{timestamp}.nxs")
}

/// `pixelmask_<run:06>_<timestamp>.h5`
pub fn pixelmask_file_name(run: u64, timestamp: &str) -> String {
    format!("pixelmask_{run:06}_{timestamp}.h5")
}
