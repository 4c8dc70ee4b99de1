use std::fs;
use std::path::Path;
use std::path::PathBuf;

use neutronote_data::DataLayout;
use neutronote_data::DataMode;
use neutronote_data::ExperimentId;
use neutronote_data::StateId;
use neutronote_data::layout::reduced_file_name;
use tempfile::TempDir;

pub const STATE: &str = "04bd2c53f6bf6754";

pub fn state() -> StateId {
    StateId::parse(STATE).expect("valid state id")
}

/// A throwaway data root laid out like the shared filesystem.
pub struct DataRoot {
    _dir: TempDir,
    pub layout: DataLayout,
    pub experiment: ExperimentId,
}

impl DataRoot {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let layout = DataLayout::new(dir.path());
        Ok(Self {
            _dir: dir,
            layout,
            experiment: ExperimentId::parse("IPTS-12345")?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.layout.data_root
    }

    /// Creates `<state>/<mode>/<run_folder>/<timestamp>/` and returns it.
    pub fn reduction_dir(
        &self,
        state_id: &str,
        mode: DataMode,
        run_folder: &str,
        timestamp: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self
            .layout
            .reduction_root(&self.experiment)
            .join(state_id)
            .join(mode.as_str())
            .join(run_folder)
            .join(timestamp);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// A reduction with its canonically named reduced file. Returns the file.
    pub fn reduction(
        &self,
        state_id: &str,
        mode: DataMode,
        run: u64,
        timestamp: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.reduction_dir(state_id, mode, &run.to_string(), timestamp)?;
        touch(&dir.join(reduced_file_name(run, timestamp)))
    }

    /// An empty raw file for `run` under `experiment`.
    pub fn raw_file(&self, experiment: &str, run: u64, mode: DataMode) -> anyhow::Result<PathBuf> {
        let experiment = ExperimentId::parse(experiment)?;
        touch(&self.layout.raw_path(&experiment, run, mode))
    }
}

pub fn touch(path: &Path) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(path.to_path_buf())
}
