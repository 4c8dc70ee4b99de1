use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use neutronote_data::ConfigOverrides;
use neutronote_data::DataMode;
use neutronote_data::StateId;

/// Locate raw runs and reduction outputs and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "neutronote", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Root of the shared data filesystem (overrides config and
    /// `NEUTRONOTE_DATA_ROOT`).
    #[arg(long, value_name = "DIR", global = true)]
    pub data_root: Option<PathBuf>,

    /// Experiment to operate on, e.g. IPTS-12345.
    #[arg(long, short = 'e', value_name = "ID", global = true)]
    pub experiment: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_root: self.data_root.clone(),
            experiment: self.experiment.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List instrument states that have reductions.
    States,

    /// List reduced runs of one state.
    Runs(RunsArgs),

    /// Show the latest reduction of one run.
    RunInfo(RunInfoArgs),

    /// List the latest reductions of every state.
    Reduced(ModeArgs),

    /// Read metadata from a raw run file.
    Metadata(MetadataArgs),

    /// Show where the files of a run live.
    Paths(PathsArgs),
}

#[derive(Debug, Args)]
pub struct ModeArgs {
    /// Use native-resolution data instead of the condensed lite files.
    #[arg(long, default_value_t = false)]
    pub native: bool,
}

impl ModeArgs {
    pub fn mode(&self) -> DataMode {
        DataMode::from_prefer_condensed(!self.native)
    }
}

#[derive(Debug, Args)]
pub struct RunsArgs {
    #[arg(value_name = "STATE_ID")]
    pub state_id: StateId,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Include every reduction, not just the latest per run.
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Keep runs whose number contains these digits.
    #[arg(long, value_name = "DIGITS")]
    pub search: Option<String>,

    /// Maximum number of runs to print.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct RunInfoArgs {
    #[arg(value_name = "RUN")]
    pub run: u64,

    #[arg(long = "state", value_name = "STATE_ID")]
    pub state_id: StateId,

    #[command(flatten)]
    pub mode: ModeArgs,
}

#[derive(Debug, Args)]
pub struct MetadataArgs {
    /// Run number to locate on the data filesystem.
    #[arg(value_name = "RUN", required_unless_present = "file", conflicts_with = "file")]
    pub run: Option<u64>,

    /// Read this file directly instead of locating a run.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PathsArgs {
    #[arg(value_name = "RUN")]
    pub run: u64,
}
