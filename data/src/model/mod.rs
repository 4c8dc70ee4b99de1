mod reduced_run;
mod run_metadata;
mod state_info;

pub use reduced_run::ReducedRun;
pub use run_metadata::RunMetadata;
pub use state_info::StateInfo;
