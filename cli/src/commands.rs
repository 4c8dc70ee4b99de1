use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use neutronote_data::Config;
use neutronote_data::DataMode;
use neutronote_data::ReductionDiscoverer;
use neutronote_data::RunFilter;
use neutronote_data::RunMetadataResolver;
use neutronote_nexus::ContainerBackend;
use serde_json::Value;
use serde_json::json;

use crate::cli::Command;
use crate::cli::MetadataArgs;
use crate::cli::ModeArgs;
use crate::cli::PathsArgs;
use crate::cli::RunInfoArgs;
use crate::cli::RunsArgs;

/// Runs `command` and returns the JSON document to print.
pub fn run(command: &Command, config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    match command {
        Command::States => states(config, backend),
        Command::Runs(args) => runs(args, config, backend),
        Command::RunInfo(args) => run_info(args, config, backend),
        Command::Reduced(args) => reduced(args, config, backend),
        Command::Metadata(args) => metadata(args, config, backend),
        Command::Paths(args) => paths(args, config),
    }
}

pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(Into::into)
    } else {
        serde_json::to_string(value).map_err(Into::into)
    }
}

fn states(config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    let experiment = config.require_experiment()?;
    let states = ReductionDiscoverer::new(&config.layout, backend).discover_state_ids(experiment);
    Ok(json!({
        "experiment": experiment,
        "count": states.len(),
        "states": states,
    }))
}

fn runs(args: &RunsArgs, config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    let experiment = config.require_experiment()?;
    let runs = ReductionDiscoverer::new(&config.layout, backend).discover_reduced_runs(
        experiment,
        &args.state_id,
        args.mode.mode(),
        !args.all,
    );
    let runs = RunFilter {
        search: args.search.clone(),
        limit: args.limit,
    }
    .apply(runs);
    Ok(json!({
        "experiment": experiment,
        "state_id": args.state_id,
        "count": runs.len(),
        "runs": serde_json::to_value(&runs)?,
    }))
}

fn run_info(args: &RunInfoArgs, config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    let experiment = config.require_experiment()?;
    let mode = args.mode.mode();
    let run = ReductionDiscoverer::new(&config.layout, backend)
        .find_reduced_run(experiment, &args.state_id, args.run, mode)
        .with_context(|| {
            format!(
                "run {} has no {mode} reduction in state {} of {experiment}",
                args.run, args.state_id
            )
        })?;
    serde_json::to_value(&run).map_err(Into::into)
}

fn reduced(args: &ModeArgs, config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    let experiment = config.require_experiment()?;
    let states = ReductionDiscoverer::new(&config.layout, backend)
        .discover_all_reduced_data(experiment, args.mode());
    serde_json::to_value(&states).map_err(Into::into)
}

fn metadata(args: &MetadataArgs, config: &Config, backend: &dyn ContainerBackend) -> Result<Value> {
    let resolver = RunMetadataResolver::new(&config.layout, backend);
    let metadata = match (&args.file, args.run) {
        (Some(file), _) => resolver.read_file(file),
        (None, Some(run)) => {
            let experiment = config.experiment.as_ref();
            let metadata = resolver.resolve(run, experiment);
            match experiment {
                Some(experiment) => metadata.with_extra("experiment", experiment.as_str()),
                None => metadata,
            }
        }
        (None, None) => anyhow::bail!("either RUN or --file is required"),
    };
    serde_json::to_value(&metadata).map_err(Into::into)
}

fn paths(args: &PathsArgs, config: &Config) -> Result<Value> {
    let experiment = config.require_experiment()?;
    let layout = &config.layout;
    let display = |path: PathBuf| path.display().to_string();
    Ok(json!({
        "experiment": experiment,
        "run_number": args.run,
        "lite": display(layout.raw_path(experiment, args.run, DataMode::Lite)),
        "native": display(layout.raw_path(experiment, args.run, DataMode::Native)),
        "existing": layout.resolve_existing_raw_path(experiment, args.run).map(display),
        "reduction_root": display(layout.reduction_root(experiment)),
    }))
}
