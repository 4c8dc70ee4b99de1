//! User configuration: `<home>/config.toml`, the `NEUTRONOTE_DATA_ROOT`
//! environment variable, then command-line overrides, in increasing
//! precedence. `<home>` is `NEUTRONOTE_HOME` or `~/.neutronote`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DataError;
use crate::DataLayout;
use crate::ExperimentId;
use crate::Result;

pub const CONFIG_TOML_FILE: &str = "config.toml";

/// Relocates the directory holding `config.toml`.
pub const HOME_ENV_VAR: &str = "NEUTRONOTE_HOME";

const DEFAULT_HOME_DIR: &str = ".neutronote";

/// Overrides `data_root` from the config file.
pub const DATA_ROOT_ENV_VAR: &str = "NEUTRONOTE_DATA_ROOT";

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    pub data_root: Option<PathBuf>,
    pub instrument: Option<String>,
    pub reduction_tool: Option<String>,
    pub experiment_prefix: Option<String>,
    /// Default experiment for commands that need one.
    pub experiment: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_root: Option<PathBuf>,
    pub experiment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub layout: DataLayout,
    pub experiment: Option<ExperimentId>,
}

impl Config {
    /// Reads `<home>/config.toml` (absent means defaults) and applies the
    /// environment and `overrides` on top.
    pub fn load(home: &Path, overrides: ConfigOverrides) -> Result<Self> {
        let config_toml = load_config_toml(&home.join(CONFIG_TOML_FILE))?;
        let env_data_root = std::env::var_os(DATA_ROOT_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::from_parts(config_toml, env_data_root, overrides)
    }

    pub fn from_parts(
        config_toml: ConfigToml,
        env_data_root: Option<PathBuf>,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        let ConfigToml {
            data_root,
            instrument,
            reduction_tool,
            experiment_prefix,
            experiment,
        } = config_toml;

        let mut layout = DataLayout::default();
        if let Some(data_root) = overrides.data_root.or(env_data_root).or(data_root) {
            layout.data_root = data_root;
        }
        if let Some(instrument) = instrument {
            layout.instrument = instrument;
        }
        if let Some(reduction_tool) = reduction_tool {
            layout.reduction_tool = reduction_tool;
        }
        if let Some(experiment_prefix) = experiment_prefix {
            layout.experiment_prefix = experiment_prefix;
        }

        let experiment = overrides
            .experiment
            .or(experiment)
            .map(|raw| ExperimentId::parse(&raw))
            .transpose()?;

        Ok(Self { layout, experiment })
    }

    pub fn require_experiment(&self) -> Result<&ExperimentId> {
        self.experiment
            .as_ref()
            .ok_or(DataError::ExperimentNotConfigured)
    }
}

/// The directory `config.toml` is read from.
///
/// An explicit `NEUTRONOTE_HOME` must already be a directory, since a typo
/// there would otherwise silently fall back to defaults. The default
/// `~/.neutronote` may be absent.
pub fn find_home() -> Result<PathBuf> {
    home_from(std::env::var_os(HOME_ENV_VAR), dirs::home_dir())
}

fn home_from(env_home: Option<OsString>, user_home: Option<PathBuf>) -> Result<PathBuf> {
    match env_home.filter(|value| !value.is_empty()) {
        Some(home) => {
            let path = PathBuf::from(home);
            if path.is_dir() {
                Ok(path)
            } else {
                Err(DataError::InvalidHome { path })
            }
        }
        None => user_home
            .map(|home| home.join(DEFAULT_HOME_DIR))
            .ok_or(DataError::HomeNotFound),
    }
}

fn load_config_toml(path: &Path) -> Result<ConfigToml> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| DataError::ParseConfig {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using defaults", path.display());
            Ok(ConfigToml::default())
        }
        Err(source) => Err(DataError::ReadConfig {
            path: path.to_path_buf(),
            source,
        }),
    }
}
