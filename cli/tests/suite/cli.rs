use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

const STATE: &str = "04bd2c53f6bf6754";

struct Env {
    home: TempDir,
    data_root: TempDir,
}

impl Env {
    fn new() -> Result<Self> {
        Ok(Self {
            home: TempDir::new()?,
            data_root: TempDir::new()?,
        })
    }

    fn command(&self) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("neutronote")?;
        cmd.env("NEUTRONOTE_HOME", self.home.path())
            .env_remove("NEUTRONOTE_DATA_ROOT")
            .env_remove("RUST_LOG")
            .arg("--data-root")
            .arg(self.data_root.path());
        Ok(cmd)
    }

    fn json(&self, args: &[&str]) -> Result<Value> {
        let output = self.command()?.args(args).assert().success().get_output().clone();
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn reduction(&self, state: &str, mode: &str, run: u64, timestamp: &str) -> Result<PathBuf> {
        let dir = self
            .data_root
            .path()
            .join("IPTS-12345/shared/SNAPRed")
            .join(state)
            .join(mode)
            .join(run.to_string())
            .join(timestamp);
        fs::create_dir_all(&dir)?;
        let file = dir.join(format!("reduced_{run:06}_{timestamp}.nxs"));
        fs::write(&file, b"")?;
        Ok(file)
    }
}

fn touch(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")?;
    Ok(())
}

#[test]
fn states_lists_reduction_states() -> Result<()> {
    let env = Env::new()?;
    env.reduction(STATE, "lite", 64413, "2025-05-08T162147")?;
    fs::create_dir_all(env.data_root.path().join("IPTS-12345/shared/SNAPRed/scratch"))?;

    let value = env.json(&["-e", "IPTS-12345", "states"])?;
    assert_eq!(
        value,
        json!({
            "experiment": "IPTS-12345",
            "count": 1,
            "states": [STATE],
        })
    );
    Ok(())
}

#[test]
fn runs_supports_all_search_and_limit() -> Result<()> {
    let env = Env::new()?;
    env.reduction(STATE, "lite", 64413, "2025-05-08T162147")?;
    env.reduction(STATE, "lite", 64413, "2025-05-09T090000")?;
    env.reduction(STATE, "lite", 64500, "2025-05-09T090000")?;

    let latest = env.json(&["-e", "IPTS-12345", "runs", STATE])?;
    assert_eq!(latest["count"], json!(2));
    assert_eq!(latest["runs"][0]["timestamp"], json!("2025-05-09T090000"));
    assert_eq!(
        latest["runs"][0]["timestamp_display"],
        json!("2025-05-09 09:00:00")
    );

    let all = env.json(&["-e", "IPTS-12345", "runs", STATE, "--all"])?;
    assert_eq!(all["count"], json!(3));

    let searched = env.json(&["-e", "IPTS-12345", "runs", STATE, "--search", "44"])?;
    assert_eq!(searched["runs"][0]["run_number"], json!(64413));
    assert_eq!(searched["count"], json!(1));

    let limited = env.json(&["-e", "IPTS-12345", "runs", STATE, "--limit", "1"])?;
    assert_eq!(limited["count"], json!(1));

    let native = env.json(&["-e", "IPTS-12345", "runs", STATE, "--native"])?;
    assert_eq!(native["count"], json!(0));
    Ok(())
}

#[test]
fn run_info_prints_the_latest_reduction() -> Result<()> {
    let env = Env::new()?;
    env.reduction(STATE, "lite", 64413, "2025-05-08T162147")?;
    let latest = env.reduction(STATE, "lite", 64413, "2025-05-09T090000")?;

    let value = env.json(&["-e", "IPTS-12345", "run-info", "64413", "--state", STATE])?;
    assert_eq!(value["reduced_file"], json!(latest.display().to_string()));
    assert_eq!(value["record_file"], Value::Null);
    assert_eq!(value["title"], json!(""));
    Ok(())
}

#[test]
fn run_info_fails_for_unknown_run() -> Result<()> {
    let env = Env::new()?;
    env.command()?
        .args(["-e", "IPTS-12345", "run-info", "1", "--state", STATE])
        .assert()
        .failure()
        .stderr(contains("run 1 has no lite reduction"));
    Ok(())
}

#[test]
fn reduced_groups_runs_by_state() -> Result<()> {
    let env = Env::new()?;
    env.reduction(STATE, "native", 64413, "2025-05-08T162147")?;
    env.reduction(STATE, "native", 64414, "2025-05-08T162147")?;

    let value = env.json(&["-e", "IPTS-12345", "reduced", "--native"])?;
    assert_eq!(value[0]["state_id"], json!(STATE));
    assert_eq!(value[0]["run_count"], json!(2));
    assert_eq!(value[0]["run_numbers"], json!([64413, 64414]));

    assert_eq!(env.json(&["-e", "IPTS-12345", "reduced"])?, json!([]));
    Ok(())
}

#[test]
fn metadata_reports_unlocatable_runs_in_the_payload() -> Result<()> {
    let env = Env::new()?;

    let value = env.json(&["-e", "IPTS-12345", "metadata", "99999"])?;
    assert_eq!(
        value["error"],
        json!("Could not locate file for run 99999 in IPTS-12345")
    );
    assert_eq!(value["run_number"], json!(99999));
    assert_eq!(value["experiment"], json!("IPTS-12345"));
    assert_eq!(value["count_rate_display"], json!("N/A"));
    Ok(())
}

#[test]
fn metadata_reads_an_explicit_file() -> Result<()> {
    let env = Env::new()?;
    let missing = env.data_root.path().join("SNAP_1.nxs.h5");

    let value = env.json(&["metadata", "--file", &missing.display().to_string()])?;
    assert_eq!(
        value["error"],
        json!(format!("File not found: {}", missing.display()))
    );
    assert_eq!(value["run_number"], json!(0));
    Ok(())
}

#[test]
fn metadata_requires_run_or_file() -> Result<()> {
    let env = Env::new()?;
    env.command()?.arg("metadata").assert().failure();
    Ok(())
}

#[test]
fn paths_reports_candidates_and_existing_file() -> Result<()> {
    let env = Env::new()?;
    let root = env.data_root.path();
    let lite = root.join("IPTS-12345/shared/lite/SNAP_64413.lite.nxs.h5");
    touch(&lite)?;

    let value = env.json(&["-e", "IPTS-12345", "paths", "64413"])?;
    assert_eq!(
        value,
        json!({
            "experiment": "IPTS-12345",
            "run_number": 64413,
            "lite": lite.display().to_string(),
            "native": root.join("IPTS-12345/nexus/SNAP_64413.nxs.h5").display().to_string(),
            "existing": lite.display().to_string(),
            "reduction_root": root.join("IPTS-12345/shared/SNAPRed").display().to_string(),
        })
    );
    Ok(())
}

#[test]
fn experiment_can_come_from_config() -> Result<()> {
    let env = Env::new()?;
    fs::write(
        env.home.path().join("config.toml"),
        "experiment = \"IPTS-12345\"\n",
    )?;
    env.reduction(STATE, "lite", 64413, "2025-05-08T162147")?;

    let value = env.json(&["states"])?;
    assert_eq!(value["states"], json!([STATE]));
    Ok(())
}

#[test]
fn missing_experiment_is_an_error() -> Result<()> {
    let env = Env::new()?;
    env.command()?
        .arg("states")
        .assert()
        .failure()
        .stderr(contains("no experiment configured"));
    Ok(())
}

#[test]
fn invalid_identifiers_are_rejected() -> Result<()> {
    let env = Env::new()?;
    env.command()?
        .args(["-e", "../etc", "states"])
        .assert()
        .failure()
        .stderr(contains("invalid experiment identifier"));
    env.command()?
        .args(["-e", "IPTS-12345", "runs", "not-a-state"])
        .assert()
        .failure()
        .stderr(contains("invalid state identifier"));
    Ok(())
}

#[test]
fn invalid_config_is_reported() -> Result<()> {
    let env = Env::new()?;
    fs::write(env.home.path().join("config.toml"), "colour = \"blue\"\n")?;
    env.command()?
        .args(["-e", "IPTS-12345", "states"])
        .assert()
        .failure()
        .stderr(contains("failed to parse config"));
    Ok(())
}

#[test]
fn home_must_exist_when_set() -> Result<()> {
    let env = Env::new()?;
    let missing = env.home.path().join("missing");
    env.command()?
        .env("NEUTRONOTE_HOME", &missing)
        .args(["-e", "IPTS-12345", "states"])
        .assert()
        .failure()
        .stderr(contains("NEUTRONOTE_HOME must name an existing directory"));
    Ok(())
}
