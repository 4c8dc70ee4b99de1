use serde::Serialize;
use serde::Serializer;

use crate::ReducedRun;

/// An instrument state together with the runs reduced under it, in
/// ascending run-number order. Never built for a state without runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StateInfo {
    pub state_id: String,
    pub reduced_runs: Vec<ReducedRun>,
}

impl StateInfo {
    pub fn run_count(&self) -> usize {
        self.reduced_runs.len()
    }

    pub fn run_numbers(&self) -> Vec<u64> {
        let mut numbers: Vec<u64> = self.reduced_runs.iter().map(|run| run.run_number).collect();
        numbers.sort_unstable();
        numbers
    }
}

#[derive(Serialize)]
struct StateInfoView<'a> {
    state_id: &'a str,
    run_count: usize,
    run_numbers: Vec<u64>,
    reduced_runs: &'a [ReducedRun],
}

impl Serialize for StateInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        StateInfoView {
            state_id: &self.state_id,
            run_count: self.run_count(),
            run_numbers: self.run_numbers(),
            reduced_runs: &self.reduced_runs,
        }
        .serialize(serializer)
    }
}
