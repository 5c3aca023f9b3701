//! CLI argument parsing.

use std::path::PathBuf;

use argh::FromArgs;

use crate::errors::InitError;

#[derive(Clone, Debug, FromArgs)]
#[argh(description = "Basalt fast blocks sync against a simulated peer")]
pub(crate) struct Args {
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: Option<PathBuf>,

    /// Height to sync down from.
    #[argh(option, default = "10_000", description = "pivot height")]
    pub pivot: u64,

    /// Frontier left by an earlier run.
    #[argh(option, description = "lowest height already inserted without gaps")]
    pub lowest_inserted: Option<u64>,

    /// Chance that a simulated request fails, or that a block goes missing from a response.
    #[argh(
        option,
        default = "0.05",
        description = "simulated peer failure rate in [0, 1)"
    )]
    pub failure_rate: f64,

    /// Other generic overrides to the config toml.
    /// Will be used, for example, as `-o sync.concurrency=16 -o logging.json_format=true`
    #[argh(option, short = 'o', description = "generic config overrides")]
    pub overrides: Vec<String>,
}

impl Args {
    pub(crate) fn validate(&self) -> Result<(), InitError> {
        if !(0.0..1.0).contains(&self.failure_rate) {
            return Err(InitError::InvalidArg(format!(
                "failure rate must be in [0, 1), got {}",
                self.failure_rate
            )));
        }
        if let Some(lowest) = self.lowest_inserted {
            if lowest > self.pivot {
                return Err(InitError::InvalidArg(format!(
                    "lowest inserted height {lowest} is above pivot {}",
                    self.pivot
                )));
            }
        }
        Ok(())
    }
}
