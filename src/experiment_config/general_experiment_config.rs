use serde::{Deserialize, Serialize};

use crate::experiment;
use crate::experiment_config::Algorithm;

fn default_aggregation_rate() -> usize {
    1
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct GeneralExperimentConfig {
    /// Finished experiments are skipped when a batch is run again.
    #[serde(default)]
    pub finished: bool,
    #[serde(default = "default_aggregation_rate")]
    pub aggregation_rate: usize,
    #[serde(default)]
    pub verbose: bool,
}

experiment! {GeneralExperimentConfig}

impl Default for GeneralExperimentConfig {
    fn default() -> Self {
        GeneralExperimentConfig {
            finished: false,
            aggregation_rate: default_aggregation_rate(),
            verbose: false,
        }
    }
}
