mod pso_experiment;

use serde::{Deserialize, Serialize};

use crate::experiment_config::{ExperimentConfigError, Fix};
pub use pso_experiment::{PsoExperiment, UnseededPsoExperiment};

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum AlgoConfig {
    Pso(PsoExperiment),
    UnseededPso(UnseededPsoExperiment),
}

impl AlgoConfig {
    pub fn pso(&self) -> Result<PsoExperiment, ExperimentConfigError> {
        let pso = match self {
            AlgoConfig::Pso(pso) => *pso,
            AlgoConfig::UnseededPso(uspso) => uspso.to_fixed(),
        };
        pso.validate()?;

        Ok(pso)
    }
}
