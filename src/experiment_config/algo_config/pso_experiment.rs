use serde::{Deserialize, Serialize};

use crate::experiment_config::{ExperimentConfigError, Fix};
use crate::metaheuristic::pso::Params;
use crate::rng::os_random_seed;

fn default_swarm_size() -> usize {
    100
}

fn default_max_cycles() -> usize {
    100
}

fn default_social_factor() -> f64 {
    0.7
}

fn default_cognitive_factor() -> f64 {
    0.3
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug, PartialEq)]
pub struct PsoExperiment {
    #[serde(default = "default_swarm_size")]
    pub swarm_size: usize,
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
    #[serde(default = "default_social_factor")]
    pub social_factor: f64,
    #[serde(default = "default_cognitive_factor")]
    pub cognitive_factor: f64,
    #[serde(default)]
    pub mst: bool,
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub optima: u32,
    #[serde(default)]
    pub threads: usize,
    #[serde(default)]
    pub max_velocity: f64,
    pub seed: u64,
}

impl PsoExperiment {
    pub fn validate(&self) -> Result<(), ExperimentConfigError> {
        if self.swarm_size == 0 {
            return Err(ExperimentConfigError::InvalidAlgorithmConfig(
                "swarm_size has to be at least 1.".to_string(),
            ));
        }
        if !self.social_factor.is_finite() || !self.cognitive_factor.is_finite() {
            return Err(ExperimentConfigError::InvalidAlgorithmConfig(
                "social_factor and cognitive_factor have to be finite.".to_string(),
            ));
        }
        if self.max_velocity < 0.0 || self.max_velocity.is_nan() {
            return Err(ExperimentConfigError::InvalidAlgorithmConfig(
                "max_velocity can't be negative.".to_string(),
            ));
        }

        Ok(())
    }

    pub fn params(&self) -> Params {
        Params::new(
            self.max_cycles,
            self.swarm_size,
            self.social_factor,
            self.cognitive_factor,
            self.mst,
            self.random,
            self.optima,
            self.threads,
            self.max_velocity,
            Some(self.seed as u128),
        )
    }
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct UnseededPsoExperiment {
    #[serde(default = "default_swarm_size")]
    pub swarm_size: usize,
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
    #[serde(default = "default_social_factor")]
    pub social_factor: f64,
    #[serde(default = "default_cognitive_factor")]
    pub cognitive_factor: f64,
    #[serde(default)]
    pub mst: bool,
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub optima: u32,
    #[serde(default)]
    pub threads: usize,
    #[serde(default)]
    pub max_velocity: f64,
}

impl Fix<PsoExperiment> for UnseededPsoExperiment {
    fn to_fixed(&self) -> PsoExperiment {
        PsoExperiment {
            swarm_size: self.swarm_size,
            max_cycles: self.max_cycles,
            social_factor: self.social_factor,
            cognitive_factor: self.cognitive_factor,
            mst: self.mst,
            random: self.random,
            optima: self.optima,
            threads: self.threads,
            max_velocity: self.max_velocity,
            seed: (os_random_seed() >> 64) as u64,
        }
    }
}
