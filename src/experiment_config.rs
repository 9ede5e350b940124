mod algo_config;
mod general_experiment_config;
mod graph_creation_config;

pub use algo_config::{AlgoConfig, PsoExperiment, UnseededPsoExperiment};
pub use general_experiment_config::GeneralExperimentConfig;
pub use graph_creation_config::GraphCreationConfig;

use rayon::ThreadPoolBuildError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::graph::import::ImportError;

pub trait Algorithm {
    fn finished(&self) -> bool;
}

#[macro_export]
macro_rules! experiment {
    ($type:ty) => {
        impl Algorithm for $type {
            fn finished(&self) -> bool {
                self.finished
            }
        }
    };
}

pub trait Fix<CorrectType> {
    fn to_fixed(&self) -> CorrectType;
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub experiment: GeneralExperimentConfig,
    pub algorithm: AlgoConfig,
    pub graph_creation: GraphCreationConfig,
}

impl ExperimentConfig {
    /// Reads a YAML (`.yaml`, `.yml`) or RON (`.ron`) config.
    pub fn from_file(path: &Path) -> Result<Self, ExperimentConfigError> {
        if !path.exists() {
            return Err(ExperimentConfigError::MissingFile(
                path.display().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("ron") => Self::from_ron(&content),
            _ => Err(ExperimentConfigError::InvalidFormat(format!(
                "{} is neither yaml nor ron.",
                path.display()
            ))),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ExperimentConfigError> {
        serde_yaml::from_str(content)
            .map_err(|err| ExperimentConfigError::InvalidFormat(err.to_string()))
    }

    pub fn from_ron(content: &str) -> Result<Self, ExperimentConfigError> {
        ron::de::from_str(content)
            .map_err(|err| ExperimentConfigError::InvalidFormat(err.to_string()))
    }
}

#[derive(Debug)]
pub enum ExperimentConfigError {
    MissingFile(String),
    InvalidFormat(String),
    InvalidAlgorithmConfig(String),
    InvalidGraphConfig(String),
    Import(ImportError),
    Pool(String),
    Io(String),
}

impl fmt::Display for ExperimentConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile(file) => write!(f, "Missing config file: {}", file),
            Self::InvalidFormat(msg) => write!(f, "Config could not be read: {}", msg),
            Self::InvalidAlgorithmConfig(msg) => write!(f, "{}", msg),
            Self::InvalidGraphConfig(msg) => write!(f, "{}", msg),
            Self::Import(err) => write!(f, "{}", err),
            Self::Pool(msg) => write!(f, "Worker pool could not be started: {}", msg),
            Self::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for ExperimentConfigError {}

impl From<ImportError> for ExperimentConfigError {
    fn from(err: ImportError) -> Self {
        Self::Import(err)
    }
}

impl From<io::Error> for ExperimentConfigError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<ThreadPoolBuildError> for ExperimentConfigError {
    fn from(err: ThreadPoolBuildError) -> Self {
        Self::Pool(err.to_string())
    }
}
