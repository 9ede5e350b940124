use serde::{Deserialize, Serialize};

use crate::experiment_config::ExperimentConfigError;

/// Instance file to load. The window stored in the file can be overridden.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
pub struct GraphCreationConfig {
    pub filename: String,
    #[serde(default)]
    pub c_min: Option<f64>,
    #[serde(default)]
    pub c_max: Option<f64>,
}

impl GraphCreationConfig {
    /// Picks the overrides over the values from the file and checks the window.
    pub fn window(&self, c_min: f64, c_max: f64) -> Result<(f64, f64), ExperimentConfigError> {
        let c_min = self.c_min.unwrap_or(c_min);
        let c_max = self.c_max.unwrap_or(c_max);
        if c_min.is_nan() || c_max.is_nan() || c_min > c_max {
            return Err(ExperimentConfigError::InvalidGraphConfig(format!(
                "Cmin {} has to be at most Cmax {}.",
                c_min, c_max
            )));
        }

        Ok((c_min, c_max))
    }
}
