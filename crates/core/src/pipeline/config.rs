//! Configuration for the pipeline module.

use serde::{Deserialize, Serialize};

use super::types::DEFAULT_FORMAT;

/// Configuration for the conversion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Format applied to requests that do not name one.
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Stop the run at the first failed request.
    ///
    /// The failing request still writes its error record; every later
    /// ticket is aborted without output.
    #[serde(default)]
    pub halt_on_error: bool,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            halt_on_error: false,
        }
    }
}

impl PipelineConfig {
    /// Sets the default format.
    pub fn with_default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = format.into();
        self
    }

    /// Enables or disables halting on the first failure.
    pub fn with_halt_on_error(mut self, halt: bool) -> Self {
        self.halt_on_error = halt;
        self
    }
}
