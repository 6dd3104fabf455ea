use super::traits::ConfigSection;
use crate::error::GenfuzzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzerConfig {
    /// Template used to seed the initial population.
    pub template_path: String,
    /// Request buffer capacity in bytes; doubles as the fixed genome length.
    pub max_request_size: usize,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        Self {
            template_path: "templates/http_request.tmpl".to_string(),
            max_request_size: 3000,
        }
    }
}

impl ConfigSection for FuzzerConfig {
    fn section_name() -> &'static str {
        "fuzzer"
    }

    fn validate(&self) -> Result<(), GenfuzzError> {
        if self.template_path.is_empty() {
            return Err(GenfuzzError::Configuration(
                "Template path must be set".to_string(),
            ));
        }
        if self.max_request_size == 0 {
            return Err(GenfuzzError::Configuration(
                "Maximum request size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
