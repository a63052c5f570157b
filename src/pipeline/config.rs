use crate::error::PipelineError;
use folio_layout::LayoutConfig;
use serde::Deserialize;

/// Configuration of a formatting session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    /// Abort the whole run on the first page-sequence that fails to lay out,
    /// instead of recording the failure and moving on.
    pub fail_fast: bool,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }
}
