// ingest settings, read from TOON
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{IngestError, IngestResult};
use crate::format::read_file;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// key of the `key=cluster_id` block headers in cluster files
    pub header_key: String,
    /// reject block headers that use any key other than `header_key`
    pub strict_header_key: bool,
    /// check observations against the schema when loading a dataset
    pub validate_observations: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_key: "irm".to_string(),
            strict_header_key: false,
            validate_observations: true,
        }
    }
}

impl IngestConfig {
    pub fn from_toon_str(text: &str) -> IngestResult<Self> {
        let config: IngestConfig =
            toon_format::decode_default(text).map_err(|e| IngestError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> IngestResult<Self> {
        let path = path.as_ref();
        let text = read_file(path)?;
        Self::from_toon_str(&text).map_err(|e| e.in_file(path))
    }

    pub fn validate(&self) -> IngestResult<()> {
        let key = self.header_key.as_str();
        if key.is_empty() || key.contains('=') || key.chars().any(char::is_whitespace) {
            return Err(IngestError::Config(format!(
                "header_key must be a non-empty token without '=' or whitespace, got {:?}",
                key
            )));
        }
        Ok(())
    }
}
