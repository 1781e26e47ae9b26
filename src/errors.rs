//! Error types for ingestion, reconstruction and data loading

use serde::Serialize;
use thiserror::Error;

/// A record the ingestion step refused
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestError {
    #[error("Item '{item}' has a peer without '{field}', peer dropped")]
    MissingRequiredField { item: String, field: String },

    #[error("Item '{item}' has no '{field}', item rejected")]
    MissingItemField { item: String, field: String },

    #[error("Item '{item}' has an unparseable '{field}': '{value}'")]
    MalformedInput {
        item: String,
        field: String,
        value: String,
    },
}

impl IngestError {
    /// True when the whole item was excluded, not just one of its peers
    pub fn rejects_item(&self) -> bool {
        matches!(
            self,
            IngestError::MissingItemField { .. } | IngestError::MalformedInput { .. }
        )
    }

    pub fn item(&self) -> &str {
        match self {
            IngestError::MissingRequiredField { item, .. } => item,
            IngestError::MissingItemField { item, .. } => item,
            IngestError::MalformedInput { item, .. } => item,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconstructError {
    #[error("Invalid window duration: {0}")]
    InvalidWindow(f64),
}

/// Failures loading the tracker data file
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}
