//! Byte encodings for whole vectors.

use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};

/// Encoding used by byte-oriented stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Compact JSON record array.
    Json,
    /// Indented JSON record array.
    JsonPretty,
    /// YAML sequence of records.
    Yaml,
}

impl Format {
    /// The format registered under a store name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "jsonf" => Some(Self::JsonPretty),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonPretty => "jsonf",
            Self::Yaml => "yaml",
        }
    }

    pub fn encode(&self, vector: &Vector) -> StoreResult<Vec<u8>> {
        match self {
            Self::Json => Ok(vector.to_json(false)?),
            Self::JsonPretty => Ok(vector.to_json(true)?),
            Self::Yaml => serde_yaml::to_string(vector)
                .map(String::into_bytes)
                .map_err(|e| StoreError::Serialization(e.to_string())),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> StoreResult<Vector> {
        match self {
            Self::Json | Self::JsonPretty => Ok(Vector::from_json(bytes)?),
            Self::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
            }
        }
    }
}
