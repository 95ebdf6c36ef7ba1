//! Configuration for the chunker

use serde::{Deserialize, Serialize};

/// Configuration for the [`Chunker`](crate::Chunker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk size (characters)
    pub chunk_size: usize,

    /// Overlap carried between consecutive chunks (characters)
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 100,
        }
    }
}

impl ChunkerConfig {
    /// Fine preset: small chunks for precise traceability
    pub fn fine() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }

    /// Coarse preset: large chunks for fewer model calls
    pub fn coarse() -> Self {
        Self {
            chunk_size: 2000,
            overlap: 200,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.overlap >= self.chunk_size {
            return Err("overlap must be smaller than chunk_size".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
