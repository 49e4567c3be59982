//! Configuration for an analysis run.
//!
//! Every section has defaults, so a configuration file only needs to name
//! the values it changes.

use crate::error::{MachscopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration for the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// File loading limits.
    pub io: IoConfig,
    /// Indirect binding resolution.
    pub bindings: BindingConfig,
    /// Symbol listing in the report.
    pub symbols: SymbolConfig,
}

impl AnalysisConfig {
    /// Load a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(MachscopeError::ConfigIo)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the analyzer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.io.max_file_size == 0 {
            return Err(MachscopeError::InvalidConfig(
                "io.max_file_size must be greater than zero".to_string(),
            ));
        }
        if self.bindings.pointer_segments.is_empty() {
            return Err(MachscopeError::InvalidConfig(
                "bindings.pointer_segments must name at least one segment".to_string(),
            ));
        }
        if let Some(name) = self
            .bindings
            .pointer_segments
            .iter()
            .find(|s| s.is_empty() || s.len() > 16)
        {
            return Err(MachscopeError::InvalidConfig(format!(
                "invalid segment name {:?}: must be 1 to 16 bytes",
                name
            )));
        }
        Ok(())
    }
}

/// File loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Largest image that will be mapped.
    pub max_file_size: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_file_size: 512 * 1024 * 1024,
        }
    }
}

/// Indirect binding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Segments whose symbol pointer sections are resolved.
    pub pointer_segments: Vec<String>,
    /// Stop resolving after this many bindings (no limit when unset).
    pub max_bindings: Option<usize>,
}

/// Default for `BindingConfig::max_bindings`.
pub const DEFAULT_MAX_BINDINGS: usize = 100_000;

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            pointer_segments: vec!["__DATA".to_string(), "__DATA_CONST".to_string()],
            max_bindings: Some(DEFAULT_MAX_BINDINGS),
        }
    }
}

/// Symbol listing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    /// Attach demangled names to C++ and Rust symbols.
    pub demangle: bool,
    /// Cap on the number of symbol entries listed (all when unset).
    pub max_symbols: Option<usize>,
}
