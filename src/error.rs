//! Error types for the machscope analyzer.
//!
//! Format-level failures live in `formats::macho::MachoError`; this module
//! wraps them together with loading and configuration failures for callers
//! that drive a whole analysis.

use crate::formats::macho::MachoError;
use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for machscope operations.
#[derive(Debug, Error)]
pub enum MachscopeError {
    /// Mach-O structure errors
    #[error(transparent)]
    Macho(#[from] MachoError),

    /// Loading the image failed
    #[error("Failed to load image: {0}")]
    Io(#[from] IoError),

    /// Reading a configuration file failed
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[source] std::io::Error),

    /// Configuration file is not valid JSON for `AnalysisConfig`
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MachscopeError {
    /// Whether the analysis produced no report at all
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Macho(err) => err.is_fatal(),
            _ => true,
        }
    }
}

/// Result type alias for machscope operations
pub type Result<T> = std::result::Result<T, MachscopeError>;
