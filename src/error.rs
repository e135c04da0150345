//! Error types for the fingerprinting engine

use std::fmt;

/// Errors that can occur during fingerprinting, indexing, or matching
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Invalid input audio (empty buffer, non-finite samples, zero sample rate)
    InvalidInput(String),

    /// Invalid engine configuration, rejected at construction time
    InvalidConfig(String),

    /// Index snapshot could not be encoded or decoded
    CorruptIndex(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            EngineError::CorruptIndex(msg) => write!(f, "Corrupt index: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
