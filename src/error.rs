//! Error types for the FP&A copilot

use thiserror::Error;

/// Result type alias for copilot operations
pub type Result<T> = std::result::Result<T, CopilotError>;

#[derive(Error, Debug)]
pub enum CopilotError {

    // =============================
    // Engine Errors
    // =============================

    #[error("Dataset has no actuals rows to resolve a month from")]
    EmptyDataset,

    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    // =============================
    // Dispatch Errors
    // =============================

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // =============================
    // Loading & Configuration
    // =============================

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
