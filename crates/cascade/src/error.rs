//! Error types for the layout engine.
//!
//! Layout itself never fails: bad inputs are clamped. These errors cover the
//! plumbing around it, namely configuration parsing and async dispatch.

use cascade_core::CoreError;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur around the layout engine.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Layout configuration could not be parsed.
    #[error("Invalid layout configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Layout configuration could not be serialized.
    #[error("Failed to serialize layout configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The async layout job could not be dispatched.
    #[error("Async layout dispatch failed: {0}")]
    Dispatch(#[from] CoreError),
}
