//! Error types for simulator operations.

use thiserror::Error;

/// Errors that can occur when constructing simulator values.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    /// A state slice did not have exactly 4 components.
    #[error("state slice has length {got}, expected 4")]
    StateLength { got: usize },

    /// A state-action slice did not have exactly 5 components.
    #[error("state-action slice has length {got}, expected 5")]
    StateActionLength { got: usize },
}
