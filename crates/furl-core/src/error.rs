//! Error types for graph model access.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Edge {edge} references missing endpoint {endpoint}")]
    MissingEndpoint { edge: String, endpoint: String },

    /// The rendering layer failed to settle a redraw or transition.
    ///
    /// Not raised by `MemoryGraph`; meant for `GraphModel` implementations
    /// backed by a real renderer.
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
