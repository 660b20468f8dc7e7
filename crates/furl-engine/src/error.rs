use furl_core::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Graph model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
