//! Adapter Error Types

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("item serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("operation not supported by this adapter: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
