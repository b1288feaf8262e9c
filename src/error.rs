use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snippet content not found: {id}")]
    ContentNotFound { id: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
