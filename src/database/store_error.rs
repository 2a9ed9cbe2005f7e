use super::ScoreId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("no score with id {id} exists in the database")]
    NotFound { id: ScoreId },
    #[error("unsupported database url scheme: {url_scheme}")]
    UnsupportedBackend { url_scheme: String },
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
