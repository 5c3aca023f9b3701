use thiserror::Error;

pub type BlockIndexResult<T> = Result<T, BlockIndexError>;

#[derive(Debug, Clone, Error)]
pub enum BlockIndexError {
    #[error("block index unavailable: {0}")]
    Unavailable(String),
}
