use thiserror::Error;

/// Errors raised while building or mutating an [`InvertedIndex`](crate::InvertedIndex).
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    /// idf is undefined when N = 0, so an empty corpus is rejected at build time.
    #[error("cannot build an index over an empty corpus")]
    EmptyCorpus,

    /// Document ids and dimensions are `u32`.
    #[error("corpus exceeds the u32 document or term id space")]
    CorpusTooLarge,

    /// Pruning threshold must be a non-negative number.
    #[error("invalid pruning threshold: {0}")]
    InvalidThreshold(f64),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
