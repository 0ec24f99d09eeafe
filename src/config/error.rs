use thiserror::Error;

use crate::config::product_kind::ProductKindParseError;
use crate::config::resampling::ResamplingParseError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Resampling(#[from] ResamplingParseError),
    #[error("{0}")]
    ProductKind(#[from] ProductKindParseError),
    #[error("block_size should be a positive multiple of 16, got {0}")]
    BlockSize(usize),
    #[error("overview_factors should be >= 2, fit in an i32 and be strictly increasing, got {0:?}")]
    OverviewFactors(Vec<u32>),
    #[error("num_threads should be greater than 0")]
    NumThreads,
    #[error("no product to process")]
    NoProducts,
}
