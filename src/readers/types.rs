use std::path::PathBuf;
use thiserror::Error;

use super::SafeProduct;

/// Opens a Sentinel-2 product and hands back its unpacked `.SAFE` layout.
pub trait ProductReader {
    fn read_product(&self) -> Result<SafeProduct, ProductError>;
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("File does not exist: {0}")]
    NotFound(PathBuf),
    #[error("File does not have the correct suffix (.zip or .SAFE): {0}")]
    InvalidSuffix(PathBuf),
    #[error("Archive did not contain the expected product: {0}")]
    ExtractedMissing(PathBuf),
    #[error("L2A product not found: {0}")]
    GranuleNotFound(PathBuf),
    #[error("Band directory not found: {0}")]
    TierDirectory(PathBuf),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFormat {
    Safe,
    Zip,
}
