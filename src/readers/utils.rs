use super::types::{ProductError, ProductFormat};
use std::path::Path;

pub fn format_from_path(path: &Path) -> Result<ProductFormat, ProductError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("SAFE") => Ok(ProductFormat::Safe),
        Some("zip") => Ok(ProductFormat::Zip),
        _ => Err(ProductError::InvalidSuffix(path.to_path_buf())),
    }
}

/// Name of the `.SAFE` directory a zip archive unpacks to. Handles both
/// `X.zip` and `X.SAFE.zip`.
pub fn safe_name_for_archive(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.ends_with(".SAFE") {
        Some(stem.to_string())
    } else {
        Some(format!("{stem}.SAFE"))
    }
}
