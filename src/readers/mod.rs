pub mod archive;
pub mod product_name;
pub mod safe;
pub mod types;
pub mod utils;

pub use archive::ZipReader;
pub use product_name::ProductName;
pub use safe::{SafeProduct, SafeReader};
pub use types::{ProductError, ProductFormat, ProductReader};
pub use utils::format_from_path;

use std::path::Path;

/// Picks the reader for a product path after checking that it exists and has
/// a `.zip` or `.SAFE` suffix.
pub fn create_reader<P: AsRef<Path>>(path: P) -> Result<Box<dyn ProductReader>, ProductError> {
    let path = path.as_ref().to_path_buf();
    if !path.exists() {
        return Err(ProductError::NotFound(path));
    }

    match format_from_path(&path)? {
        ProductFormat::Safe => Ok(Box::new(SafeReader { path })),
        ProductFormat::Zip => Ok(Box::new(ZipReader { path })),
    }
}

/// Validates a product path and returns the unpacked product.
pub fn open_product<P: AsRef<Path>>(path: P) -> Result<SafeProduct, ProductError> {
    create_reader(path)?.read_product()
}
