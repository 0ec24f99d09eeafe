pub mod batch_process;
pub mod stacker;

pub use batch_process::BatchProcessor;
pub use stacker::StackProcessor;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::readers::SafeProduct;

/// Folder created inside the `.SAFE` directory when no output folder is
/// configured.
pub const DEFAULT_OUTPUT_FOLDER: &str = "GTIFF_PRODUCT";

/// Resolves the folder results are written to. The default folder is wiped
/// on every run; a configured one is only created when missing.
pub fn prepare_output_folder(
    product: &SafeProduct,
    configured: Option<&Path>,
) -> std::io::Result<PathBuf> {
    if let Some(folder) = configured {
        fs::create_dir_all(folder)?;
        return Ok(folder.to_path_buf());
    }

    let folder = product.path().join(DEFAULT_OUTPUT_FOLDER);
    if folder.exists() {
        info!("Deleting files in {} folder", DEFAULT_OUTPUT_FOLDER);
        fs::remove_dir_all(&folder)?;
    }
    fs::create_dir(&folder)?;
    info!("Created output folder: {}", folder.display());

    Ok(folder)
}
