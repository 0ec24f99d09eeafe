use log::info;
use std::fs::File;
use std::path::PathBuf;

use super::safe::SafeProduct;
use super::types::{ProductError, ProductReader};
use super::utils::safe_name_for_archive;

/// A zipped product, unpacked next to the archive before it is read.
pub struct ZipReader {
    pub path: PathBuf,
}

impl ZipReader {
    /// Extracts the archive into its parent directory and returns the path of
    /// the unpacked `.SAFE` directory.
    pub fn extract(&self) -> Result<PathBuf, ProductError> {
        info!("Zip-file detected: {}", self.path.display());

        let parent = self
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let file = File::open(&self.path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&parent)?;
        info!("Extracted in {}", parent.display());

        let safe_name = safe_name_for_archive(&self.path)
            .ok_or_else(|| ProductError::InvalidSuffix(self.path.clone()))?;
        let safe_path = parent.join(safe_name);
        if !safe_path.is_dir() {
            return Err(ProductError::ExtractedMissing(safe_path));
        }

        Ok(safe_path)
    }
}

impl ProductReader for ZipReader {
    fn read_product(&self) -> Result<SafeProduct, ProductError> {
        let safe_path = self.extract()?;
        SafeProduct::open(safe_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::FileOptions;

    const NAME: &str = "S2B_MSIL2A_20220615T100559_N0400_R022_T33UUP_20220615T121014";

    fn write_archive(path: &std::path::Path, entries: &[&str]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for entry in entries {
            if entry.ends_with('/') {
                writer.add_directory(*entry, FileOptions::default()).unwrap();
            } else {
                writer.start_file(*entry, FileOptions::default()).unwrap();
                writer.write_all(b"jp2").unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_and_open() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join(format!("{NAME}.zip"));
        let granule = format!("{NAME}.SAFE/GRANULE/L2A_T33UUP_A027560_20220615T100559/");
        write_archive(
            &archive,
            &[
                &format!("{NAME}.SAFE/"),
                &format!("{NAME}.SAFE/GRANULE/"),
                &granule,
                &format!("{granule}IMG_DATA/"),
                &format!("{granule}IMG_DATA/R10m/"),
                &format!("{granule}IMG_DATA/R10m/T33UUP_20220615T100559_B02_10m.jp2"),
            ],
        );

        let product = ZipReader { path: archive }.read_product().unwrap();

        assert_eq!(product.path(), dir.path().join(format!("{NAME}.SAFE")));
        assert_eq!(product.stem(), NAME);
        assert!(product.granule().ends_with("L2A_T33UUP_A027560_20220615T100559"));
    }

    #[test]
    fn test_archive_without_safe_directory() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join(format!("{NAME}.zip"));
        write_archive(&archive, &["unrelated/", "unrelated/readme.txt"]);

        let err = ZipReader { path: archive }.read_product().unwrap_err();
        assert!(matches!(err, ProductError::ExtractedMissing(_)));
    }

    #[test]
    fn test_corrupt_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join(format!("{NAME}.zip"));
        std::fs::write(&archive, b"not a zip").unwrap();

        let err = ZipReader { path: archive }.read_product().unwrap_err();
        assert!(matches!(err, ProductError::Zip(_)));
    }
}
