use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::product_name::ProductName;
use super::types::{ProductError, ProductReader};
use crate::sat_bands::{Band, Tier};

pub struct SafeReader {
    pub path: PathBuf,
}

impl ProductReader for SafeReader {
    fn read_product(&self) -> Result<SafeProduct, ProductError> {
        info!("SAFE-file detected: {}", self.path.display());
        SafeProduct::open(&self.path)
    }
}

/// An unpacked `.SAFE` product with its L2A granule located.
#[derive(Debug, Clone)]
pub struct SafeProduct {
    path: PathBuf,
    granule: PathBuf,
    name: Option<ProductName>,
}

impl SafeProduct {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProductError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(ProductError::NotFound(path));
        }

        let granule = Self::find_granule(&path)?;
        debug!("Granule: {}", granule.display());

        let stem = Self::stem_of(&path);
        let name = match stem.parse::<ProductName>() {
            Ok(name) => {
                if !name.is_l2a() {
                    warn!("{} is not an L2A product name", stem);
                }
                Some(name)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        };

        Ok(Self {
            path,
            granule,
            name,
        })
    }

    /// First entry under `GRANULE/` whose name contains `L2A`.
    fn find_granule(safe_path: &Path) -> Result<PathBuf, ProductError> {
        let granule_root = safe_path.join("GRANULE");
        if !granule_root.is_dir() {
            return Err(ProductError::GranuleNotFound(granule_root));
        }

        for entry in WalkDir::new(&granule_root)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains("L2A") {
                return Ok(entry.into_path());
            }
        }

        Err(ProductError::GranuleNotFound(granule_root))
    }

    fn stem_of(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        name.strip_suffix(".SAFE").unwrap_or(&name).to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn granule(&self) -> &Path {
        &self.granule
    }

    pub fn name(&self) -> Option<&ProductName> {
        self.name.as_ref()
    }

    /// Product directory name without `.SAFE`; the base of output file names.
    pub fn stem(&self) -> String {
        Self::stem_of(&self.path)
    }

    pub fn tier_directory(&self, tier: Tier) -> PathBuf {
        self.granule.join("IMG_DATA").join(tier.directory())
    }

    /// JPEG2000 files of `tier` holding one of the tier's stacked bands, in
    /// directory listing order.
    pub fn band_files(&self, tier: Tier) -> Result<Vec<(Band, PathBuf)>, ProductError> {
        let directory = self.tier_directory(tier);
        if !directory.is_dir() {
            return Err(ProductError::TierDirectory(directory));
        }

        let pattern = format!(
            "{}/*.jp2",
            glob::Pattern::escape(&directory.to_string_lossy())
        );

        let mut files = Vec::new();
        for path in glob::glob(&pattern)?.filter_map(Result::ok) {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string())
            else {
                continue;
            };
            if let Some(band) = select_band(&file_name, tier) {
                files.push((band, path));
            }
        }

        Ok(files)
    }
}

/// Band of `tier` named by `file_name`, e.g. `T32TQM_20230101T103421_B8A_20m.jp2`.
/// The code is the second to last `_` field of the stem.
pub fn select_band(file_name: &str, tier: Tier) -> Option<Band> {
    let stem = file_name.strip_suffix(".jp2")?;
    let mut fields = stem.rsplit('_');
    fields.next()?;
    let band: Band = fields.next()?.parse().ok()?;

    (band.tier() == tier && stem.ends_with(&band.file_token())).then_some(band)
}
