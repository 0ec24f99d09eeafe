use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

pub mod product_kind;
pub use product_kind::ProductKind;

pub mod resampling;
pub use resampling::Resampling;

pub const DEFAULT_BLOCK_SIZE: usize = 1024;
pub const DEFAULT_OVERVIEW_FACTORS: [u32; 4] = [2, 4, 8, 16];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    products: Vec<PathBuf>,
    output_directory: Option<PathBuf>,
    product: ProductKind,
    resampling: Resampling,
    xml: bool,
    pyramids: bool,
    overview_factors: Vec<u32>,
    block_size: usize,
    num_threads: Option<usize>,
}

/// Values given on the command line. `None` keeps what the config file (or
/// the default) says.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub products: Vec<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub product: Option<String>,
    pub resampling: Option<String>,
    pub xml: Option<bool>,
    pub pyramids: Option<bool>,
    pub block_size: Option<usize>,
    pub num_threads: Option<usize>,
}

fn validate_block_size(block_size: usize) -> Result<usize, ConfigError> {
    if block_size == 0 || block_size % 16 != 0 {
        return Err(ConfigError::BlockSize(block_size));
    }
    Ok(block_size)
}

fn validate_overview_factors(factors: Vec<u32>) -> Result<Vec<u32>, ConfigError> {
    let increasing = factors.windows(2).all(|w| w[0] < w[1]);
    let in_range = factors
        .iter()
        .all(|&f| f >= 2 && i32::try_from(f).is_ok());
    if !increasing || !in_range {
        return Err(ConfigError::OverviewFactors(factors));
    }
    Ok(factors)
}

fn validate_num_threads(num_threads: Option<usize>) -> Result<Option<usize>, ConfigError> {
    match num_threads {
        Some(0) => Err(ConfigError::NumThreads),
        other => Ok(other),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            output_directory: None,
            product: ProductKind::All,
            resampling: Resampling::Nearest,
            xml: true,
            pyramids: true,
            overview_factors: DEFAULT_OVERVIEW_FACTORS.to_vec(),
            block_size: DEFAULT_BLOCK_SIZE,
            num_threads: None,
        }
    }
}

// Every key is optional; the resampling option, block size, overview factors
// and thread count are validated here so a bad file fails before any product
// is touched.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            #[serde(default)]
            products: Vec<PathBuf>,
            output_directory: Option<PathBuf>,
            #[serde(default)]
            product: ProductKind,
            resampling: Option<String>,
            xml: Option<bool>,
            pyramids: Option<bool>,
            overview_factors: Option<Vec<u32>>,
            block_size: Option<usize>,
            num_threads: Option<usize>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let resampling = match helper.resampling {
            Some(raw) => raw
                .parse::<Resampling>()
                .map_err(|e| D::Error::custom(ConfigError::from(e)))?,
            None => Resampling::default(),
        };

        let block_size = validate_block_size(helper.block_size.unwrap_or(DEFAULT_BLOCK_SIZE))
            .map_err(D::Error::custom)?;

        let overview_factors = validate_overview_factors(
            helper
                .overview_factors
                .unwrap_or_else(|| DEFAULT_OVERVIEW_FACTORS.to_vec()),
        )
        .map_err(D::Error::custom)?;

        let num_threads = validate_num_threads(helper.num_threads).map_err(D::Error::custom)?;

        Ok(Config {
            products: helper.products,
            output_directory: helper.output_directory,
            product: helper.product,
            resampling,
            xml: helper.xml.unwrap_or(true),
            pyramids: helper.pyramids.unwrap_or(true),
            overview_factors,
            block_size,
            num_threads,
        })
    }
}

impl Config {
    pub fn new(products: Vec<PathBuf>, product: ProductKind, resampling: Resampling) -> Self {
        Self {
            products,
            product,
            resampling,
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Applies command-line values on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Config, ConfigError> {
        if !overrides.products.is_empty() {
            self.products = overrides.products;
        }
        if overrides.output_directory.is_some() {
            self.output_directory = overrides.output_directory;
        }
        if let Some(product) = overrides.product {
            self.product = product.parse()?;
        }
        if let Some(resampling) = overrides.resampling {
            self.resampling = resampling.parse()?;
        }
        if let Some(xml) = overrides.xml {
            self.xml = xml;
        }
        if let Some(pyramids) = overrides.pyramids {
            self.pyramids = pyramids;
        }
        if let Some(block_size) = overrides.block_size {
            self.block_size = validate_block_size(block_size)?;
        }
        if overrides.num_threads.is_some() {
            self.num_threads = validate_num_threads(overrides.num_threads)?;
        }

        Ok(self)
    }

    /// Checks what only makes sense once the file and the command line are
    /// merged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.products.is_empty() {
            return Err(ConfigError::NoProducts);
        }
        Ok(())
    }

    pub fn products(&self) -> &[PathBuf] {
        &self.products
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    pub fn product(&self) -> ProductKind {
        self.product
    }

    pub fn resampling(&self) -> Resampling {
        self.resampling
    }

    pub fn xml(&self) -> bool {
        self.xml
    }

    pub fn pyramids(&self) -> bool {
        self.pyramids
    }

    pub fn overview_factors(&self) -> &[u32] {
        &self.overview_factors
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Value handed to GDAL's `NUM_THREADS` options.
    pub fn gdal_num_threads(&self) -> String {
        match self.num_threads {
            Some(n) => n.to_string(),
            None => "ALL_CPUS".to_string(),
        }
    }
}
