use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::sat_bands::Band;

/// Which stack is assembled from a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductKind {
    /// All twelve L2A bands at 10m.
    #[default]
    All,
    /// Blue, green, red and NIR at their native 10m.
    Rgbn,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProductKindParseError(pub String);

impl fmt::Display for ProductKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid product kind: {}", self.0)
    }
}

impl std::error::Error for ProductKindParseError {}

impl ProductKind {
    /// Bands of the written stack in output order.
    pub fn output_bands(&self) -> &'static [Band] {
        match self {
            ProductKind::All => &[
                Band::B01,
                Band::B02,
                Band::B03,
                Band::B04,
                Band::B05,
                Band::B06,
                Band::B07,
                Band::B08,
                Band::B8A,
                Band::B09,
                Band::B11,
                Band::B12,
            ],
            ProductKind::Rgbn => &[Band::B02, Band::B03, Band::B04, Band::B08],
        }
    }
}

impl FromStr for ProductKind {
    type Err = ProductKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ProductKind::All),
            "rgbn" => Ok(ProductKind::Rgbn),
            _ => Err(ProductKindParseError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ProductKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProductKind::All => write!(f, "all"),
            ProductKind::Rgbn => write!(f, "rgbn"),
        }
    }
}
