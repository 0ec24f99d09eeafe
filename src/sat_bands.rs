use std::fmt::Display;
use std::str::FromStr;

/// Native spatial resolution at which Sentinel-2 delivers a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    R10m,
    R20m,
    R60m,
}

/// Sentinel-2 L2A spectral bands handled by the stacker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    B01,
    B02,
    B03,
    B04,
    B05,
    B06,
    B07,
    B08,
    B8A,
    B09,
    B11,
    B12,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BandParseError(pub String);

impl Display for BandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown band code: {}", self.0)
    }
}

impl std::error::Error for BandParseError {}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::R10m, Tier::R20m, Tier::R60m];

    /// Band codes in the order a stack of this tier is written.
    pub fn canonical_order(&self) -> &'static [Band] {
        match self {
            Tier::R10m => &[Band::B02, Band::B03, Band::B04, Band::B08],
            // Lexical order of the codes, which puts 8A last
            Tier::R20m => &[
                Band::B05,
                Band::B06,
                Band::B07,
                Band::B11,
                Band::B12,
                Band::B8A,
            ],
            Tier::R60m => &[Band::B01, Band::B09],
        }
    }

    pub fn band_count(&self) -> usize {
        self.canonical_order().len()
    }

    /// Factor applied to rows and columns to bring this tier to 10m.
    pub fn upsample_factor(&self) -> usize {
        match self {
            Tier::R10m => 1,
            Tier::R20m => 2,
            Tier::R60m => 6,
        }
    }

    /// Name of the `IMG_DATA` sub-directory holding this tier.
    pub fn directory(&self) -> &'static str {
        match self {
            Tier::R10m => "R10m",
            Tier::R20m => "R20m",
            Tier::R60m => "R60m",
        }
    }

    /// Suffix used in band file names, e.g. `B02_10m`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Tier::R10m => "10m",
            Tier::R20m => "20m",
            Tier::R60m => "60m",
        }
    }
}

impl Band {
    pub fn code(&self) -> &'static str {
        match self {
            Band::B01 => "01",
            Band::B02 => "02",
            Band::B03 => "03",
            Band::B04 => "04",
            Band::B05 => "05",
            Band::B06 => "06",
            Band::B07 => "07",
            Band::B08 => "08",
            Band::B8A => "8A",
            Band::B09 => "09",
            Band::B11 => "11",
            Band::B12 => "12",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Band::B02 | Band::B03 | Band::B04 | Band::B08 => Tier::R10m,
            Band::B05 | Band::B06 | Band::B07 | Band::B8A | Band::B11 | Band::B12 => Tier::R20m,
            Band::B01 | Band::B09 => Tier::R60m,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Band::B01 => "Coastal aerosol",
            Band::B02 => "Blue",
            Band::B03 => "Green",
            Band::B04 => "Red",
            Band::B05 => "Vegetation red edge 1",
            Band::B06 => "Vegetation red edge 2",
            Band::B07 => "Vegetation red edge 3",
            Band::B08 => "NIR",
            Band::B8A => "Narrow NIR",
            Band::B09 => "Water vapour",
            Band::B11 => "SWIR 1",
            Band::B12 => "SWIR 2",
        }
    }

    /// File-name token identifying this band at its native tier, e.g. `B8A_20m`.
    pub fn file_token(&self) -> String {
        format!("B{}_{}", self.code(), self.tier().suffix())
    }
}

impl FromStr for Band {
    type Err = BandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.strip_prefix('B').unwrap_or(s);
        match code.to_ascii_uppercase().as_str() {
            "01" => Ok(Band::B01),
            "02" => Ok(Band::B02),
            "03" => Ok(Band::B03),
            "04" => Ok(Band::B04),
            "05" => Ok(Band::B05),
            "06" => Ok(Band::B06),
            "07" => Ok(Band::B07),
            "08" => Ok(Band::B08),
            "8A" => Ok(Band::B8A),
            "09" => Ok(Band::B09),
            "11" => Ok(Band::B11),
            "12" => Ok(Band::B12),
            _ => Err(BandParseError(s.to_string())),
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "B{}", self.code())
    }
}
