use gdal::raster::ResampleAlg;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Algorithm used to bring the 20m and 60m stacks up to 10m.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    #[default]
    Nearest,
    Bilinear,
    Cubic,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResamplingParseError(pub String);

impl fmt::Display for ResamplingParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} not a valid option", self.0)
    }
}

impl std::error::Error for ResamplingParseError {}

impl Resampling {
    pub fn gdal_alg(&self) -> ResampleAlg {
        match self {
            Resampling::Nearest => ResampleAlg::NearestNeighbour,
            Resampling::Bilinear => ResampleAlg::Bilinear,
            Resampling::Cubic => ResampleAlg::Cubic,
        }
    }

    /// Tag used in output file names, e.g. `NEAREST`.
    pub fn tag(&self) -> &'static str {
        match self {
            Resampling::Nearest => "NEAREST",
            Resampling::Bilinear => "BILINEAR",
            Resampling::Cubic => "CUBIC",
        }
    }
}

impl FromStr for Resampling {
    type Err = ResamplingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Resampling::Nearest),
            "bilinear" => Ok(Resampling::Bilinear),
            "cubic" => Ok(Resampling::Cubic),
            _ => Err(ResamplingParseError(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Resampling {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Resampling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Bilinear".parse(), Ok(Resampling::Bilinear));
        assert_eq!("CUBIC".parse(), Ok(Resampling::Cubic));
        assert_eq!("nearest".parse(), Ok(Resampling::Nearest));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let err = "lanczos".parse::<Resampling>().unwrap_err();
        assert_eq!(err.to_string(), "lanczos not a valid option");
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Resampling = serde_json::from_str("\"cubic\"").unwrap();
        assert_eq!(value, Resampling::Cubic);
        assert!(serde_json::from_str::<Resampling>("\"average\"").is_err());
    }
}
