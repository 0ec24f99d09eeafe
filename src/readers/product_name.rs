use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

const TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Fields encoded in a Sentinel-2 product name such as
/// `S2A_MSIL2A_20230101T103421_N0509_R108_T32TQM_20230101T140000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName {
    pub mission: String,
    pub level: String,
    pub sensing_time: NaiveDateTime,
    pub baseline: String,
    pub relative_orbit: u16,
    pub tile: String,
    pub generation_time: NaiveDateTime,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProductNameError(pub String);

impl fmt::Display for ProductNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not a Sentinel-2 product name: {}", self.0)
    }
}

impl std::error::Error for ProductNameError {}

impl ProductName {
    pub fn is_l2a(&self) -> bool {
        self.level == "L2A"
    }

    /// Key/value pairs stored as dataset metadata on written stacks.
    pub fn metadata_items(&self) -> Vec<(&'static str, String)> {
        vec![
            ("SPACECRAFT", self.mission.clone()),
            ("PROCESSING_LEVEL", self.level.clone()),
            (
                "SENSING_TIME",
                self.sensing_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ),
            ("PROCESSING_BASELINE", self.baseline.clone()),
            ("RELATIVE_ORBIT", self.relative_orbit.to_string()),
            ("TILE_ID", self.tile.clone()),
            (
                "GENERATION_TIME",
                self.generation_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ),
        ]
    }
}

impl FromStr for ProductName {
    type Err = ProductNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ProductNameError(s.to_string());
        let name = s.strip_suffix(".SAFE").unwrap_or(s);

        let parts: Vec<&str> = name.split('_').collect();
        let [mission, product, sensing, baseline, orbit, tile, generation] = parts[..] else {
            return Err(err());
        };

        if !mission.starts_with("S2") {
            return Err(err());
        }
        let level = product.strip_prefix("MSI").ok_or_else(err)?;
        let sensing_time = NaiveDateTime::parse_from_str(sensing, TIME_FORMAT).map_err(|_| err())?;
        if !baseline.starts_with('N') {
            return Err(err());
        }
        let relative_orbit = orbit
            .strip_prefix('R')
            .and_then(|o| o.parse::<u16>().ok())
            .ok_or_else(err)?;
        let tile = tile.strip_prefix('T').ok_or_else(err)?;
        let generation_time =
            NaiveDateTime::parse_from_str(generation, TIME_FORMAT).map_err(|_| err())?;

        Ok(ProductName {
            mission: mission.to_string(),
            level: level.to_string(),
            sensing_time,
            baseline: baseline.to_string(),
            relative_orbit,
            tile: tile.to_string(),
            generation_time,
        })
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} tile {} sensed {}",
            self.mission, self.level, self.tile, self.sensing_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_product_name() {
        let name: ProductName = "S2A_MSIL2A_20230101T103421_N0509_R108_T32TQM_20230101T140000.SAFE"
            .parse()
            .unwrap();

        assert_eq!(name.mission, "S2A");
        assert_eq!(name.level, "L2A");
        assert!(name.is_l2a());
        assert_eq!(
            name.sensing_time,
            NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 34, 21)
                .unwrap()
        );
        assert_eq!(name.baseline, "N0509");
        assert_eq!(name.relative_orbit, 108);
        assert_eq!(name.tile, "32TQM");
    }

    #[test]
    fn test_l1c_is_parsed_but_not_l2a() {
        let name: ProductName = "S2B_MSIL1C_20220615T100559_N0400_R022_T33UUP_20220615T121014"
            .parse()
            .unwrap();
        assert!(!name.is_l2a());
    }

    #[test]
    fn test_malformed_names_are_rejected() {
        assert!("S2A_MSIL2A_2023".parse::<ProductName>().is_err());
        assert!(
            "S2A_MSIL2A_20231301T103421_N0509_R108_T32TQM_20230101T140000"
                .parse::<ProductName>()
                .is_err()
        );
        assert!(
            "LC08_MSIL2A_20230101T103421_N0509_R108_T32TQM_20230101T140000"
                .parse::<ProductName>()
                .is_err()
        );
    }

    #[test]
    fn test_metadata_items() {
        let name: ProductName = "S2A_MSIL2A_20230101T103421_N0509_R108_T32TQM_20230101T140000"
            .parse()
            .unwrap();
        let items = name.metadata_items();
        assert!(items.contains(&("SENSING_TIME", "2023-01-01T10:34:21".to_string())));
        assert!(items.contains(&("TILE_ID", "32TQM".to_string())));
    }
}
