use ndarray::{Array3, ArrayView2, Axis};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl BandStatistics {
    /// Population statistics of one band. An empty band yields NaN
    /// everywhere.
    pub fn from_band(band: ArrayView2<u16>) -> Self {
        if band.is_empty() {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                std: f64::NAN,
            };
        }

        let count = band.len() as f64;
        let (min, max, sum) = band.iter().fold(
            (u16::MAX, u16::MIN, 0.0_f64),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v as f64),
        );
        let mean = sum / count;
        let variance = band
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / count;

        Self {
            min: min as f64,
            max: max as f64,
            mean,
            std: variance.sqrt(),
        }
    }

    fn items(&self) -> [(&'static str, f64); 4] {
        [
            ("STATISTICS_MINIMUM", self.min),
            ("STATISTICS_MAXIMUM", self.max),
            ("STATISTICS_MEAN", self.mean),
            ("STATISTICS_STDDEV", self.std),
        ]
    }
}

pub fn calculate_statistics(stack: &Array3<u16>) -> Vec<BandStatistics> {
    stack
        .axis_iter(Axis(0))
        .map(BandStatistics::from_band)
        .collect()
}

/// Serialises per-band statistics as a GDAL `PAMDataset` document.
pub fn pam_xml(statistics: &[BandStatistics]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    writer.write_event(Event::Start(BytesStart::new("PAMDataset")))?;
    for (index, stats) in statistics.iter().enumerate() {
        let band = (index + 1).to_string();
        writer.write_event(Event::Start(
            BytesStart::new("PAMRasterBand").with_attributes([("band", band.as_str())]),
        ))?;
        writer.write_event(Event::Start(BytesStart::new("Metadata")))?;
        for (key, value) in stats.items() {
            writer.write_event(Event::Start(
                BytesStart::new("MDI").with_attributes([("key", key)]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(&value.to_string())))?;
            writer.write_event(Event::End(BytesEnd::new("MDI")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Metadata")))?;
        writer.write_event(Event::End(BytesEnd::new("PAMRasterBand")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("PAMDataset")))?;

    Ok(writer.into_inner())
}

/// Sidecar path GDAL looks up for `raster`, e.g. `stack.tif.aux.xml`.
pub fn sidecar_path(raster: &Path) -> PathBuf {
    let mut name = raster.as_os_str().to_os_string();
    name.push(".aux.xml");
    PathBuf::from(name)
}

/// Computes the statistics of `stack` and writes them next to `raster`.
pub fn create_pam_xml(stack: &Array3<u16>, raster: &Path) -> Result<PathBuf> {
    let xml = pam_xml(&calculate_statistics(stack))?;
    let path = sidecar_path(raster);
    std::fs::write(&path, xml)?;
    Ok(path)
}
