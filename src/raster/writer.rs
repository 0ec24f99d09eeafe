use gdal::cpl::CslStringList;
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager, Metadata};
use log::debug;
use ndarray::{Array3, Axis};
use std::path::Path;

use super::{GdalEnv, GeoReference};
use crate::config::{Config, ConfigError};
use crate::error::Result;
use crate::sat_bands::Band;

/// Writes `u16` stacks as band-interleaved, tiled, DEFLATE-compressed
/// GeoTIFFs.
#[derive(Debug, Clone)]
pub struct GeoTiffWriter {
    block_size: usize,
    num_threads: String,
}

impl GeoTiffWriter {
    pub fn new(block_size: usize, num_threads: impl Into<String>) -> Self {
        Self {
            block_size,
            num_threads: num_threads.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.block_size(), config.gdal_num_threads())
    }

    pub fn creation_options(&self) -> Result<CslStringList> {
        let block = self.block_size.to_string();
        let mut options = CslStringList::new();
        options.set_name_value("COMPRESS", "DEFLATE")?;
        options.set_name_value("INTERLEAVE", "BAND")?;
        options.set_name_value("TILED", "YES")?;
        options.set_name_value("BLOCKXSIZE", &block)?;
        options.set_name_value("BLOCKYSIZE", &block)?;
        options.set_name_value("NUM_THREADS", &self.num_threads)?;
        Ok(options)
    }

    /// Overview tiles must be a power of two between 64 and 4096; anything
    /// else falls back to GDAL's default.
    fn overview_block_size(&self) -> usize {
        if self.block_size.is_power_of_two() && (64..=4096).contains(&self.block_size) {
            self.block_size
        } else {
            128
        }
    }

    /// Writes `data` (`band, row, col`) to `path`. Band descriptions are the
    /// band names; `metadata` lands in the default dataset domain.
    pub fn write<P: AsRef<Path>>(
        &self,
        path: P,
        data: &Array3<u16>,
        georef: &GeoReference,
        bands: &[Band],
        metadata: &[(&str, String)],
    ) -> Result<Dataset> {
        let (count, rows, cols) = data.dim();
        let _env = GdalEnv::set(&[("NUM_THREADS", self.num_threads.as_str())])?;

        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let options = self.creation_options()?;
        let mut dataset = driver.create_with_band_type_with_options::<u16, _>(
            path.as_ref(),
            cols,
            rows,
            count,
            &options,
        )?;

        dataset.set_geo_transform(&georef.geo_transform)?;
        if !georef.projection.is_empty() {
            dataset.set_projection(&georef.projection)?;
        }
        for (key, value) in metadata {
            dataset.set_metadata_item(key, value, "")?;
        }

        for (index, band_data) in data.axis_iter(Axis(0)).enumerate() {
            let mut raster = dataset.rasterband(index + 1)?;
            let values: Vec<u16> = band_data.iter().copied().collect();
            let mut buffer = Buffer::new((cols, rows), values);
            raster.write((0, 0), (cols, rows), &mut buffer)?;
            if let Some(band) = bands.get(index) {
                raster.set_description(&band.to_string())?;
            }
        }

        debug!("Wrote {} bands ({}x{}) to {}", count, cols, rows, path.as_ref().display());

        Ok(dataset)
    }

    /// Builds external, DEFLATE-compressed `.ovr` pyramids with nearest
    /// neighbour sampling.
    pub fn build_overviews(&self, dataset: &mut Dataset, factors: &[u32]) -> Result<()> {
        let ovr_block = self.overview_block_size().to_string();
        let _env = GdalEnv::set(&[
            ("TIFF_USE_OVR", "TRUE"),
            ("GDAL_TIFF_OVR_BLOCKSIZE", ovr_block.as_str()),
            ("COMPRESS_OVERVIEW", "DEFLATE"),
            ("NUM_THREADS", self.num_threads.as_str()),
        ])?;

        let levels = factors
            .iter()
            .map(|&f| i32::try_from(f))
            .collect::<std::result::Result<Vec<i32>, _>>()
            .map_err(|_| ConfigError::OverviewFactors(factors.to_vec()))?;
        dataset.build_overviews("NEAREST", &levels, &[])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::read_band;
    use tempfile::tempdir;

    fn georef() -> GeoReference {
        GeoReference {
            geo_transform: [300000.0, 10.0, 0.0, 5000040.0, 0.0, -10.0],
            projection: String::new(),
        }
    }

    #[test]
    fn test_overview_block_size_fallback() {
        assert_eq!(GeoTiffWriter::new(1024, "1").overview_block_size(), 1024);
        assert_eq!(GeoTiffWriter::new(48, "1").overview_block_size(), 128);
    }

    #[test]
    fn test_overview_factor_beyond_i32_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stack.tif");
        let data = Array3::<u16>::zeros((1, 4, 4));

        let writer = GeoTiffWriter::new(256, "1");
        let mut dataset = writer
            .write(&path, &data, &georef(), &[Band::B02], &[])
            .unwrap();

        let err = writer
            .build_overviews(&mut dataset, &[2, u32::MAX])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::OverviewFactors(_))
        ));
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stack.tif");

        let mut data = Array3::<u16>::zeros((2, 3, 4));
        data.index_axis_mut(Axis(0), 0).fill(11);
        data.index_axis_mut(Axis(0), 1).fill(22);
        data[[1, 2, 3]] = 9000;

        let writer = GeoTiffWriter::new(256, "1");
        let mut dataset = writer
            .write(&path, &data, &georef(), &[Band::B01, Band::B09], &[])
            .unwrap();
        assert_eq!(dataset.raster_count(), 2);
        assert_eq!(
            dataset.rasterband(2).unwrap().description().unwrap(),
            "B09"
        );
        writer.build_overviews(&mut dataset, &[2]).unwrap();
        drop(dataset);

        let (sample, read_georef) = read_band(&path, Band::B01).unwrap();
        assert_eq!(sample.shape(), (3, 4));
        assert!(sample.data.iter().all(|&v| v == 11));
        assert_eq!(read_georef.geo_transform, georef().geo_transform);
        assert!(dir.path().join("stack.tif.ovr").exists());
    }
}
