use log::{debug, info};
use ndarray::Array3;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::prepare_output_folder;
use crate::config::{Config, ProductKind};
use crate::error::{Error, Result};
use crate::pam;
use crate::raster::{self, GeoReference, GeoTiffWriter};
use crate::readers::{self, SafeProduct};
use crate::sat_bands::{Band, Tier};
use crate::stack::{BandSample, ResolutionStack, StackError, merge_all};

/// Tolerance when comparing the resampled 20m and 60m geotransforms.
const GEOTRANSFORM_TOLERANCE: f64 = 1e-9;

/// Turns one Sentinel-2 L2A product into a single GeoTIFF stack.
#[derive(Debug)]
pub struct StackProcessor<'a> {
    config: &'a Config,
    writer: GeoTiffWriter,
}

impl<'a> StackProcessor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            writer: GeoTiffWriter::from_config(config),
        }
    }

    /// Opens the product at `path` (`.SAFE` or `.zip`) and writes the
    /// configured stack. Returns the path of the written GeoTIFF.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let started = Instant::now();

        let product = readers::open_product(path)?;
        if let Some(name) = product.name() {
            info!("Product: {}", name);
        }
        let output_folder = prepare_output_folder(&product, self.config.output_directory())?;

        let output = match self.config.product() {
            ProductKind::All => self.process_all(&product, &output_folder)?,
            ProductKind::Rgbn => self.process_rgbn(&product, &output_folder)?,
        };

        info!("Completed in {:.2?}", started.elapsed());
        Ok(output)
    }

    /// All twelve bands, 20m and 60m resampled to 10m.
    pub fn process_all(&self, product: &SafeProduct, output_folder: &Path) -> Result<PathBuf> {
        let (stack_10m, georef_10m) = self.read_tier(product, Tier::R10m)?;
        let (stack_20m, georef_20m) = self.read_tier(product, Tier::R20m)?;
        let (stack_60m, georef_60m) = self.read_tier(product, Tier::R60m)?;

        let temp = tempfile::Builder::new()
            .prefix("TEMP")
            .tempdir_in(product.path())?;
        info!("Created temporary folder: {}", temp.path().display());

        info!("Saving the 20m and 60m stacks in Temp folder");
        let temp_20m = temp.path().join("Temp_20m.tif");
        self.writer
            .write(&temp_20m, stack_20m.data(), &georef_20m, stack_20m.bands(), &[])?;
        let temp_60m = temp.path().join("Temp_60m.tif");
        self.writer
            .write(&temp_60m, stack_60m.data(), &georef_60m, stack_60m.bands(), &[])?;
        drop((stack_20m, stack_60m));

        info!("Resampling the 20m and 60m arrays");
        let alg = self.config.resampling().gdal_alg();
        let (data_20m, resampled_20m) =
            raster::read_stack_resampled(&temp_20m, Tier::R20m.upsample_factor(), alg)?;
        let (data_60m, resampled_60m) =
            raster::read_stack_resampled(&temp_60m, Tier::R60m.upsample_factor(), alg)?;

        if !resampled_20m.approx_eq(&resampled_60m, GEOTRANSFORM_TOLERANCE) {
            return Err(Error::GeometryMismatch(format!(
                "20m {:?} vs 60m {:?}",
                resampled_20m.geo_transform, resampled_60m.geo_transform
            )));
        }
        debug!("Resampled pixel size: {:?}", resampled_20m.pixel_size());

        let shape_10m = stack_10m.shape();
        for (tier, data) in [(Tier::R20m, &data_20m), (Tier::R60m, &data_60m)] {
            let (_, rows, cols) = data.dim();
            if (rows, cols) != shape_10m {
                return Err(Error::GeometryMismatch(format!(
                    "{} stack resampled to {}x{}, 10m grid is {}x{}",
                    tier, rows, cols, shape_10m.0, shape_10m.1
                )));
            }
        }

        info!("Stacking bands into a single array");
        let upsampled_20m = ResolutionStack::from_sorted(Tier::R20m, data_20m)?;
        let upsampled_60m = ResolutionStack::from_sorted(Tier::R60m, data_60m)?;
        let merged = merge_all(&stack_10m, &upsampled_20m, &upsampled_60m)?;
        drop((stack_10m, upsampled_20m, upsampled_60m));
        temp.close()?;

        let name = format!(
            "{}_{}_STACK_ALL.tif",
            product.stem(),
            self.config.resampling().tag()
        );
        let output = output_folder.join(name);
        self.export(
            product,
            &merged,
            &georef_10m,
            ProductKind::All.output_bands(),
            &output,
        )?;

        Ok(output)
    }

    /// Blue, green, red and NIR at native 10m.
    pub fn process_rgbn(&self, product: &SafeProduct, output_folder: &Path) -> Result<PathBuf> {
        let (stack_10m, georef_10m) = self.read_tier(product, Tier::R10m)?;

        let output = output_folder.join(format!("{}_STACK_RGBN.tif", product.stem()));
        self.export(
            product,
            stack_10m.data(),
            &georef_10m,
            ProductKind::Rgbn.output_bands(),
            &output,
        )?;

        Ok(output)
    }

    /// Reads the band files of `tier` and sorts them into canonical order.
    /// The georeference is taken from the first band read.
    fn read_tier(
        &self,
        product: &SafeProduct,
        tier: Tier,
    ) -> Result<(ResolutionStack, GeoReference)> {
        let mut samples: Vec<BandSample> = Vec::with_capacity(tier.band_count());
        let mut georef = None;

        for (band, path) in product.band_files(tier)? {
            info!("Processing: {} ({})", file_name(&path), band.description());
            let (sample, band_georef) = raster::read_band(&path, band)?;
            georef.get_or_insert(band_georef);
            samples.push(sample);
        }

        info!("Sorting {} stack", tier);
        let stack = ResolutionStack::from_samples(tier, &samples)?;
        let georef = georef.ok_or(StackError::BandCount {
            tier,
            expected: tier.band_count(),
            found: 0,
        })?;

        Ok((stack, georef))
    }

    fn export(
        &self,
        product: &SafeProduct,
        data: &Array3<u16>,
        georef: &GeoReference,
        bands: &[Band],
        output: &Path,
    ) -> Result<()> {
        info!("Exporting: {}", output.display());

        let metadata = product
            .name()
            .map(|name| name.metadata_items())
            .unwrap_or_default();
        let mut dataset = self.writer.write(output, data, georef, bands, &metadata)?;

        if self.config.pyramids() {
            info!("Building and compressing pyramids");
            self.writer
                .build_overviews(&mut dataset, self.config.overview_factors())?;
        }
        drop(dataset);

        // Written once the dataset is closed so GDAL cannot replace it.
        if self.config.xml() {
            let sidecar = pam::create_pam_xml(data, output)?;
            info!("Statistics written to {}", sidecar.display());
        }

        Ok(())
    }
}

fn file_name(path: &Path) -> impl Display + '_ {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}
