use gdal::Dataset;
use gdal::raster::ResampleAlg;
use log::debug;
use ndarray::{Array2, Array3, ArrayView2};
use std::path::Path;

use super::GeoReference;
use crate::error::Result;
use crate::sat_bands::Band;
use crate::stack::BandSample;

/// Reads the first raster band of `path` as a `u16` sample tagged `band`.
pub fn read_band<P: AsRef<Path>>(path: P, band: Band) -> Result<(BandSample, GeoReference)> {
    let dataset = Dataset::open(path.as_ref())?;
    let georef = GeoReference::from_dataset(&dataset)?;
    let (cols, rows) = dataset.raster_size();

    let raster = dataset.rasterband(1)?;
    let buffer = raster.read_as::<u16>((0, 0), (cols, rows), (cols, rows), None)?;
    let ((cols, rows), values) = buffer.into_shape_and_vec();
    let data = Array2::from_shape_vec((rows, cols), values)?;

    debug!("Read {} ({}x{}) from {}", band, cols, rows, path.as_ref().display());

    Ok((BandSample::new(band, data), georef))
}

/// Reads every band of `path` resampled by `factor` along both axes. The
/// returned georeference describes the resampled grid.
pub fn read_stack_resampled<P: AsRef<Path>>(
    path: P,
    factor: usize,
    alg: ResampleAlg,
) -> Result<(Array3<u16>, GeoReference)> {
    let dataset = Dataset::open(path.as_ref())?;
    let (cols, rows) = dataset.raster_size();
    let (out_cols, out_rows) = (cols * factor, rows * factor);
    let count = dataset.raster_count();

    let mut data = Array3::<u16>::zeros((count, out_rows, out_cols));
    for (index, mut slot) in data.outer_iter_mut().enumerate() {
        let raster = dataset.rasterband(index + 1)?;
        let buffer =
            raster.read_as::<u16>((0, 0), (cols, rows), (out_cols, out_rows), Some(alg))?;
        let (_, values) = buffer.into_shape_and_vec();
        slot.assign(&ArrayView2::from_shape((out_rows, out_cols), &values)?);
    }

    let georef =
        GeoReference::from_dataset(&dataset)?.resized((cols, rows), (out_cols, out_rows));

    Ok((data, georef))
}
