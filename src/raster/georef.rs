use gdal::Dataset;
use gdal::errors::GdalError;

/// Geotransform and projection WKT of a raster.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoReference {
    pub geo_transform: [f64; 6],
    pub projection: String,
}

impl GeoReference {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, GdalError> {
        Ok(Self {
            geo_transform: dataset.geo_transform()?,
            projection: dataset.projection(),
        })
    }

    /// Geotransform of the same extent sampled on a `to` grid instead of a
    /// `from` grid, both given as `(cols, rows)`.
    pub fn resized(&self, from: (usize, usize), to: (usize, usize)) -> Self {
        let [x0, a, b, y0, d, e] = self.geo_transform;
        let sx = |v: f64| v * from.0 as f64 / to.0 as f64;
        let sy = |v: f64| v * from.1 as f64 / to.1 as f64;
        Self {
            geo_transform: [x0, sx(a), sy(b), y0, sx(d), sy(e)],
            projection: self.projection.clone(),
        }
    }

    pub fn pixel_size(&self) -> (f64, f64) {
        (self.geo_transform[1], self.geo_transform[5])
    }

    pub fn approx_eq(&self, other: &GeoReference, tolerance: f64) -> bool {
        self.geo_transform
            .iter()
            .zip(other.geo_transform.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
