use thiserror::Error;

use crate::config::ConfigError;
use crate::readers::ProductError;
use crate::stack::StackError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Resampled grids do not line up: {0}")]
    GeometryMismatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
