pub mod config;
pub mod error;
pub mod pam;
pub mod processor;
pub mod raster;
pub mod readers;
pub mod sat_bands;
pub mod stack;

pub use error::{Error, Result};
