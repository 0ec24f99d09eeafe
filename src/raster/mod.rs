pub mod env;
pub mod georef;
pub mod reader;
pub mod writer;

pub use env::GdalEnv;
pub use georef::GeoReference;
pub use reader::{read_band, read_stack_resampled};
pub use writer::GeoTiffWriter;
