use log::info;
use std::path::PathBuf;

use super::StackProcessor;
use crate::config::Config;
use crate::error::Result;

/// Runs every configured product through a [`StackProcessor`], one after the
/// other. The first failure aborts the batch.
#[derive(Debug)]
pub struct BatchProcessor {
    config: Config,
}

impl BatchProcessor {
    pub fn new(config: Config) -> Self {
        BatchProcessor { config }
    }

    pub fn process(&self) -> Result<Vec<PathBuf>> {
        self.config.validate()?;

        let processor = StackProcessor::new(&self.config);
        let total = self.config.products().len();
        let mut outputs = Vec::with_capacity(total);

        for (index, product) in self.config.products().iter().enumerate() {
            info!(
                "[{}/{}] Stacking {} ({} product)",
                index + 1,
                total,
                product.display(),
                self.config.product()
            );
            outputs.push(processor.process(product)?);
        }

        Ok(outputs)
    }
}
