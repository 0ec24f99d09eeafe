pub mod merge;
pub mod sort;

use ndarray::{Array2, Array3, Axis};
use thiserror::Error;

use crate::sat_bands::{Band, Tier};

pub use merge::{MERGE_ORDER, merge_all};
pub use sort::{sort_positions, stack_sort};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("band {0} not found in input codes")]
    MissingBand(Band),
    #[error("stack has {bands} bands but {codes} codes were given")]
    CodeCountMismatch { bands: usize, codes: usize },
    #[error("{tier} stack needs {expected} bands, got {found}")]
    BandCount {
        tier: Tier,
        expected: usize,
        found: usize,
    },
    #[error("expected a {expected} stack, got {found}")]
    TierMismatch { expected: Tier, found: Tier },
    #[error("shape mismatch: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// A single decoded band at its native resolution.
#[derive(Debug, Clone)]
pub struct BandSample {
    pub band: Band,
    pub tier: Tier,
    pub data: Array2<u16>,
}

impl BandSample {
    pub fn new(band: Band, data: Array2<u16>) -> Self {
        Self {
            band,
            tier: band.tier(),
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Bands of one tier, stored `(band, row, col)` in canonical order.
#[derive(Debug, Clone)]
pub struct ResolutionStack {
    tier: Tier,
    bands: Vec<Band>,
    data: Array3<u16>,
}

impl ResolutionStack {
    /// Stacks the samples of `tier` in whatever order they arrive and sorts
    /// them into the tier's canonical order.
    pub fn from_samples(tier: Tier, samples: &[BandSample]) -> Result<Self, StackError> {
        let expected = tier.band_count();
        if samples.len() != expected {
            return Err(StackError::BandCount {
                tier,
                expected,
                found: samples.len(),
            });
        }

        let shape = samples[0].shape();
        for sample in samples {
            if sample.tier != tier {
                return Err(StackError::TierMismatch {
                    expected: tier,
                    found: sample.tier,
                });
            }
            if sample.shape() != shape {
                return Err(StackError::ShapeMismatch {
                    expected: shape,
                    found: sample.shape(),
                });
            }
        }

        let mut unsorted = Array3::<u16>::zeros((samples.len(), shape.0, shape.1));
        for (mut slot, sample) in unsorted.outer_iter_mut().zip(samples) {
            slot.assign(&sample.data);
        }
        let codes: Vec<Band> = samples.iter().map(|s| s.band).collect();

        let data = stack_sort(&unsorted, &codes, tier.canonical_order())?;

        Ok(Self {
            tier,
            bands: tier.canonical_order().to_vec(),
            data,
        })
    }

    /// Wraps an array that is already in canonical order, e.g. one read back
    /// after resampling.
    pub fn from_sorted(tier: Tier, data: Array3<u16>) -> Result<Self, StackError> {
        let expected = tier.band_count();
        let found = data.len_of(Axis(0));
        if found != expected {
            return Err(StackError::BandCount {
                tier,
                expected,
                found,
            });
        }

        Ok(Self {
            tier,
            bands: tier.canonical_order().to_vec(),
            data,
        })
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn data(&self) -> &Array3<u16> {
        &self.data
    }

    /// `(rows, cols)` shared by every band.
    pub fn shape(&self) -> (usize, usize) {
        let (_, rows, cols) = self.data.dim();
        (rows, cols)
    }
}
