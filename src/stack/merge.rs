use ndarray::{Array3, Axis};

use super::{ResolutionStack, StackError};
use crate::sat_bands::Tier;

/// Output layout of the 12-band product as `(tier, index in that tier's
/// canonical stack)`. Reads B01 B02 B03 B04 B05 B06 B07 B08 B8A B09 B11 B12.
pub const MERGE_ORDER: [(Tier, usize); 12] = [
    (Tier::R60m, 0),
    (Tier::R10m, 0),
    (Tier::R10m, 1),
    (Tier::R10m, 2),
    (Tier::R20m, 0),
    (Tier::R20m, 1),
    (Tier::R20m, 2),
    (Tier::R10m, 3),
    (Tier::R20m, 5),
    (Tier::R60m, 1),
    (Tier::R20m, 3),
    (Tier::R20m, 4),
];

fn check(stack: &ResolutionStack, tier: Tier, shape: (usize, usize)) -> Result<(), StackError> {
    if stack.tier() != tier {
        return Err(StackError::TierMismatch {
            expected: tier,
            found: stack.tier(),
        });
    }
    let found = stack.data().len_of(Axis(0));
    if found != tier.band_count() {
        return Err(StackError::BandCount {
            tier,
            expected: tier.band_count(),
            found,
        });
    }
    if stack.shape() != shape {
        return Err(StackError::ShapeMismatch {
            expected: shape,
            found: stack.shape(),
        });
    }
    Ok(())
}

/// Interleaves the 10m stack with the upsampled 20m and 60m stacks. All
/// three must already share the 10m pixel grid.
pub fn merge_all(
    stack_10m: &ResolutionStack,
    stack_20m: &ResolutionStack,
    stack_60m: &ResolutionStack,
) -> Result<Array3<u16>, StackError> {
    let shape = stack_10m.shape();
    check(stack_10m, Tier::R10m, shape)?;
    check(stack_20m, Tier::R20m, shape)?;
    check(stack_60m, Tier::R60m, shape)?;

    let mut merged = Array3::<u16>::zeros((MERGE_ORDER.len(), shape.0, shape.1));
    for (mut slot, (tier, index)) in merged.outer_iter_mut().zip(MERGE_ORDER) {
        let source = match tier {
            Tier::R10m => stack_10m,
            Tier::R20m => stack_20m,
            Tier::R60m => stack_60m,
        };
        slot.assign(&source.data().index_axis(Axis(0), index));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat_bands::Band;

    /// Every pixel of a band holds a value derived from the band so the
    /// output order can be read back.
    fn tier_stack(tier: Tier, shape: (usize, usize)) -> ResolutionStack {
        let bands = tier.canonical_order();
        let mut data = Array3::<u16>::zeros((bands.len(), shape.0, shape.1));
        for (mut slot, band) in data.outer_iter_mut().zip(bands) {
            slot.fill(band_value(*band));
        }
        ResolutionStack::from_sorted(tier, data).unwrap()
    }

    fn band_value(band: Band) -> u16 {
        match band {
            Band::B8A => 85,
            other => other.code().parse::<u16>().unwrap() * 10,
        }
    }

    #[test]
    fn test_merge_produces_ascending_band_order() {
        let shape = (4, 5);
        let merged = merge_all(
            &tier_stack(Tier::R10m, shape),
            &tier_stack(Tier::R20m, shape),
            &tier_stack(Tier::R60m, shape),
        )
        .unwrap();

        let expected: Vec<u16> = [
            Band::B01,
            Band::B02,
            Band::B03,
            Band::B04,
            Band::B05,
            Band::B06,
            Band::B07,
            Band::B08,
            Band::B8A,
            Band::B09,
            Band::B11,
            Band::B12,
        ]
        .into_iter()
        .map(band_value)
        .collect();

        assert_eq!(merged.dim(), (12, 4, 5));
        let got: Vec<u16> = merged.outer_iter().map(|b| b[[3, 4]]).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_first_band_always_comes_from_60m_index_zero() {
        let shape = (2, 2);
        let stack_10m = ResolutionStack::from_sorted(Tier::R10m, Array3::from_elem((4, 2, 2), 7))
            .unwrap();
        let stack_20m = ResolutionStack::from_sorted(Tier::R20m, Array3::from_elem((6, 2, 2), 7))
            .unwrap();
        let mut data_60m = Array3::<u16>::from_elem((2, 2, 2), 7);
        data_60m[[0, 1, 0]] = 999;
        let stack_60m = ResolutionStack::from_sorted(Tier::R60m, data_60m).unwrap();

        let merged = merge_all(&stack_10m, &stack_20m, &stack_60m).unwrap();

        assert_eq!(merged.dim(), (12, shape.0, shape.1));
        assert_eq!(merged[[0, 1, 0]], 999);
        assert_eq!(merged.iter().filter(|&&v| v == 999).count(), 1);
    }

    #[test]
    fn test_merge_rejects_unaligned_stacks() {
        let err = merge_all(
            &tier_stack(Tier::R10m, (4, 4)),
            &tier_stack(Tier::R20m, (2, 2)),
            &tier_stack(Tier::R60m, (4, 4)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StackError::ShapeMismatch {
                expected: (4, 4),
                found: (2, 2)
            }
        );
    }

    #[test]
    fn test_merge_rejects_swapped_tiers() {
        let shape = (2, 2);
        let err = merge_all(
            &tier_stack(Tier::R10m, shape),
            &tier_stack(Tier::R60m, shape),
            &tier_stack(Tier::R20m, shape),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StackError::TierMismatch {
                expected: Tier::R20m,
                found: Tier::R60m
            }
        );
    }
}
