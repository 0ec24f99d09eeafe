use log::info;
use ndarray::{Array3, Axis};

use super::StackError;
use crate::sat_bands::Band;

/// Finds, for each canonical band, the position of its first occurrence in
/// `codes`.
pub fn sort_positions(codes: &[Band], canonical: &[Band]) -> Result<Vec<usize>, StackError> {
    let mut positions = Vec::with_capacity(canonical.len());

    for target in canonical {
        let mut position = 0;
        while position < codes.len() && codes[position] != *target {
            position += 1;
        }
        if position == codes.len() {
            return Err(StackError::MissingBand(*target));
        }
        positions.push(position);
    }

    Ok(positions)
}

/// Reorders a `(band, row, col)` stack whose bands are tagged by `codes` so
/// that its bands follow `canonical`.
pub fn stack_sort(
    stack: &Array3<u16>,
    codes: &[Band],
    canonical: &[Band],
) -> Result<Array3<u16>, StackError> {
    let (bands, rows, cols) = stack.dim();
    if bands != codes.len() {
        return Err(StackError::CodeCountMismatch {
            bands,
            codes: codes.len(),
        });
    }

    let positions = sort_positions(codes, canonical)?;

    let mut sorted = Array3::<u16>::zeros((canonical.len(), rows, cols));
    for (mut slot, &position) in sorted.outer_iter_mut().zip(&positions) {
        slot.assign(&stack.index_axis(Axis(0), position));
    }

    info!(
        "Sorted input list: {:?}",
        canonical.iter().map(|b| b.code()).collect::<Vec<_>>()
    );

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat_bands::Tier;

    /// Builds a stack where every pixel of a band holds the band's position
    /// in the canonical list, so the sorted result must read 0, 1, 2, ...
    fn tagged_stack(codes: &[Band], canonical: &[Band]) -> Array3<u16> {
        let mut stack = Array3::<u16>::zeros((codes.len(), 2, 3));
        for (mut band, code) in stack.outer_iter_mut().zip(codes) {
            let rank = canonical.iter().position(|c| c == code).unwrap();
            band.fill(rank as u16);
        }
        stack
    }

    fn permutations(items: &[Band]) -> Vec<Vec<Band>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head);
                out.push(tail);
            }
        }
        out
    }

    fn assert_canonical(sorted: &Array3<u16>) {
        for (rank, band) in sorted.outer_iter().enumerate() {
            assert!(band.iter().all(|&v| v == rank as u16), "band {rank} out of order");
        }
    }

    #[test]
    fn test_every_permutation_sorts_to_canonical_order() {
        for tier in Tier::ALL {
            let canonical = tier.canonical_order();
            for codes in permutations(canonical) {
                let stack = tagged_stack(&codes, canonical);
                let sorted = stack_sort(&stack, &codes, canonical).unwrap();
                assert_eq!(sorted.dim(), (canonical.len(), 2, 3));
                assert_canonical(&sorted);
            }
        }
    }

    #[test]
    fn test_sorting_sorted_stack_is_noop() {
        let canonical = Tier::R20m.canonical_order();
        let stack = tagged_stack(canonical, canonical);
        let sorted = stack_sort(&stack, canonical, canonical).unwrap();
        assert_eq!(sorted, stack);
    }

    #[test]
    fn test_sort_positions() {
        let codes = [Band::B09, Band::B01];
        let positions = sort_positions(&codes, Tier::R60m.canonical_order()).unwrap();
        assert_eq!(positions, vec![1, 0]);
    }

    #[test]
    fn test_missing_band_is_reported() {
        let codes = [Band::B02, Band::B03, Band::B04, Band::B04];
        let err = sort_positions(&codes, Tier::R10m.canonical_order()).unwrap_err();
        assert_eq!(err, StackError::MissingBand(Band::B08));
    }

    #[test]
    fn test_duplicate_takes_first_match() {
        let codes = [Band::B09, Band::B01, Band::B01];
        let positions = sort_positions(&codes, Tier::R60m.canonical_order()).unwrap();
        assert_eq!(positions, vec![1, 0]);
    }

    #[test]
    fn test_code_count_must_match_stack() {
        let stack = Array3::<u16>::zeros((2, 1, 1));
        let err = stack_sort(&stack, &[Band::B01], Tier::R60m.canonical_order()).unwrap_err();
        assert_eq!(err, StackError::CodeCountMismatch { bands: 2, codes: 1 });
    }
}
