//! Lazy enumeration of block placements.
//!
//! A placement picks `k` open cells (a combination, in lexicographic index
//! order) and assigns the movable-block multiset to them. Arrangements are
//! walked with next-permutation over the sorted multiset, which visits each
//! distinct arrangement exactly once, so boards that differ only by swapping
//! two blocks of the same kind are never produced twice.

use crate::board::{BlockKind, CellCoord, Inventory};

/// A complete assignment of the movable blocks to open cells.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    blocks: Vec<(CellCoord, BlockKind)>,
}

impl Placement {
    pub fn new(blocks: Vec<(CellCoord, BlockKind)>) -> Self {
        Self { blocks }
    }

    /// The placed blocks in cell order.
    pub fn blocks(&self) -> &[(CellCoord, BlockKind)] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Rearranges `items` into the next lexicographically greater permutation.
///
/// Returns `false` (leaving `items` sorted ascending) once the last
/// permutation has been passed. Equal items are never swapped with each other,
/// so repeated elements do not yield duplicate permutations.
fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        items.reverse();
        return false;
    };
    // the suffix after the pivot is non-increasing; find its rightmost element above the pivot
    let Some(successor) = items.iter().rposition(|item| *item > items[pivot]) else {
        return false;
    };
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}

/// Advances a `k`-combination of `0..n` to the next one in lexicographic order.
///
/// Returns `false` when `indices` already holds the last combination.
fn next_combination(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let Some(i) = (0..k).rev().find(|&i| indices[i] < n - k + i) else {
        return false;
    };
    indices[i] += 1;
    for j in i + 1..k {
        indices[j] = indices[j - 1] + 1;
    }
    true
}

/// Iterator over every placement of an inventory onto a set of open cells.
///
/// Deterministic for a given input; clone it (or call [`placements`] again)
/// to restart.
#[derive(Clone, Debug)]
pub struct Placements<'a> {
    open_cells: &'a [CellCoord],
    combination: Vec<usize>,
    arrangement: Vec<BlockKind>,
    exhausted: bool,
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        if self.exhausted {
            return None;
        }

        let placement = Placement::new(
            self.combination
                .iter()
                .zip(&self.arrangement)
                .map(|(&cell_index, &kind)| (self.open_cells[cell_index], kind))
                .collect(),
        );

        // move to the next arrangement; on wrap-around move to the next cell subset
        if !next_permutation(&mut self.arrangement)
            && !next_combination(&mut self.combination, self.open_cells.len())
        {
            self.exhausted = true;
        }

        Some(placement)
    }
}

/// Enumerates placements of `inventory` onto `open_cells`.
///
/// With an empty inventory the single yielded placement is empty (the board
/// as given). If there are more blocks than open cells nothing is yielded.
pub fn placements<'a>(open_cells: &'a [CellCoord], inventory: &Inventory) -> Placements<'a> {
    let arrangement = inventory.kinds();
    let k = arrangement.len();
    Placements {
        open_cells,
        combination: (0..k).collect(),
        arrangement,
        exhausted: k > open_cells.len(),
    }
}

/// Binomial coefficient `C(n, k)`, saturating on overflow.
fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u128, |acc, i| {
        // exact at every step: acc * (n - i) is divisible by (i + 1)
        acc.saturating_mul((n - i) as u128) / (i as u128 + 1)
    })
}

/// Total number of placements [`placements`] yields:
/// `C(open, k) * k! / (a! b! c!)`.
pub fn count(open_cells: usize, inventory: &Inventory) -> u128 {
    let mut remaining = inventory.total();
    let mut arrangements = 1u128;
    for kind in BlockKind::ALL {
        let kind_count = inventory.count(kind);
        arrangements = arrangements.saturating_mul(binomial(remaining, kind_count));
        remaining -= kind_count;
    }
    binomial(open_cells, inventory.total()).saturating_mul(arrangements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn cells(n: usize) -> Vec<CellCoord> {
        (0..n).map(|col| CellCoord::new(0, col)).collect()
    }

    #[test]
    fn test_next_permutation_skips_duplicates() {
        let mut items = vec![1, 1, 2];
        let mut seen = vec![items.clone()];
        while next_permutation(&mut items) {
            seen.push(items.clone());
        }
        assert_eq!(seen, vec![vec![1, 1, 2], vec![1, 2, 1], vec![2, 1, 1]]);
        // wraps back to sorted order
        assert_eq!(items, vec![1, 1, 2]);
    }

    #[test]
    fn test_next_combination_lexicographic() {
        let mut indices = vec![0, 1];
        let mut seen = vec![indices.clone()];
        while next_combination(&mut indices, 4) {
            seen.push(indices.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[rstest]
    #[case(4, Inventory::new(1, 0, 0), 4)]
    #[case(4, Inventory::new(2, 0, 0), 6)]
    #[case(4, Inventory::new(1, 1, 0), 12)]
    #[case(5, Inventory::new(2, 1, 0), 30)]
    #[case(6, Inventory::new(2, 1, 1), 180)]
    #[case(3, Inventory::new(0, 0, 0), 1)]
    #[case(2, Inventory::new(2, 1, 0), 0)]
    fn test_yields_exact_count_without_duplicates(
        #[case] open: usize,
        #[case] inventory: Inventory,
        #[case] expected: u128,
    ) {
        let open_cells = cells(open);
        let all: Vec<Placement> = placements(&open_cells, &inventory).collect();
        assert_eq!(all.len() as u128, expected);
        assert_eq!(count(open, &inventory), expected);

        let unique: HashSet<&Placement> = all.iter().collect();
        assert_eq!(unique.len(), all.len(), "duplicate placement yielded");

        for placement in &all {
            assert_eq!(placement.len(), inventory.total());
            let mut kinds: Vec<BlockKind> =
                placement.blocks().iter().map(|&(_, kind)| kind).collect();
            kinds.sort();
            assert_eq!(kinds, inventory.kinds());
        }
    }

    #[test]
    fn test_empty_inventory_yields_single_empty_placement() {
        let open_cells = cells(3);
        let mut iter = placements(&open_cells, &Inventory::default());
        assert_eq!(iter.next(), Some(Placement::new(vec![])));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_restart_is_deterministic() {
        let open_cells = cells(5);
        let inventory = Inventory::new(1, 1, 1);
        let first: Vec<Placement> = placements(&open_cells, &inventory).collect();
        let second: Vec<Placement> = placements(&open_cells, &inventory).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_first_placements_in_order() {
        let open_cells = cells(3);
        let inventory = Inventory::new(1, 1, 0);
        let first: Vec<Placement> = placements(&open_cells, &inventory).take(3).collect();
        let a = BlockKind::Reflective;
        let b = BlockKind::Opaque;
        assert_eq!(
            first,
            vec![
                Placement::new(vec![(CellCoord::new(0, 0), a), (CellCoord::new(0, 1), b)]),
                Placement::new(vec![(CellCoord::new(0, 0), b), (CellCoord::new(0, 1), a)]),
                Placement::new(vec![(CellCoord::new(0, 0), a), (CellCoord::new(0, 2), b)]),
            ]
        );
    }

    #[test]
    fn test_count_large_board_does_not_overflow() {
        assert_eq!(count(36, &Inventory::new(0, 0, 0)), 1);
        assert_eq!(count(36, &Inventory::new(6, 0, 0)), 1_947_792);
        assert_eq!(count(36, &Inventory::new(3, 2, 1)), 1_947_792 * 60);
    }
}
