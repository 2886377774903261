//! Index-set bitmask encoding for condition outcome slots.
//!
//! An index set is a non-zero [`U256`] whose set bits name the outcome slots
//! of a condition that are grouped together in one position. A condition with
//! `n` outcome slots admits index sets in `1..=2^n - 1`; the value `2^n - 1`
//! (every slot set) is the *full index set* and is the yardstick for deciding
//! whether a partition or a set of positions covers a condition completely.

use alloy::primitives::U256;

use crate::Result;
use crate::error::{InvalidIndexSet, OverlappingIndexSets};

/// Maximum number of outcome slots a condition may have.
///
/// Matches the CTF contract bound: index sets are `uint256` bitmasks, so a
/// condition can distinguish at most 256 outcomes.
pub const MAX_OUTCOME_SLOTS: u32 = 256;

/// Returns the full index set for a condition with `outcome_slot_count`
/// outcome slots, i.e. `2^n - 1` with every slot bit set.
#[must_use]
pub fn full_index_set(outcome_slot_count: u32) -> U256 {
    if outcome_slot_count >= MAX_OUTCOME_SLOTS {
        U256::MAX
    } else {
        (U256::ONE << outcome_slot_count as usize) - U256::ONE
    }
}

/// Returns true iff `index_set` is a legal outcome grouping for a condition
/// with `outcome_slot_count` slots: non-zero and no bits beyond the last slot.
#[must_use]
pub fn is_valid_index_set(index_set: U256, outcome_slot_count: u32) -> bool {
    !index_set.is_zero() && index_set <= full_index_set(outcome_slot_count)
}

/// Error-returning form of [`is_valid_index_set`].
pub fn validate_index_set(index_set: U256, outcome_slot_count: u32) -> Result<()> {
    if is_valid_index_set(index_set, outcome_slot_count) {
        Ok(())
    } else {
        Err(InvalidIndexSet {
            index_set,
            outcome_slot_count,
        }
        .into())
    }
}

/// Returns the complement of `index_set` within the condition's outcome
/// space: `full_index_set(n) XOR index_set`.
#[must_use]
pub fn complement(index_set: U256, outcome_slot_count: u32) -> U256 {
    full_index_set(outcome_slot_count) ^ index_set
}

/// Returns the outcome slots not yet claimed by `index_set`.
///
/// Same computation as [`complement`]; named for its use when working out
/// what remains available to split off or merge back.
#[must_use]
pub fn free_index_set(index_set: U256, outcome_slot_count: u32) -> U256 {
    complement(index_set, outcome_slot_count)
}

/// Bitwise XOR of two index sets.
///
/// Total over all inputs. XOR only behaves as a union when the operands are
/// disjoint; call sites relying on that must check overlap first (or use
/// [`disjoint_union`], which checks for them).
#[must_use]
pub fn xor_index_sets(a: U256, b: U256) -> U256 {
    a ^ b
}

/// Unions two index sets known to be disjoint.
///
/// # Errors
///
/// Returns [`OverlappingIndexSets`] when the operands share a set bit.
pub fn disjoint_union(a: U256, b: U256) -> Result<U256> {
    if (a & b).is_zero() {
        Ok(a | b)
    } else {
        Err(OverlappingIndexSets { a, b }.into())
    }
}

/// Iterates the set-bit positions of `index_set`, ascending.
pub fn outcome_indices(index_set: U256) -> impl Iterator<Item = usize> {
    (0..MAX_OUTCOME_SLOTS as usize).filter(move |i| index_set.bit(*i))
}

/// Returns the trivial partition of a condition into singleton outcomes:
/// `outcome_slot_count` index sets of one bit each, `1 << i` for ascending
/// `i`. This is the partition that previews an elementary split.
#[must_use]
pub fn trivial_partition(outcome_slot_count: u32) -> TrivialPartition {
    TrivialPartition {
        slot: 0,
        count: outcome_slot_count,
    }
}

/// Lazy iterator over the singleton index sets of a condition.
///
/// Restartable via [`Clone`]; see [`trivial_partition`].
#[derive(Debug, Clone)]
pub struct TrivialPartition {
    slot: u32,
    count: u32,
}

impl Iterator for TrivialPartition {
    type Item = U256;

    fn next(&mut self) -> Option<U256> {
        if self.slot >= self.count {
            return None;
        }
        let index_set = U256::ONE << self.slot as usize;
        self.slot += 1;
        Some(index_set)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.slot) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrivialPartition {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_index_set_small_counts() {
        assert_eq!(full_index_set(1), U256::from(1));
        assert_eq!(full_index_set(2), U256::from(3));
        assert_eq!(full_index_set(8), U256::from(255));
    }

    #[test]
    fn full_index_set_saturates_at_max_slots() {
        assert_eq!(full_index_set(256), U256::MAX);
        assert_eq!(full_index_set(255), U256::MAX >> 1_usize);
    }

    #[test]
    fn valid_index_set_bounds() {
        assert!(is_valid_index_set(U256::from(1), 2));
        assert!(is_valid_index_set(U256::from(3), 2));
        assert!(!is_valid_index_set(U256::ZERO, 2));
        assert!(!is_valid_index_set(U256::from(4), 2));
    }

    #[test]
    fn validate_index_set_reports_range() {
        let err = validate_index_set(U256::from(4), 2).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::Validation);
    }

    #[test]
    fn complement_is_an_involution() {
        for outcome_slot_count in [1_u32, 2, 3, 7, 64, 255, 256] {
            let index_set = U256::from(1) | (full_index_set(outcome_slot_count) >> 1_usize);
            let twice = complement(complement(index_set, outcome_slot_count), outcome_slot_count);
            assert_eq!(twice, index_set, "complement twice for n={outcome_slot_count}");
        }
    }

    #[test]
    fn free_index_set_matches_complement() {
        assert_eq!(free_index_set(U256::from(1), 2), U256::from(2));
        assert_eq!(free_index_set(U256::from(5), 3), U256::from(2));
    }

    #[test]
    fn disjoint_union_rejects_overlap() {
        assert_eq!(
            disjoint_union(U256::from(1), U256::from(2)).expect("disjoint inputs"),
            U256::from(3)
        );
        assert!(disjoint_union(U256::from(3), U256::from(2)).is_err());
    }

    #[test]
    fn xor_matches_union_when_disjoint() {
        assert_eq!(xor_index_sets(U256::from(5), U256::from(2)), U256::from(7));
        // Overlap cancels rather than unioning; callers check first.
        assert_eq!(xor_index_sets(U256::from(3), U256::from(1)), U256::from(2));
    }

    #[test]
    fn outcome_indices_ascending() {
        let indices: Vec<usize> = outcome_indices(U256::from(0b1011)).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn trivial_partition_shape() {
        let partition: Vec<U256> = trivial_partition(3).collect();
        assert_eq!(
            partition,
            vec![U256::from(1), U256::from(2), U256::from(4)]
        );
    }

    #[test]
    fn trivial_partition_is_restartable() {
        let partition = trivial_partition(4);
        let first: Vec<U256> = partition.clone().collect();
        let second: Vec<U256> = partition.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn trivial_partition_covers_exactly_once() {
        for outcome_slot_count in [1_u32, 2, 7, 64, 255, 256] {
            let partition = trivial_partition(outcome_slot_count);
            assert_eq!(partition.len(), outcome_slot_count as usize);

            let mut seen = U256::ZERO;
            for index_set in partition {
                assert!((seen & index_set).is_zero(), "partition elements overlap");
                seen |= index_set;
            }
            assert_eq!(seen, full_index_set(outcome_slot_count));
        }
    }
}
