//! Merge, split-partition, and redemption previews.
//!
//! Each function here previews an on-chain operation without touching the
//! chain: what position a merge produces, whether a split partition is valid,
//! and how much collateral a resolved condition pays out. Redemption math
//! follows the contract exactly, floor division included, so the previewed
//! amount is the amount the contract will transfer.

use alloy::primitives::U256;

use crate::Result;
use crate::collection::CollectionPair;
use crate::error::{ConditionNotResolved, EmptySequence, Error};
use crate::index_set::{full_index_set, outcome_indices};
use crate::position::{Condition, Position, Token, is_condition_full_index_set, position_string};

/// Previews the position produced by merging `positions` on `condition`.
///
/// The merged position keeps every (condition, index set) pair the inputs
/// share and drops the merged-away condition; `amount` is the collateral
/// amount being merged. Rendered via [`position_string`].
///
/// # Errors
///
/// Returns [`EmptySequence`] when `positions` is empty, and a validation
/// error when the positions do not disjointly cover the condition's full
/// index set. No sentinel "no preview" value is returned; callers decide how
/// to render the failure.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(positions, token), fields(
        condition_id = %condition.id,
        positions_len = positions.len(),
        amount = %amount
    ))
)]
pub fn merge_preview(
    positions: &[Position],
    condition: &Condition,
    amount: U256,
    token: &Token,
) -> Result<String> {
    let first = positions.first().ok_or(EmptySequence)?;

    if !is_condition_full_index_set(positions, condition) {
        return Err(Error::validation(
            "positions do not disjointly cover the condition's full index set",
        ));
    }

    // Only pairs held identically by every input survive the merge.
    let remaining: Vec<CollectionPair> = first
        .collection
        .iter()
        .copied()
        .filter(|pair| {
            pair.condition_id != condition.id
                && positions.iter().all(|position| {
                    position.index_set_for(pair.condition_id) == Some(pair.index_set)
                })
        })
        .collect();

    Ok(position_string(&remaining, amount, token))
}

/// Returns true iff `index_sets` is a valid partition of the condition's
/// outcome space: pairwise disjoint, all non-zero, and OR-ing to the full
/// index set. This is the predicate for "split into exactly these outcome
/// groups with no gap and no double-count".
#[must_use]
pub fn is_partition_full_index_set(index_sets: &[U256], outcome_slot_count: u32) -> bool {
    let mut covered = U256::ZERO;

    for &index_set in index_sets {
        if index_set.is_zero() || !(covered & index_set).is_zero() {
            return false;
        }
        covered |= index_set;
    }

    covered == full_index_set(outcome_slot_count)
}

/// Computes the collateral a holder can redeem from `position` once
/// `condition` has resolved.
///
/// `sum(payout numerators at the position's set bits) * raw_balance /
/// payout_denominator`, floor division, matching the contract's integer
/// arithmetic. A position that does not reference the condition redeems
/// zero.
///
/// # Errors
///
/// - [`ConditionNotResolved`] when the condition has no reported payout.
/// - [`crate::error::InvalidIndexSet`] when the position's index set has
///   bits outside the condition's outcome slots.
/// - A validation error when the resolved condition's payout vector is
///   shorter than its outcome-slot count, or when the scaled product does
///   not fit in a `uint256` (the contract would revert on the same input).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip(position), fields(
        condition_id = %condition.id,
        raw_balance = %raw_balance
    ))
)]
pub fn redeemed_balance(
    position: &Position,
    condition: &Condition,
    raw_balance: U256,
) -> Result<U256> {
    if !condition.resolved || condition.payout_denominator.is_zero() {
        return Err(ConditionNotResolved {
            condition_id: condition.id,
        }
        .into());
    }

    let Some(index_set) = position.index_set_for(condition.id) else {
        return Ok(U256::ZERO);
    };

    crate::index_set::validate_index_set(index_set, condition.outcome_slot_count)?;

    let mut payout = U256::ZERO;
    for outcome in outcome_indices(index_set) {
        let numerator = condition
            .payout_numerators
            .get(outcome)
            .copied()
            .ok_or_else(|| {
                Error::validation(format!(
                    "payout vector has {} entries for {} outcome slots",
                    condition.payout_numerators.len(),
                    condition.outcome_slot_count
                ))
            })?;
        payout = payout
            .checked_add(numerator)
            .ok_or_else(|| Error::validation("payout numerator sum overflows uint256"))?;
    }

    let scaled = payout
        .checked_mul(raw_balance)
        .ok_or_else(|| Error::validation("redeemed payout overflows uint256"))?;

    Ok(scaled / condition.payout_denominator)
}

/// Renders the position left behind after redeeming `condition`, carrying
/// `redeemed_balance` collateral.
///
/// Returns `None` when there is nothing to preview: the redeemed balance is
/// zero or the position does not reference the condition. When no conditions
/// remain the bare collateral form is rendered.
#[must_use]
pub fn redeemed_preview(
    position: &Position,
    condition: &Condition,
    redeemed_balance: U256,
    token: &Token,
) -> Option<String> {
    if redeemed_balance.is_zero() {
        return None;
    }
    position.index_set_for(condition.id)?;

    let remaining: Vec<CollectionPair> = position
        .collection
        .iter()
        .copied()
        .filter(|pair| pair.condition_id != condition.id)
        .collect();

    Some(position_string(&remaining, redeemed_balance, token))
}

/// Minimum of a non-empty sequence of amounts.
///
/// Caps a "use max balance" action to the smallest balance among the
/// positions being merged.
///
/// # Errors
///
/// Returns [`EmptySequence`] on empty input.
pub fn min_amount(values: &[U256]) -> Result<U256> {
    values.iter().min().copied().ok_or_else(|| EmptySequence.into())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{B256, address, b256};

    use super::*;
    use crate::index_set::trivial_partition;

    const CONDITION_A: B256 =
        b256!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

    fn dai() -> Token {
        Token::builder()
            .address(address!("0x6B175474E89094C44Da98b954EedeAC495271d0F"))
            .symbol("DAI")
            .decimals(18)
            .build()
    }

    fn resolved_condition(payout_numerators: &[u64], payout_denominator: u64) -> Condition {
        Condition::builder()
            .id(CONDITION_A)
            .outcome_slot_count(u32::try_from(payout_numerators.len()).expect("small slice"))
            .resolved(true)
            .payout_numerators(payout_numerators.iter().map(|&n| U256::from(n)).collect())
            .payout_denominator(U256::from(payout_denominator))
            .build()
    }

    fn single_condition_position(index_set: u64) -> Position {
        Position::builder()
            .collateral_token(address!("0x6B175474E89094C44Da98b954EedeAC495271d0F"))
            .collection(vec![CollectionPair::new(CONDITION_A, U256::from(index_set))])
            .build()
    }

    #[test]
    fn trivial_partition_is_a_valid_partition() {
        for outcome_slot_count in [1_u32, 2, 7, 64, 256] {
            let partition: Vec<U256> = trivial_partition(outcome_slot_count).collect();
            assert!(
                is_partition_full_index_set(&partition, outcome_slot_count),
                "trivial partition must validate for n={outcome_slot_count}"
            );
        }
    }

    #[test]
    fn partition_with_a_gap_is_invalid() {
        let mut partition: Vec<U256> = trivial_partition(4).collect();
        partition.pop();

        assert!(!is_partition_full_index_set(&partition, 4));
    }

    #[test]
    fn partition_with_overlap_is_invalid() {
        let partition = [U256::from(3), U256::from(2)];

        assert!(!is_partition_full_index_set(&partition, 2));
    }

    #[test]
    fn winning_outcome_redeems_full_balance() {
        let condition = resolved_condition(&[0, 1], 1);
        let position = single_condition_position(2);

        let redeemed = redeemed_balance(&position, &condition, U256::from(100))
            .expect("resolved redemption");
        assert_eq!(redeemed, U256::from(100));
    }

    #[test]
    fn losing_outcome_redeems_nothing() {
        let condition = resolved_condition(&[0, 1], 1);
        let position = single_condition_position(1);

        let redeemed = redeemed_balance(&position, &condition, U256::from(100))
            .expect("resolved redemption");
        assert_eq!(redeemed, U256::ZERO);
    }

    #[test]
    fn partial_payout_floors() {
        // Outcome 0 takes half the payout; 1 * 101 / 2 floors to 50.
        let condition = resolved_condition(&[1, 1], 2);
        let position = single_condition_position(1);

        let redeemed = redeemed_balance(&position, &condition, U256::from(101))
            .expect("resolved redemption");
        assert_eq!(redeemed, U256::from(50));
    }

    #[test]
    fn unresolved_condition_is_an_error() {
        let condition = Condition::builder()
            .id(CONDITION_A)
            .outcome_slot_count(2)
            .build();
        let position = single_condition_position(1);

        let err = redeemed_balance(&position, &condition, U256::from(100))
            .expect_err("unresolved must fail");
        assert!(err.downcast_ref::<ConditionNotResolved>().is_some());
    }

    #[test]
    fn position_without_condition_redeems_zero() {
        let condition = resolved_condition(&[0, 1], 1);
        let position = Position::builder()
            .collateral_token(address!("0x6B175474E89094C44Da98b954EedeAC495271d0F"))
            .collection(vec![])
            .build();

        let redeemed = redeemed_balance(&position, &condition, U256::from(100))
            .expect("vacuous redemption");
        assert_eq!(redeemed, U256::ZERO);
    }

    #[test]
    fn redeemed_preview_skips_zero_balances() {
        let condition = resolved_condition(&[0, 1], 1);
        let position = single_condition_position(1);

        assert_eq!(
            redeemed_preview(&position, &condition, U256::ZERO, &dai()),
            None
        );
    }

    #[test]
    fn redeemed_preview_renders_bare_collateral() {
        let condition = resolved_condition(&[0, 1], 1);
        let position = single_condition_position(2);

        let preview = redeemed_preview(
            &position,
            &condition,
            U256::from(100_000_000_000_000_000_000_u128),
            &dai(),
        );
        assert_eq!(preview.as_deref(), Some("[DAI] x100"));
    }

    #[test]
    fn min_amount_picks_smallest() {
        let values = [U256::from(5), U256::from(2), U256::from(9)];
        assert_eq!(min_amount(&values).expect("non-empty"), U256::from(2));
    }

    #[test]
    fn min_amount_rejects_empty_input() {
        let err = min_amount(&[]).expect_err("empty must fail");
        assert!(err.downcast_ref::<EmptySequence>().is_some());
    }
}
