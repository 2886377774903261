//! Position-level algebra over conditions and index sets.
//!
//! A position is a collateral token plus a set of (condition, index set)
//! pairs. The decision procedures here answer the questions the explorer UI
//! keeps asking: do these positions jointly cover a condition so they can be
//! merged back, and what does a position look like as a canonical display
//! string.

mod types;

use alloy::primitives::{B256, U256};
pub use types::{Condition, Position, Token};

use crate::collection::CollectionPair;

/// Returns true iff `positions` jointly and disjointly cover the full index
/// set of `condition`.
///
/// Positions that do not reference the condition are excluded from
/// consideration entirely. Any overlap between two positions' index sets for
/// the condition disqualifies the whole set: coverage must be unambiguous,
/// not merely sufficient.
#[must_use]
pub fn is_condition_full_index_set(positions: &[Position], condition: &Condition) -> bool {
    let mut covered = U256::ZERO;
    let mut relevant = false;

    for position in positions {
        let Some(index_set) = position.index_set_for(condition.id) else {
            continue;
        };
        if !(covered & index_set).is_zero() {
            return false;
        }
        covered |= index_set;
        relevant = true;
    }

    relevant && covered == condition.full_index_set()
}

/// Returns true iff `positions` can be merged into a single parent position.
///
/// Requires all positions to share the same collateral token and the same set
/// of condition ids, with their index sets identical on every condition
/// except exactly one; on that one condition the index sets must disjointly
/// exhaust the full index set. `conditions` supplies the outcome-slot counts;
/// a differing condition with no record present is not mergeable.
///
/// Position sets where more than one condition differs are rejected outright
/// rather than merged on a first-differing tie-break.
#[must_use]
pub fn are_position_mergeables(positions: &[Position], conditions: &[Condition]) -> bool {
    let Some((first, rest)) = positions.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }

    if rest
        .iter()
        .any(|position| position.collateral_token != first.collateral_token)
    {
        return false;
    }

    let mut base_ids: Vec<B256> = first.condition_ids();
    base_ids.sort_unstable();
    for position in rest {
        let mut ids = position.condition_ids();
        ids.sort_unstable();
        if ids != base_ids {
            return false;
        }
    }

    let differing: Vec<B256> = base_ids
        .iter()
        .copied()
        .filter(|&id| {
            let reference = first.index_set_for(id);
            rest.iter().any(|position| position.index_set_for(id) != reference)
        })
        .collect();

    let [target] = differing.as_slice() else {
        return false;
    };

    let Some(condition) = conditions.iter().find(|condition| condition.id == *target) else {
        return false;
    };

    is_condition_full_index_set(positions, condition)
}

/// Canonical display string for a position.
///
/// Renders the collateral symbol, each (condition, index set) pair as a
/// middle-truncated condition id with its outcome indices, and the balance
/// scaled by the token's decimals:
///
/// `[USDC] [0xaaaaaaaa…aaaaaa:0|2] x1.5`
///
/// A position with no conditions renders as bare collateral: `[USDC] x1.5`.
/// Stable and deterministic for identical inputs.
#[must_use]
pub fn position_string(collection: &[CollectionPair], balance: U256, token: &Token) -> String {
    let amount = format_amount(balance, token.decimals);

    if collection.is_empty() {
        return format!("[{}] x{amount}", token.symbol);
    }

    let pairs: Vec<String> = collection
        .iter()
        .map(|pair| {
            let outcomes: Vec<String> = crate::index_set::outcome_indices(pair.index_set)
                .map(|i| i.to_string())
                .collect();
            format!("{}:{}", short_condition_id(pair.condition_id), outcomes.join("|"))
        })
        .collect();

    format!("[{}] [{}] x{amount}", token.symbol, pairs.join(", "))
}

/// Scales a raw balance by `decimals`, trimming trailing zeros.
///
/// Exact string arithmetic; never goes through floating point.
#[must_use]
pub fn format_amount(balance: U256, decimals: u8) -> String {
    let raw = balance.to_string();
    if decimals == 0 {
        return raw;
    }

    let width = decimals as usize + 1;
    let padded = format!("{raw:0>width$}");
    let (whole, frac) = padded.split_at(padded.len() - decimals as usize);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        whole.to_owned()
    } else {
        format!("{whole}.{frac}")
    }
}

/// `0x`-prefixed head and tail of a condition id, elided in the middle.
fn short_condition_id(condition_id: B256) -> String {
    let hex = condition_id.to_string();
    let head: String = hex.chars().take(10).collect();
    let tail: String = hex.chars().skip(hex.chars().count() - 6).collect();
    format!("{head}\u{2026}{tail}")
}
