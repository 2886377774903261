//! Collection-ID derivation for (condition, index set) combinations.
//!
//! A collection ID names "all of these conditions resolved into these outcome
//! subsets". The derivation below reproduces the CTF contract's
//! `getCollectionId` formula locally (`keccak256` over the ABI encoding of
//! `(parentCollectionId, conditionId, indexSet)`), so the IDs this module
//! computes are byte-for-byte the ones the deployed contract recognizes when
//! looking up existing positions.

use alloy::primitives::{B256, U256, keccak256};
use alloy::sol_types::SolValue as _;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::Result;
use crate::error::{DuplicateCondition, MalformedConditionId};

/// The canonical empty collection: no conditions combined yet.
pub const ROOT_COLLECTION: B256 = B256::ZERO;

/// One (condition, index set) member of a position's collection.
///
/// The subgraph serves these as index-aligned parallel arrays; inside this
/// crate they always travel as a single pair so the two halves cannot drift
/// apart. Subgraph `BigInt` values arrive as decimal strings.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CollectionPair {
    /// The condition being combined.
    pub condition_id: B256,
    /// Outcome subset of that condition, as a bitmask.
    #[serde_as(as = "DisplayFromStr")]
    pub index_set: U256,
}

impl CollectionPair {
    #[must_use]
    pub const fn new(condition_id: B256, index_set: U256) -> Self {
        Self {
            condition_id,
            index_set,
        }
    }
}

/// Parses a condition identifier from its canonical hex-string form.
///
/// # Errors
///
/// Returns [`MalformedConditionId`] unless the input is a 32-byte hex string
/// (`0x` prefix optional).
pub fn parse_condition_id(input: &str) -> Result<B256> {
    input.parse::<B256>().map_err(|_| {
        MalformedConditionId {
            input: input.to_owned(),
        }
        .into()
    })
}

/// Combines one (condition, index set) pair into a parent collection.
///
/// `keccak256(abi.encode(parent, conditionId, indexSet))`, matching the
/// on-chain `getCollectionId`. Pass [`ROOT_COLLECTION`] as the parent to
/// derive a top-level collection.
#[must_use]
pub fn combine_collection(parent: B256, condition_id: B256, index_set: U256) -> B256 {
    keccak256((parent, condition_id, index_set).abi_encode())
}

/// Combines a set of (condition, index set) pairs into one collection ID.
///
/// Pairs are sorted by condition id before folding [`combine_collection`]
/// over a zero-seeded accumulator, so any permutation of the same pairs
/// yields the same ID. An empty slice yields [`ROOT_COLLECTION`].
///
/// # Errors
///
/// Returns [`DuplicateCondition`] when a condition id appears more than once;
/// a position may reference each condition at most once.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", fields(pairs_len = pairs.len()))
)]
pub fn combine_collections(pairs: &[CollectionPair]) -> Result<B256> {
    let mut sorted = pairs.to_vec();
    sorted.sort_by_key(|pair| pair.condition_id);

    for window in sorted.windows(2) {
        if window[0].condition_id == window[1].condition_id {
            return Err(DuplicateCondition {
                condition_id: window[0].condition_id,
            }
            .into());
        }
    }

    Ok(sorted.iter().fold(ROOT_COLLECTION, |parent, pair| {
        combine_collection(parent, pair.condition_id, pair.index_set)
    }))
}
