//! Plain data records for conditions, positions, and display tokens.
//!
//! These mirror what the surrounding application already decodes from the
//! conditional-tokens subgraph and its token-metadata source. Subgraph
//! `BigInt` fields arrive as decimal strings and payout fields are null until
//! the oracle reports, hence the `serde_with` annotations.

use alloy::primitives::{Address, B256, U256};
use bon::Builder;
use serde::Deserialize;
use serde_with::{DefaultOnNull, DisplayFromStr, serde_as};

use crate::collection::CollectionPair;
use crate::error::Error;
use crate::index_set::full_index_set;

/// ERC-20 collateral metadata used purely for display formatting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Token {
    /// The token contract address.
    pub address: Address,
    /// Ticker symbol, e.g. "USDC".
    #[builder(into)]
    pub symbol: String,
    /// Number of decimals the raw balance is scaled by.
    pub decimals: u8,
}

/// A question posed to an oracle, with a fixed number of outcome slots.
///
/// `payout_numerators` and `payout_denominator` stay empty/zero until the
/// oracle reports and `resolved` flips to true.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Condition {
    /// Hash of (oracle, question id, outcome slot count).
    pub id: B256,
    /// How many outcomes the oracle distinguishes.
    pub outcome_slot_count: u32,
    /// Whether the oracle has reported.
    #[serde(default)]
    #[builder(default)]
    pub resolved: bool,
    /// Reported payout per outcome slot; empty until resolution.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull<Vec<DisplayFromStr>>")]
    #[builder(default)]
    pub payout_numerators: Vec<U256>,
    /// Denominator the numerators are scaled by; zero until resolution.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull<DisplayFromStr>")]
    #[builder(default)]
    pub payout_denominator: U256,
}

impl Condition {
    /// The index set with every outcome slot of this condition set.
    #[must_use]
    pub fn full_index_set(&self) -> U256 {
        full_index_set(self.outcome_slot_count)
    }
}

/// Wire shape of a position as the subgraph serves it: the collateral token
/// plus index-aligned parallel `conditionIds`/`indexSets` arrays.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRecord {
    collateral_token: Address,
    condition_ids: Vec<B256>,
    #[serde_as(as = "Vec<DisplayFromStr>")]
    index_sets: Vec<U256>,
}

/// A holding in the conditional-token contract: a collateral token plus the
/// (condition, index set) pairs whose combination identifies its collection.
///
/// Internally the pairs are a single ordered sequence; the legacy
/// parallel-array shape only exists at the deserialization boundary and via
/// [`Position::condition_ids`] / [`Position::index_sets`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Builder)]
#[serde(try_from = "PositionRecord")]
#[non_exhaustive]
pub struct Position {
    /// The collateral backing this position.
    pub collateral_token: Address,
    /// The (condition, index set) pairs, in subgraph order.
    pub collection: Vec<CollectionPair>,
}

impl Position {
    /// Builds a position from the legacy paired-array shape.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the arrays differ in length.
    pub fn from_parallel_arrays(
        collateral_token: Address,
        condition_ids: &[B256],
        index_sets: &[U256],
    ) -> crate::Result<Self> {
        if condition_ids.len() != index_sets.len() {
            return Err(Error::validation(format!(
                "conditionIds and indexSets differ in length: {} vs {}",
                condition_ids.len(),
                index_sets.len()
            )));
        }

        Ok(Self {
            collateral_token,
            collection: condition_ids
                .iter()
                .zip(index_sets)
                .map(|(&condition_id, &index_set)| CollectionPair::new(condition_id, index_set))
                .collect(),
        })
    }

    /// The index set this position holds for `condition_id`, if the position
    /// references that condition at all.
    #[must_use]
    pub fn index_set_for(&self, condition_id: B256) -> Option<U256> {
        self.collection
            .iter()
            .find(|pair| pair.condition_id == condition_id)
            .map(|pair| pair.index_set)
    }

    /// Legacy accessor: the condition ids in pair order.
    #[must_use]
    pub fn condition_ids(&self) -> Vec<B256> {
        self.collection.iter().map(|pair| pair.condition_id).collect()
    }

    /// Legacy accessor: the index sets in pair order.
    #[must_use]
    pub fn index_sets(&self) -> Vec<U256> {
        self.collection.iter().map(|pair| pair.index_set).collect()
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = Error;

    fn try_from(record: PositionRecord) -> crate::Result<Self> {
        Self::from_parallel_arrays(
            record.collateral_token,
            &record.condition_ids,
            &record.index_sets,
        )
    }
}
