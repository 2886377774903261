//! Previews a merge of two complementary positions back into their parent.
//!
//! Run with: `cargo run --example merge_preview`

use alloy::primitives::{B256, U256};
use conditional_tokens_algebra::collection::CollectionPair;
use conditional_tokens_algebra::planner::{merge_preview, min_amount};
use conditional_tokens_algebra::position::{Condition, Position, Token, are_position_mergeables};
use conditional_tokens_algebra::types::address;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let usdc = Token::builder()
        .address(address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"))
        .symbol("USDC")
        .decimals(6)
        .build();

    let election = B256::repeat_byte(0x11);
    let recount = B256::repeat_byte(0x22);

    let conditions = [
        Condition::builder().id(election).outcome_slot_count(2).build(),
        Condition::builder().id(recount).outcome_slot_count(2).build(),
    ];

    // Two positions inside the same election slice whose recount index sets
    // are complementary: 0b01 and 0b10.
    let positions = [
        Position::builder()
            .collateral_token(usdc.address)
            .collection(vec![
                CollectionPair::new(election, U256::from(1)),
                CollectionPair::new(recount, U256::from(1)),
            ])
            .build(),
        Position::builder()
            .collateral_token(usdc.address)
            .collection(vec![
                CollectionPair::new(election, U256::from(1)),
                CollectionPair::new(recount, U256::from(2)),
            ])
            .build(),
    ];

    println!(
        "mergeable: {}",
        are_position_mergeables(&positions, &conditions)
    );

    let balances = [U256::from(7_500_000), U256::from(5_000_000)];
    let amount = min_amount(&balances)?;

    let preview = merge_preview(&positions, &conditions[1], amount, &usdc)?;
    println!("merging {amount} raw units on the recount condition yields:");
    println!("  {preview}");

    Ok(())
}
