//! Re-exported types from external crates for convenience.
//!
//! These types are commonly used in this crate's API and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Ethereum address and 32-byte hash types, the unsigned 256-bit integer used
/// for index sets and balances, and the compile-time literal macros for them.
pub use alloy::primitives::{Address, B256, U256, address, b256};
