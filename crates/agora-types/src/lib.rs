//! Agora Types - Core type definitions for the AGORA treasury.
//!
//! This crate provides the fundamental types used throughout AGORA:
//! - Addresses (20-byte, Bech32m encoded)
//! - Amounts (u128 with checked arithmetic)
//! - Block heights for logical time

pub mod address;
pub mod amount;
pub mod error;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;

/// Logical time: a monotonically non-decreasing block height supplied by the
/// execution environment. The core never reads wall-clock time.
pub type BlockHeight = u64;

/// Identifier of a governance proposal.
pub type ProposalId = u64;
