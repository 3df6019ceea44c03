//! Juris Types - Canonical domain types for the judge agent
//!
//! This crate contains the foundational types shared by every other juris
//! crate, with zero dependencies on the rest of the workspace:
//!
//! - Identity types (`Address`)
//! - Fixed-width byte values (`B256`, `Salt`)
//! - Market types sourced from the settlement contract (`Market`,
//!   `MarketStatus`, `VoteRecord`)
//! - Judge types (`JudgeProfile`, `JudgeStatus`)
//! - The `Outcome` enum and its wire codes
//!
//! # Ownership
//!
//! Everything decoded from the ledger (`Market`, `VoteRecord`,
//! `JudgeProfile`) is externally owned: the agent re-reads it on every scan
//! and never treats a cached copy as ground truth. The only locally owned
//! state in the system is the commitment record held by the secret store.

pub mod bytes;
pub mod error;
pub mod identity;
pub mod judge;
pub mod market;
pub mod outcome;

pub use bytes::{Salt, B256};
pub use error::TypeError;
pub use identity::Address;
pub use judge::{JudgeProfile, JudgeStatus};
pub use market::{Market, MarketStatus, VoteRecord};
pub use outcome::Outcome;
