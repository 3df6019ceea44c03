//! Error types for decoding ledger-sourced values
//!
//! Remote state arrives as raw integers and hex strings. Every decode into a
//! typed value goes through these errors instead of a silent cast.

use thiserror::Error;

/// Errors raised while decoding ledger-sourced values into typed form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Outcome code outside {0, 1, 2}
    #[error("invalid outcome code: {code}")]
    InvalidOutcomeCode { code: u8 },

    /// Outcome label other than "yes"/"no"/"none"
    #[error("invalid outcome label: {label:?}")]
    InvalidOutcomeLabel { label: String },

    /// Market status code outside the known range
    #[error("invalid market status code: {code}")]
    InvalidMarketStatus { code: u8 },

    /// Judge status code outside the known range
    #[error("invalid judge status code: {code}")]
    InvalidJudgeStatus { code: u8 },

    /// Malformed address string
    #[error("invalid address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    /// Malformed fixed-width hex value
    #[error("invalid 32-byte hex value {value:?}: {reason}")]
    InvalidHex { value: String, reason: String },
}
