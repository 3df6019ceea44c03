//! Commitment codec for the commit-reveal protocol
//!
//! The settlement contract verifies a reveal by recomputing
//! `keccak256(byte(outcome_code) ++ salt[32])` over the packed 33-byte
//! concatenation — no length prefixes, no ABI padding, no type tags. This
//! module is the single place in the workspace where that layout is
//! produced, so a mismatch here is the only way to produce an unrevealable
//! commitment.
//!
//! Everything here is pure: identical inputs always yield identical output.

use rand::rngs::OsRng;
use rand::RngCore;
use sha3::{Digest, Keccak256};
use thiserror::Error;

use juris_types::{Outcome, Salt, B256};

/// Errors raised while building commit or reveal payloads
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// `Outcome::None` is valid internally as "undecided" but must never be
    /// encoded into a commit or reveal payload.
    #[error("outcome `none` cannot be committed or revealed")]
    InvalidOutcome,
}

/// Encode an outcome into its single-byte wire code.
///
/// Fails for `Outcome::None`; the contract treats code 0 as "no vote" and
/// would reject it, so it is refused here before any transaction is built.
pub fn encode_outcome(outcome: Outcome) -> Result<u8, CodecError> {
    if !outcome.is_votable() {
        return Err(CodecError::InvalidOutcome);
    }
    Ok(outcome.wire_code())
}

/// Keccak-256 over the packed `outcome_byte ++ salt` concatenation.
///
/// Exactly 33 bytes are hashed. This must match the contract's
/// `keccak256(abi.encodePacked(uint8, bytes32))` bit-for-bit.
pub fn packed_digest(outcome_byte: u8, salt: &Salt) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update([outcome_byte]);
    hasher.update(salt.as_bytes());
    B256::from_bytes(hasher.finalize().into())
}

/// Build the commitment digest for an outcome, rejecting `Outcome::None`.
pub fn commit_digest(outcome: Outcome, salt: &Salt) -> Result<B256, CodecError> {
    Ok(packed_digest(encode_outcome(outcome)?, salt))
}

/// Generate a fresh 32-byte salt from the operating system RNG.
pub fn random_salt() -> Salt {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Salt::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_salt() -> Salt {
        Salt::from_bytes([0u8; 32])
    }

    fn counting_salt() -> Salt {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Salt::from_bytes(bytes)
    }

    #[test]
    fn test_encode_rejects_none() {
        assert_eq!(encode_outcome(Outcome::None), Err(CodecError::InvalidOutcome));
        assert!(commit_digest(Outcome::None, &zero_salt()).is_err());
    }

    #[test]
    fn test_encode_votable_outcomes() {
        assert_eq!(encode_outcome(Outcome::Yes), Ok(1));
        assert_eq!(encode_outcome(Outcome::No), Ok(2));
    }

    #[test]
    fn test_digest_deterministic() {
        let salt = counting_salt();
        let first = commit_digest(Outcome::Yes, &salt).unwrap();
        let second = commit_digest(Outcome::Yes, &salt).unwrap();
        assert_eq!(first, second);
    }

    // Golden values, precomputed with an independent Keccak-256
    // implementation. Any ABI-style padding creeping into the packed
    // layout breaks these.
    #[test]
    fn test_digest_golden_yes_zero_salt() {
        let digest = commit_digest(Outcome::Yes, &zero_salt()).unwrap();
        assert_eq!(
            digest.to_string(),
            "0x0d678e31a4b2825b806fe160675cd01dab159802c7f94397ce45ed91b5f3aac6"
        );
    }

    #[test]
    fn test_digest_golden_no_zero_salt() {
        let digest = commit_digest(Outcome::No, &zero_salt()).unwrap();
        assert_eq!(
            digest.to_string(),
            "0x5da513e113e3f2fd0c7f9fdb338fc156917b82fe159806cc152be5bba89d8e7b"
        );
    }

    #[test]
    fn test_digest_golden_yes_counting_salt() {
        let digest = commit_digest(Outcome::Yes, &counting_salt()).unwrap();
        assert_eq!(
            digest.to_string(),
            "0xe46e20db49e842154b399b4b5f7200464f9370a5bee4d92a971d96b24d802cfc"
        );
    }

    #[test]
    fn test_distinct_salts_distinct_digests() {
        // A representative fixture set: same outcome, varying salts.
        let mut digests = std::collections::HashSet::new();
        for seed in 0u8..32 {
            let salt = Salt::from_bytes([seed; 32]);
            digests.insert(commit_digest(Outcome::Yes, &salt).unwrap());
        }
        assert_eq!(digests.len(), 32);
    }

    #[test]
    fn test_outcome_changes_digest() {
        let salt = counting_salt();
        let yes = commit_digest(Outcome::Yes, &salt).unwrap();
        let no = commit_digest(Outcome::No, &salt).unwrap();
        assert_ne!(yes, no);
    }

    #[test]
    fn test_random_salts_unique() {
        let a = random_salt();
        let b = random_salt();
        assert_ne!(a, b);
    }
}
