//! Commit-reveal engine
//!
//! Phase inference and action dispatch for one market at a time. The phase
//! is derived freshly on every call from remote state and the local secret
//! store; nothing is carried over between scans except the secrets
//! themselves.

use std::sync::Arc;

use chrono::Utc;

use juris_codec::{commit_digest, encode_outcome, random_salt};
use juris_ledger::LedgerClient;
use juris_oracle::JudgmentOracle;
use juris_store::{CommitmentRecord, SecretStore};
use juris_types::{Address, Market, MarketStatus, Outcome, VoteRecord, B256};

use crate::error::AgentError;

/// Protocol phase of one (market, judge) pair, inferred per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePhase {
    /// Market status is terminal; never act again.
    Resolved,
    /// No commitment observed on-chain for this identity.
    NeedsCommit,
    /// Commitment observed, not revealed, and the local salt is available.
    NeedsReveal,
    /// Commitment observed, not revealed, local salt missing. Cannot
    /// self-heal.
    Unrecoverable,
    /// Vote already revealed.
    Done,
}

impl VotePhase {
    /// Infer the phase from a market's status, the remote vote record for
    /// this identity, and whether the secret store holds a record.
    pub fn infer(status: MarketStatus, vote: &VoteRecord, secret_present: bool) -> VotePhase {
        if status.is_terminal() {
            return VotePhase::Resolved;
        }
        if vote.revealed {
            return VotePhase::Done;
        }
        if !vote.has_commitment() {
            return VotePhase::NeedsCommit;
        }
        if secret_present {
            VotePhase::NeedsReveal
        } else {
            VotePhase::Unrecoverable
        }
    }
}

impl std::fmt::Display for VotePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotePhase::Resolved => write!(f, "resolved"),
            VotePhase::NeedsCommit => write!(f, "needs-commit"),
            VotePhase::NeedsReveal => write!(f, "needs-reveal"),
            VotePhase::Unrecoverable => write!(f, "unrecoverable"),
            VotePhase::Done => write!(f, "done"),
        }
    }
}

/// What the engine did for a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Nothing to do in this phase.
    Idle { phase: VotePhase },
    /// A commit transaction was confirmed and the salt persisted.
    Committed {
        outcome: Outcome,
        confidence: u8,
        tx_hash: String,
    },
    /// A reveal transaction was confirmed and the salt deleted.
    Revealed { outcome: Outcome, tx_hash: String },
}

impl EngineAction {
    /// Whether a ledger write happened.
    pub fn is_write(&self) -> bool {
        !matches!(self, EngineAction::Idle { .. })
    }
}

/// The phase-detection and action-dispatch core.
///
/// Holds shared handles to the ledger, the secret store, and (optionally)
/// the judgment oracle. Manual commit/reveal paths work without an oracle;
/// automatic processing requires one.
pub struct Engine {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn SecretStore>,
    oracle: Option<Arc<dyn JudgmentOracle>>,
    identity: Address,
}

impl Engine {
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        store: Arc<dyn SecretStore>,
        identity: Address,
    ) -> Self {
        Engine {
            ledger,
            store,
            oracle: None,
            identity,
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn JudgmentOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Decide and execute the action for one market, given the remote vote
    /// record already read this scan. At most one ledger write happens.
    ///
    /// Re-entrancy: a market in `NeedsReveal` or `Done` is never
    /// re-committed, and a market in `Done` is never re-revealed, so
    /// re-running a scan mid-way is safe.
    pub async fn process(
        &self,
        market: &Market,
        vote: &VoteRecord,
    ) -> Result<EngineAction, AgentError> {
        let secret = self.store.get(market.id)?;

        match VotePhase::infer(market.status, vote, secret.is_some()) {
            phase @ (VotePhase::Resolved | VotePhase::Done) => {
                Ok(EngineAction::Idle { phase })
            }
            VotePhase::NeedsCommit => self.commit(market).await,
            VotePhase::NeedsReveal => {
                let record = secret.ok_or(AgentError::UnrecoverableVote {
                    market_id: market.id,
                })?;
                self.reveal(record).await
            }
            VotePhase::Unrecoverable => {
                tracing::error!(
                    market_id = market.id,
                    identity = %self.identity,
                    "commitment exists on-chain but local salt is missing; stake at risk"
                );
                Err(AgentError::UnrecoverableVote {
                    market_id: market.id,
                })
            }
        }
    }

    /// Ask the oracle for a judgment, then commit it.
    async fn commit(&self, market: &Market) -> Result<EngineAction, AgentError> {
        let oracle = self.oracle.as_ref().ok_or(AgentError::OracleUnavailable)?;

        tracing::info!(market_id = market.id, question = %market.question, "evaluating market");
        let judgment = oracle.evaluate(&market.question).await?;
        tracing::info!(
            market_id = market.id,
            outcome = %judgment.outcome,
            confidence = judgment.confidence,
            rationale = %judgment.rationale,
            "oracle judgment received"
        );

        let action = self
            .commit_with_outcome(market.id, judgment.outcome)
            .await?;
        match action {
            EngineAction::Committed { outcome, tx_hash, .. } => Ok(EngineAction::Committed {
                outcome,
                confidence: judgment.confidence,
                tx_hash,
            }),
            other => Ok(other),
        }
    }

    /// Commit a known outcome: fresh salt, packed digest, confirmed
    /// submission, then persist the secret.
    ///
    /// The salt is persisted only after the ledger confirms the commit — a
    /// failed submission must leave no local record behind.
    pub async fn commit_with_outcome(
        &self,
        market_id: u64,
        outcome: Outcome,
    ) -> Result<EngineAction, AgentError> {
        let salt = random_salt();
        let digest = commit_digest(outcome, &salt)?;

        let receipt = self.ledger.commit_vote(market_id, digest).await?;

        self.store.put(&CommitmentRecord {
            market_id,
            outcome,
            salt,
            digest,
            committed_at: Utc::now(),
        })?;

        tracing::info!(
            market_id,
            outcome = %outcome,
            tx_hash = %receipt.tx_hash,
            "vote committed"
        );

        Ok(EngineAction::Committed {
            outcome,
            confidence: 0,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Reveal a market's vote from the stored secret. Fails with
    /// [`AgentError::UnrecoverableVote`] if no secret is held.
    pub async fn reveal_market(&self, market_id: u64) -> Result<EngineAction, AgentError> {
        let record = self
            .store
            .get(market_id)?
            .ok_or(AgentError::UnrecoverableVote { market_id })?;
        self.reveal(record).await
    }

    /// Submit the reveal for a stored commitment and delete the secret once
    /// the ledger confirms.
    async fn reveal(&self, record: CommitmentRecord) -> Result<EngineAction, AgentError> {
        let outcome_code = encode_outcome(record.outcome)?;

        let receipt = self
            .ledger
            .reveal_vote(
                record.market_id,
                outcome_code,
                record.salt,
                B256::ZERO,
                B256::ZERO,
            )
            .await?;

        // Consumed only after the reveal is confirmed.
        self.store.delete(record.market_id)?;

        tracing::info!(
            market_id = record.market_id,
            outcome = %record.outcome,
            tx_hash = %receipt.tx_hash,
            "vote revealed"
        );

        Ok(EngineAction::Revealed {
            outcome: record.outcome,
            tx_hash: receipt.tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed_vote(judge: Address) -> VoteRecord {
        VoteRecord {
            judge,
            ..VoteRecord::absent()
        }
    }

    fn revealed_vote(judge: Address) -> VoteRecord {
        VoteRecord {
            judge,
            revealed: true,
            outcome: Outcome::Yes,
            ..VoteRecord::absent()
        }
    }

    fn me() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    #[test]
    fn test_infer_needs_commit_on_zero_judge() {
        let phase = VotePhase::infer(MarketStatus::Open, &VoteRecord::absent(), false);
        assert_eq!(phase, VotePhase::NeedsCommit);
    }

    #[test]
    fn test_infer_needs_reveal_with_secret() {
        let phase = VotePhase::infer(MarketStatus::Resolving, &committed_vote(me()), true);
        assert_eq!(phase, VotePhase::NeedsReveal);
    }

    #[test]
    fn test_infer_unrecoverable_without_secret() {
        let phase = VotePhase::infer(MarketStatus::Resolving, &committed_vote(me()), false);
        assert_eq!(phase, VotePhase::Unrecoverable);
    }

    #[test]
    fn test_infer_done_when_revealed() {
        let phase = VotePhase::infer(MarketStatus::Resolving, &revealed_vote(me()), false);
        assert_eq!(phase, VotePhase::Done);
    }

    #[test]
    fn test_infer_resolved_is_terminal() {
        // Terminal status wins regardless of the vote record.
        let phase = VotePhase::infer(MarketStatus::Resolved, &VoteRecord::absent(), true);
        assert_eq!(phase, VotePhase::Resolved);
        let phase = VotePhase::infer(MarketStatus::Resolved, &revealed_vote(me()), false);
        assert_eq!(phase, VotePhase::Resolved);
    }

    #[test]
    fn test_idle_action_is_not_a_write() {
        assert!(!EngineAction::Idle {
            phase: VotePhase::Done
        }
        .is_write());
        assert!(EngineAction::Revealed {
            outcome: Outcome::Yes,
            tx_hash: "0xabc".into()
        }
        .is_write());
    }
}
