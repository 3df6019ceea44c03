//! Judge registration
//!
//! Registration stakes tokens with the settlement contract. The token
//! approval must be confirmed before the registration itself is submitted,
//! and an already-active judge short-circuits without touching the ledger.

use juris_ledger::LedgerClient;
use juris_types::Address;

use crate::error::AgentError;

/// Result of an [`ensure_registered`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The judge was already active; no transactions were sent.
    AlreadyActive,
    /// Approval and registration both confirmed.
    Registered { tx_hash: String },
}

/// Register this identity as a judge with the given stake, unless it is
/// already active.
pub async fn ensure_registered(
    ledger: &dyn LedgerClient,
    identity: Address,
    stake: u128,
) -> Result<RegistrationOutcome, AgentError> {
    let profile = ledger.judge(identity).await?;
    if profile.is_active() {
        tracing::info!(%identity, "already registered as judge, skipping");
        return Ok(RegistrationOutcome::AlreadyActive);
    }

    tracing::info!(%identity, stake, "approving stake token");
    ledger.approve_stake(stake).await?;

    tracing::info!(%identity, stake, "registering as judge");
    let receipt = ledger.register_as_judge(stake).await?;
    tracing::info!(%identity, tx_hash = %receipt.tx_hash, "registered");

    Ok(RegistrationOutcome::Registered {
        tx_hash: receipt.tx_hash,
    })
}
