//! JSON-RPC ledger client
//!
//! Speaks JSON-RPC 2.0 over HTTP to the ledger gateway that fronts the
//! settlement contract. Write methods return a transaction hash which is
//! then polled to confirmation; the public methods only return once the
//! gateway reports the transaction confirmed or reverted, or the
//! confirmation deadline passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::Instant;

use juris_types::{Address, JudgeProfile, JudgeStatus, Market, MarketStatus, Outcome, Salt, VoteRecord, B256};

use crate::{LedgerClient, LedgerError, TxReceipt};

/// Configuration for [`RpcLedgerClient`].
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Gateway endpoint, e.g. `http://localhost:8545`.
    pub endpoint: String,
    /// Optional bearer token for authenticated gateways.
    pub auth_token: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Delay between confirmation polls.
    pub confirm_interval: Duration,
    /// Hard ceiling on the total confirmation wait.
    pub confirm_deadline: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            endpoint: "http://localhost:8545".to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(15),
            confirm_interval: Duration::from_secs(2),
            confirm_deadline: Duration::from_secs(120),
        }
    }
}

/// Ledger client over JSON-RPC 2.0.
pub struct RpcLedgerClient {
    config: LedgerConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse<R> {
    result: Option<R>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

// ---------------------------------------------------------------------------
// Wire shapes
//
// The gateway mirrors the contract's tuple layout with numeric status and
// outcome codes; decoding into the typed structs happens here and nowhere
// else.
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketWire {
    id: u64,
    question: String,
    creator: Address,
    resolution_time: u64,
    status: u8,
    outcome: u8,
    required_judges: u64,
    court_id: u64,
}

impl TryFrom<MarketWire> for Market {
    type Error = LedgerError;

    fn try_from(wire: MarketWire) -> Result<Self, Self::Error> {
        Ok(Market {
            id: wire.id,
            question: wire.question,
            creator: wire.creator,
            resolution_time: wire.resolution_time,
            status: MarketStatus::from_code(wire.status).map_err(decode_err)?,
            outcome: Outcome::from_wire_code(wire.outcome).map_err(decode_err)?,
            required_judges: wire.required_judges,
            court_id: wire.court_id,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteWire {
    judge: Address,
    outcome: u8,
    revealed: bool,
    timestamp: u64,
    evidence_hash: B256,
    rationale_hash: B256,
}

impl TryFrom<VoteWire> for VoteRecord {
    type Error = LedgerError;

    fn try_from(wire: VoteWire) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            judge: wire.judge,
            outcome: Outcome::from_wire_code(wire.outcome).map_err(decode_err)?,
            revealed: wire.revealed,
            timestamp: wire.timestamp,
            evidence_hash: wire.evidence_hash,
            rationale_hash: wire.rationale_hash,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JudgeWire {
    stake: u128,
    status: u8,
    reputation_score: u32,
    successful_resolutions: u64,
    failed_resolutions: u64,
}

impl TryFrom<JudgeWire> for JudgeProfile {
    type Error = LedgerError;

    fn try_from(wire: JudgeWire) -> Result<Self, Self::Error> {
        Ok(JudgeProfile {
            stake: wire.stake,
            status: JudgeStatus::from_code(wire.status).map_err(decode_err)?,
            reputation_score: wire.reputation_score,
            successful_resolutions: wire.successful_resolutions,
            failed_resolutions: wire.failed_resolutions,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TxStatusWire {
    Pending,
    Confirmed,
    Reverted,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionWire {
    status: TxStatusWire,
    #[serde(default)]
    block_number: Option<u64>,
    #[serde(default)]
    reason: Option<String>,
}

fn decode_err(err: juris_types::TypeError) -> LedgerError {
    LedgerError::Decode {
        message: err.to_string(),
    }
}

impl RpcLedgerClient {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Transport {
                message: e.to_string(),
            })?;
        Ok(RpcLedgerClient {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<R, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut http = self.client.post(&self.config.endpoint).json(&request);
        if let Some(ref token) = self.config.auth_token {
            http = http.bearer_auth(token);
        }

        let response = http.send().await.map_err(|e| LedgerError::Transport {
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(LedgerError::Transport {
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: RpcResponse<R> =
            response.json().await.map_err(|e| LedgerError::Decode {
                message: e.to_string(),
            })?;

        if let Some(err) = body.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| LedgerError::Decode {
            message: format!("{method}: response carried neither result nor error"),
        })
    }

    /// Submit a write and poll the gateway until the transaction confirms,
    /// reverts, or the deadline passes.
    async fn submit_and_confirm(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<TxReceipt, LedgerError> {
        let tx_hash: String = self.call(method, params).await?;
        tracing::debug!(method, tx_hash = %tx_hash, "transaction submitted, awaiting confirmation");

        let started = Instant::now();
        loop {
            if started.elapsed() > self.config.confirm_deadline {
                return Err(LedgerError::ConfirmationTimeout {
                    tx_hash,
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            let tx: TransactionWire = self
                .call("judge_getTransaction", json!([&tx_hash]))
                .await?;

            match tx.status {
                TxStatusWire::Confirmed => {
                    let block = tx.block_number.unwrap_or_default();
                    tracing::info!(method, tx_hash = %tx_hash, block, "transaction confirmed");
                    return Ok(TxReceipt { tx_hash, block });
                }
                TxStatusWire::Reverted => {
                    return Err(LedgerError::Rejected {
                        reason: tx
                            .reason
                            .unwrap_or_else(|| "reverted without reason".to_string()),
                    });
                }
                TxStatusWire::Pending => {
                    tokio::time::sleep(self.config.confirm_interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn market_count(&self) -> Result<u64, LedgerError> {
        self.call("judge_getMarketCount", json!([])).await
    }

    async fn market(&self, id: u64) -> Result<Market, LedgerError> {
        let wire: MarketWire = self.call("judge_getMarket", json!([id])).await?;
        wire.try_into()
    }

    async fn selected_judges(&self, id: u64) -> Result<Vec<Address>, LedgerError> {
        self.call("judge_getSelectedJudges", json!([id])).await
    }

    async fn vote(&self, id: u64, judge: Address) -> Result<VoteRecord, LedgerError> {
        let wire: VoteWire = self
            .call("judge_getVote", json!([id, judge]))
            .await?;
        wire.try_into()
    }

    async fn judge(&self, address: Address) -> Result<JudgeProfile, LedgerError> {
        let wire: JudgeWire = self.call("judge_getJudge", json!([address])).await?;
        wire.try_into()
    }

    async fn token_balance(&self, address: Address) -> Result<u128, LedgerError> {
        self.call("token_balanceOf", json!([address])).await
    }

    async fn approve_stake(&self, amount: u128) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm("token_approve", json!([amount])).await
    }

    async fn register_as_judge(&self, stake: u128) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm("judge_registerAsJudge", json!([stake]))
            .await
    }

    async fn join_court(&self, court_id: u64) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm("judge_joinCourt", json!([court_id]))
            .await
    }

    async fn leave_court(&self, court_id: u64) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm("judge_leaveCourt", json!([court_id]))
            .await
    }

    async fn commit_vote(&self, market_id: u64, digest: B256) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm("judge_commitVote", json!([market_id, digest]))
            .await
    }

    async fn reveal_vote(
        &self,
        market_id: u64,
        outcome_code: u8,
        salt: Salt,
        evidence_hash: B256,
        rationale_hash: B256,
    ) -> Result<TxReceipt, LedgerError> {
        self.submit_and_confirm(
            "judge_revealVote",
            json!([market_id, outcome_code, salt, evidence_hash, rationale_hash]),
        )
        .await
    }
}
