//! Market scanner
//!
//! Enumerates all markets, filters to the ones this identity judges, and
//! hands each to the engine. Per-market failures are converted into report
//! entries; the scan itself only fails if the market list cannot be read at
//! all, or if another scan is already in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};

use juris_ledger::{LedgerClient, LedgerError};
use juris_types::Address;

use crate::engine::{Engine, EngineAction};
use crate::error::AgentError;
use crate::report::ScanReport;

/// Errors that abort a whole scan
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Another scan for this identity is still running. Overlapping scans
    /// could both observe `NeedsCommit` and double-submit, so the second
    /// one fails fast.
    #[error("a scan is already in flight for this identity")]
    AlreadyRunning,

    /// The market list itself could not be read.
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// One-market-at-a-time scanner with a single-flight guard.
pub struct Scanner {
    engine: Engine,
    ledger: Arc<dyn LedgerClient>,
    identity: Address,
    flight: Mutex<()>,
}

impl Scanner {
    pub fn new(engine: Engine, ledger: Arc<dyn LedgerClient>, identity: Address) -> Self {
        Scanner {
            engine,
            ledger,
            identity,
            flight: Mutex::new(()),
        }
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Run one full scan over all markets.
    ///
    /// The returned report is complete and ordered even when individual
    /// markets failed. Retrying failed markets is the next scheduled
    /// scan's job; this method performs no retries of its own.
    pub async fn scan(&self) -> Result<ScanReport, ScanError> {
        let _flight = self
            .flight
            .try_lock()
            .map_err(|_| ScanError::AlreadyRunning)?;

        let mut report = ScanReport::begin(self.identity);
        let count = self.ledger.market_count().await?;
        report.note(
            None,
            format!("{} checking {count} markets", self.identity),
        );
        tracing::info!(identity = %self.identity, markets = count, "scan started");

        for market_id in 0..count {
            report.markets_checked += 1;
            match self.check_market(market_id, &mut report).await {
                Ok(()) => {}
                Err(err) => {
                    let class = err.class();
                    tracing::warn!(
                        market_id,
                        class = %class,
                        error = %err,
                        "market processing failed; continuing scan"
                    );
                    report.fail(market_id, class, err.to_string());
                }
            }
        }

        let report = report.finish();
        tracing::info!(
            identity = %self.identity,
            markets = report.markets_checked,
            actions = report.actions_taken,
            failures = report.failures,
            "scan finished"
        );
        Ok(report)
    }

    /// Check one market and act on it if needed.
    ///
    /// The three reads are independent queries and run concurrently; all
    /// must complete before the engine decides the market's phase.
    async fn check_market(
        &self,
        market_id: u64,
        report: &mut ScanReport,
    ) -> Result<(), AgentError> {
        let (market, judges, vote) = tokio::join!(
            self.ledger.market(market_id),
            self.ledger.selected_judges(market_id),
            self.ledger.vote(market_id, self.identity),
        );

        let market = market?;
        if market.status.is_terminal() {
            report.note(Some(market_id), "resolved, nothing to do");
            return Ok(());
        }

        let judges = judges?;
        if !judges.contains(&self.identity) {
            report.note(Some(market_id), "not selected as judge, skipping");
            return Ok(());
        }

        if !market.status.accepts_votes() {
            report.note(
                Some(market_id),
                format!("{}, awaiting contract-side adjudication", market.status),
            );
            return Ok(());
        }

        let vote = vote?;
        match self.engine.process(&market, &vote).await? {
            EngineAction::Idle { phase } => {
                report.note(Some(market_id), format!("{phase}, nothing to do"));
            }
            EngineAction::Committed {
                outcome,
                confidence,
                tx_hash,
            } => {
                report.record_action();
                report.note(
                    Some(market_id),
                    format!("committed {outcome} (confidence {confidence}%, tx {tx_hash})"),
                );
            }
            EngineAction::Revealed { outcome, tx_hash } => {
                report.record_action();
                report.note(Some(market_id), format!("revealed {outcome} (tx {tx_hash})"));
            }
        }
        Ok(())
    }
}

/// Repeatedly scan on a fixed interval until the shutdown signal fires.
///
/// Cancellation is honored only at scan boundaries: a scan that has started
/// runs to completion before the loop exits.
pub async fn run_loop(
    scanner: Arc<Scanner>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!(interval_secs = interval.as_secs(), "scan loop started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match scanner.scan().await {
                    Ok(report) => {
                        for line in report.lines() {
                            tracing::info!("{line}");
                        }
                    }
                    Err(ScanError::AlreadyRunning) => {
                        tracing::warn!("previous scan still in flight, skipping tick");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "scan failed");
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    tracing::info!("shutdown signal received, stopping scan loop");
                    break;
                }
            }
        }
    }
}
