//! Scan reports
//!
//! A scan's primary observable output is an ordered, append-only sequence
//! of human-readable log lines. The report is complete even when individual
//! markets failed, so an operator can distinguish "nothing to do" from
//! "something failed".

use chrono::{DateTime, Utc};
use serde::Serialize;

use juris_types::Address;

use crate::error::ErrorClass;

/// One line of a scan report, optionally tagged with a market id.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub market_id: Option<u64>,
    pub message: String,
    /// Set for entries recording a failure.
    pub error_class: Option<String>,
}

/// Ordered record of everything one scan observed and did.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub identity: Address,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub markets_checked: u64,
    pub actions_taken: u32,
    pub failures: u32,
    entries: Vec<ScanEntry>,
}

impl ScanReport {
    pub fn begin(identity: Address) -> Self {
        ScanReport {
            identity,
            started_at: Utc::now(),
            finished_at: None,
            markets_checked: 0,
            actions_taken: 0,
            failures: 0,
            entries: Vec::new(),
        }
    }

    /// Append an informational entry.
    pub fn note(&mut self, market_id: Option<u64>, message: impl Into<String>) {
        self.entries.push(ScanEntry {
            market_id,
            message: message.into(),
            error_class: None,
        });
    }

    /// Append a failure entry tagged with its error class.
    pub fn fail(&mut self, market_id: u64, class: ErrorClass, message: impl Into<String>) {
        self.failures += 1;
        self.entries.push(ScanEntry {
            market_id: Some(market_id),
            message: message.into(),
            error_class: Some(class.to_string()),
        });
    }

    pub fn record_action(&mut self) {
        self.actions_taken += 1;
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    /// Entries for one market, in order.
    pub fn entries_for(&self, market_id: u64) -> Vec<&ScanEntry> {
        self.entries
            .iter()
            .filter(|e| e.market_id == Some(market_id))
            .collect()
    }

    /// Render the report as log lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| match (entry.market_id, entry.error_class.as_deref()) {
                (Some(id), Some(class)) => {
                    format!("market {id}: [{class}] {}", entry.message)
                }
                (Some(id), None) => format!("market {id}: {}", entry.message),
                (None, _) => entry.message.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Address {
        "0x3333333333333333333333333333333333333333".parse().unwrap()
    }

    #[test]
    fn test_entries_are_ordered() {
        let mut report = ScanReport::begin(identity());
        report.note(None, "checking 2 markets");
        report.note(Some(0), "committed yes");
        report.fail(1, ErrorClass::Transient, "ledger: connection refused");

        let lines = report.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "market 0: committed yes");
        assert_eq!(lines[2], "market 1: [transient] ledger: connection refused");
    }

    #[test]
    fn test_failure_counter() {
        let mut report = ScanReport::begin(identity());
        report.fail(4, ErrorClass::StateInconsistency, "salt missing");
        assert_eq!(report.failures, 1);
        assert_eq!(report.entries_for(4).len(), 1);
    }
}
