//! Juris Agent - commit-reveal engine and market scanner
//!
//! The agent's job each tick: enumerate all markets on the settlement
//! contract, filter to the ones this identity was selected to judge, infer
//! each market's protocol phase from remote state plus the local secret
//! store, and take at most one action per market — commit a hashed vote,
//! or reveal a previously committed one.
//!
//! Design constraints carried throughout:
//!
//! - Markets are processed one at a time, in ascending id order, so writes
//!   from one signing identity are strictly serialized.
//! - Per-market failures are caught at the scanner boundary and recorded in
//!   the scan report; one bad market never halts the scan of the others.
//! - Scans are single-flight: a second scan started while one is running
//!   fails fast instead of risking a double commit.
//! - Remote state is re-read every scan and never cached as ground truth.

pub mod engine;
pub mod error;
pub mod register;
pub mod report;
pub mod scanner;

pub use engine::{Engine, EngineAction, VotePhase};
pub use error::{AgentError, ErrorClass};
pub use register::{ensure_registered, RegistrationOutcome};
pub use report::{ScanEntry, ScanReport};
pub use scanner::{run_loop, ScanError, Scanner};
