//! Judge profile types sourced from the settlement contract

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Registration status of a judge on the settlement contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeStatus {
    Inactive,
    Active,
    Suspended,
}

impl JudgeStatus {
    pub fn from_code(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(JudgeStatus::Inactive),
            1 => Ok(JudgeStatus::Active),
            2 => Ok(JudgeStatus::Suspended),
            code => Err(TypeError::InvalidJudgeStatus { code }),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            JudgeStatus::Inactive => 0,
            JudgeStatus::Active => 1,
            JudgeStatus::Suspended => 2,
        }
    }
}

impl std::fmt::Display for JudgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeStatus::Inactive => write!(f, "inactive"),
            JudgeStatus::Active => write!(f, "active"),
            JudgeStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// A judge's registration record, read-only from the agent's perspective.
/// Used only to short-circuit (e.g. skip registration when already active).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeProfile {
    /// Staked amount in token base units.
    pub stake: u128,
    /// Registration status.
    pub status: JudgeStatus,
    /// Reputation score out of 10000.
    pub reputation_score: u32,
    /// Resolutions where this judge sided with the final outcome.
    pub successful_resolutions: u64,
    /// Resolutions where this judge was slashed.
    pub failed_resolutions: u64,
}

impl JudgeProfile {
    pub fn is_active(&self) -> bool {
        self.status == JudgeStatus::Active
    }
}
