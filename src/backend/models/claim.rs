// src/backend/models/claim.rs
use crate::models::code_record::ClaimStamp;
use crate::models::common::{ClaimantId, CodeId, TimestampNs};
use crate::utils::time::format_claim_time;
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Result of a single conditional write against the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimResult {
    NotFound,
    /// This call performed the unclaimed -> claimed transition.
    Claimed(ClaimStamp),
    /// The transition had already happened; carries the original stamp.
    AlreadyClaimed(ClaimStamp),
}

/// What a claimant is told about their claim.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Success {
        code_id: CodeId,
        claimed_by: ClaimantId,
        claimed_at: TimestampNs,
    },
    Rejected {
        code_id: CodeId,
        claimed_by: ClaimantId,
        claimed_at: TimestampNs,
    },
    NotFound {
        code_id: CodeId,
    },
}

impl ClaimOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClaimOutcome::Success { .. })
    }

    pub fn code_id(&self) -> &str {
        match self {
            ClaimOutcome::Success { code_id, .. }
            | ClaimOutcome::Rejected { code_id, .. }
            | ClaimOutcome::NotFound { code_id } => code_id,
        }
    }

    /// Human-readable result line. `reward` is appended to successful claims only.
    pub fn message(&self, reward: Option<&str>) -> String {
        match self {
            ClaimOutcome::NotFound { code_id } => format!("Code {} not found.", code_id),
            ClaimOutcome::Success {
                code_id,
                claimed_by,
                claimed_at,
            } => {
                let mut msg = format!(
                    "{} claimed at {} by {}.",
                    code_id,
                    format_claim_time(*claimed_at),
                    claimed_by
                );
                if let Some(label) = reward {
                    msg.push_str(&format!(" Reward: {}", label));
                }
                msg
            }
            ClaimOutcome::Rejected {
                code_id,
                claimed_by,
                claimed_at,
            } => format!(
                "{} already claimed by {} at {}.",
                code_id,
                claimed_by,
                format_claim_time(*claimed_at)
            ),
        }
    }
}

/// Candid reply for the `claim` method.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug)]
pub struct ClaimResponse {
    pub outcome: ClaimOutcome,
    pub message: String,
    /// Informational only, never persisted.
    pub responded_at: TimestampNs,
}
