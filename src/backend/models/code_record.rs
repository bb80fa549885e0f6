// src/backend/models/code_record.rs
use crate::models::common::{ClaimantId, CodeId, TimestampNs};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Who claimed a code and when. Present on a record exactly when it is claimed.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimStamp {
    pub claimed_by: ClaimantId,
    pub claimed_at: TimestampNs,
}

/// One issued redemption code.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CodeRecord {
    pub id: CodeId,
    pub created_at: TimestampNs,
    pub claim: Option<ClaimStamp>,
}

impl CodeRecord {
    pub fn new(id: CodeId, created_at: TimestampNs) -> Self {
        Self {
            id,
            created_at,
            claim: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claim.is_some()
    }

    pub fn claimed_by(&self) -> Option<&str> {
        self.claim.as_ref().map(|stamp| stamp.claimed_by.as_str())
    }

    pub fn claimed_at(&self) -> Option<TimestampNs> {
        self.claim.as_ref().map(|stamp| stamp.claimed_at)
    }
}
