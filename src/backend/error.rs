// src/backend/error.rs
use candid::CandidType;
use serde::Deserialize;
use thiserror::Error;

#[derive(CandidType, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum RedeemError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Code already exists: {0}")]
    DuplicateCode(String),

    /// The conditional write may or may not have applied; the claim state is unknown.
    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Internal canister error: {0}")]
    InternalError(String),

    #[error("Canister cycle balance too low for operation")]
    CycleLow,
}

/// Failures reported by a code registry backend.
///
/// Neither variant says anything about the claim state of a record, so they
/// must never be turned into a claim outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A competing write interfered and this write's effect is not known.
    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("registry unreachable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for RedeemError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => RedeemError::StorageConflict(msg),
            StorageError::Unavailable(msg) => RedeemError::StorageUnavailable(msg),
        }
    }
}

impl RedeemError {
    /// Storage-layer failures are shown to claimants as a generic failure page.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            RedeemError::StorageConflict(_)
                | RedeemError::StorageUnavailable(_)
                | RedeemError::RandomnessUnavailable(_)
        )
    }
}
