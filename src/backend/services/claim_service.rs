// src/backend/services/claim_service.rs
// First-claimer-wins redemption of issued codes.

use crate::{
    error::{RedeemError, StorageError},
    models::{ClaimOutcome, ClaimResult, ClaimStamp, ClaimantId, CodeRecord, TimestampNs},
    storage::codes as code_storage,
    utils::{
        crypto::{encode_claimant_id, CLAIMANT_ID_BYTES},
        logging::{log_error, log_info, log_warn},
        runtime::Runtime,
    },
};

/// Upper bound on conditional-write attempts for one claim request.
pub const MAX_CLAIM_ATTEMPTS: u32 = 3;

/// Storage seam for the claim flow.
///
/// `try_claim` must be a single conditional write: for any one code, exactly
/// one caller ever receives `Claimed`. A `StorageError` means the caller does
/// not know whether its write applied.
pub trait CodeRegistry {
    fn get(&self, code_id: &str) -> Result<Option<CodeRecord>, StorageError>;

    fn try_claim(
        &self,
        code_id: &str,
        claimant: &str,
        claimed_at: TimestampNs,
    ) -> Result<ClaimResult, StorageError>;
}

/// The canister's own stable-memory registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct StableCodeRegistry;

impl CodeRegistry for StableCodeRegistry {
    fn get(&self, code_id: &str) -> Result<Option<CodeRecord>, StorageError> {
        Ok(code_storage::get_code(code_id))
    }

    fn try_claim(
        &self,
        code_id: &str,
        claimant: &str,
        claimed_at: TimestampNs,
    ) -> Result<ClaimResult, StorageError> {
        Ok(code_storage::try_claim(code_id, claimant, claimed_at))
    }
}

/// Mints an opaque claimant identity, unrelated to any earlier request.
pub async fn mint_claimant_id<T: Runtime>(runtime: &T) -> Result<ClaimantId, RedeemError> {
    let bytes = runtime.random_bytes(CLAIMANT_ID_BYTES).await?;
    Ok(encode_claimant_id(&bytes))
}

/// Maps a stamp to the caller's outcome. `owned` marks the stamp as written by
/// this request.
fn outcome_for(code_id: &str, stamp: ClaimStamp, owned: bool) -> ClaimOutcome {
    if owned {
        ClaimOutcome::Success {
            code_id: code_id.to_string(),
            claimed_by: stamp.claimed_by,
            claimed_at: stamp.claimed_at,
        }
    } else {
        ClaimOutcome::Rejected {
            code_id: code_id.to_string(),
            claimed_by: stamp.claimed_by,
            claimed_at: stamp.claimed_at,
        }
    }
}

/// A stamp carrying our claimant counts as ours only after one of our writes
/// came back as a conflict. Otherwise it belongs to another request that
/// happened to mint the same id.
fn written_by_lost_attempt(stamp: &ClaimStamp, claimant: &str, conflicted: bool) -> bool {
    conflicted && stamp.claimed_by == claimant
}

/// Claims `code_id` on behalf of a freshly minted claimant.
///
/// Randomness is drawn before touching the registry; the registry transition
/// itself never spans an await point.
///
/// # Errors
/// * `StorageConflict` - every attempt conflicted and a re-read could not settle the state.
/// * `StorageUnavailable` - the registry could not be reached.
/// * `RandomnessUnavailable` - no claimant identity could be minted.
pub async fn claim_code<R, T>(
    registry: &R,
    runtime: &T,
    code_id: &str,
) -> Result<ClaimOutcome, RedeemError>
where
    R: CodeRegistry,
    T: Runtime,
{
    let claimant = mint_claimant_id(runtime).await?;
    let mut conflicted = false;

    for attempt in 1..=MAX_CLAIM_ATTEMPTS {
        let claimed_at = runtime.now_ns();
        match registry.try_claim(code_id, &claimant, claimed_at) {
            Ok(ClaimResult::NotFound) => {
                return Ok(ClaimOutcome::NotFound {
                    code_id: code_id.to_string(),
                })
            }
            Ok(ClaimResult::Claimed(stamp)) => {
                log_info!("Code {} claimed by {}", code_id, stamp.claimed_by);
                return Ok(outcome_for(code_id, stamp, true));
            }
            Ok(ClaimResult::AlreadyClaimed(stamp)) => {
                let owned = written_by_lost_attempt(&stamp, &claimant, conflicted);
                return Ok(outcome_for(code_id, stamp, owned));
            }
            Err(StorageError::Conflict(reason)) => {
                conflicted = true;
                log_warn!(
                    "Claim attempt {}/{} for {} conflicted: {}",
                    attempt,
                    MAX_CLAIM_ATTEMPTS,
                    code_id,
                    reason
                );
            }
            Err(err @ StorageError::Unavailable(_)) => {
                log_error!("Claim for {} failed: {}", code_id, err);
                return Err(err.into());
            }
        }
    }

    settle_after_conflicts(registry, code_id, &claimant)
}

/// Reads the record back once retries are exhausted, since a conflicted
/// write may still have committed.
fn settle_after_conflicts<R: CodeRegistry>(
    registry: &R,
    code_id: &str,
    claimant: &str,
) -> Result<ClaimOutcome, RedeemError> {
    match registry.get(code_id)? {
        None => Ok(ClaimOutcome::NotFound {
            code_id: code_id.to_string(),
        }),
        Some(CodeRecord {
            claim: Some(stamp), ..
        }) => {
            let owned = written_by_lost_attempt(&stamp, claimant, true);
            Ok(outcome_for(code_id, stamp, owned))
        }
        Some(_) => {
            log_error!(
                "Claim for {} still unresolved after {} attempts",
                code_id,
                MAX_CLAIM_ATTEMPTS
            );
            Err(RedeemError::StorageConflict(format!(
                "Claim for {} did not apply after {} attempts",
                code_id, MAX_CLAIM_ATTEMPTS
            )))
        }
    }
}
