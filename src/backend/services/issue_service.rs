// src/backend/services/issue_service.rs
// Creates unclaimed codes and their shareable claim links.

use crate::{
    error::RedeemError,
    models::{CodeId, CodeRecord, RedeemConfig, TimestampNs},
    storage::codes as code_storage,
    utils::{
        crypto::{encode_code_id, CODE_ID_BYTES},
        logging::{log_info, log_warn},
        runtime::Runtime,
    },
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Fresh ids drawn before giving up on finding an unused one.
pub const MAX_ID_ATTEMPTS: u32 = 5;
pub const MAX_BATCH_SIZE: u32 = 100;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct IssuedCode {
    pub code_id: CodeId,
    pub claim_url: String,
    pub created_at: TimestampNs,
}

/// Issues one code with a random 8-character id.
pub async fn issue_code<T: Runtime>(
    runtime: &T,
    config: &RedeemConfig,
) -> Result<IssuedCode, RedeemError> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let bytes = runtime.random_bytes(CODE_ID_BYTES).await?;
        let code_id = encode_code_id(&bytes);
        let created_at = runtime.now_ns();
        match code_storage::insert_code(CodeRecord::new(code_id.clone(), created_at)) {
            Ok(()) => {
                log_info!("Issued code {}", code_id);
                return Ok(IssuedCode {
                    claim_url: config.claim_url(&code_id),
                    code_id,
                    created_at,
                });
            }
            Err(RedeemError::DuplicateCode(id)) => {
                log_warn!("Issued id {} collided (attempt {}/{})", id, attempt, MAX_ID_ATTEMPTS);
            }
            Err(e) => return Err(e),
        }
    }
    Err(RedeemError::InternalError(format!(
        "No unused code id after {} attempts",
        MAX_ID_ATTEMPTS
    )))
}

/// Issues `count` codes. Codes issued before a failure stay issued.
pub async fn issue_codes<T: Runtime>(
    runtime: &T,
    config: &RedeemConfig,
    count: u32,
) -> Result<Vec<IssuedCode>, RedeemError> {
    if count == 0 || count > MAX_BATCH_SIZE {
        return Err(RedeemError::InvalidInput(format!(
            "Batch size must be between 1 and {}",
            MAX_BATCH_SIZE
        )));
    }
    let mut issued = Vec::with_capacity(count as usize);
    for _ in 0..count {
        issued.push(issue_code(runtime, config).await?);
    }
    log_info!("Issued batch of {} codes", issued.len());
    Ok(issued)
}
