// src/backend/utils/crypto.rs
// Randomness and identifier encoding.

use crate::error::RedeemError;
use ic_cdk::api::management_canister::main::raw_rand;

pub const CODE_ID_BYTES: usize = 4; // 8 hex chars
pub const CLAIMANT_ID_BYTES: usize = 3; // 6 hex chars

/// Generates random bytes using `raw_rand`.
pub async fn generate_random_bytes(num_bytes: usize) -> Result<Vec<u8>, RedeemError> {
    // raw_rand returns 32 bytes per call.
    if num_bytes > 32 {
        return Err(RedeemError::InternalError(
            "Cannot request more than 32 random bytes from raw_rand in one call".to_string(),
        ));
    }
    let (bytes,) = raw_rand().await.map_err(|(code, msg)| {
        RedeemError::RandomnessUnavailable(format!("raw_rand failed: code={}, msg={}", code as u8, msg))
    })?;
    bytes
        .get(..num_bytes)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| RedeemError::RandomnessUnavailable("raw_rand returned too few bytes".to_string()))
}

/// Upper-case hex, the format printed on issued codes.
pub fn encode_code_id(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// `User_` followed by lower-case hex.
pub fn encode_claimant_id(bytes: &[u8]) -> String {
    format!("User_{}", hex::encode(bytes))
}
