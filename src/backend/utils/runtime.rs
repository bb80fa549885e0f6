// src/backend/utils/runtime.rs
use crate::error::RedeemError;
use crate::models::common::TimestampNs;
use crate::utils::{crypto, time};

/// System services the claim and issuance flows depend on.
///
/// The canister uses [`IcRuntime`]; unit tests substitute a deterministic one.
#[allow(async_fn_in_trait)]
pub trait Runtime {
    fn now_ns(&self) -> TimestampNs;

    /// Fresh randomness. May suspend the current message, so callers must not
    /// hold registry state across this call.
    async fn random_bytes(&self, num_bytes: usize) -> Result<Vec<u8>, RedeemError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IcRuntime;

impl Runtime for IcRuntime {
    fn now_ns(&self) -> TimestampNs {
        time::get_current_time_ns()
    }

    async fn random_bytes(&self, num_bytes: usize) -> Result<Vec<u8>, RedeemError> {
        crypto::generate_random_bytes(num_bytes).await
    }
}
