// src/backend/models/config.rs
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://onetime-qr.vercel.app";
pub const DEFAULT_MIN_CYCLES_THRESHOLD: u128 = 10_000_000_000; // 10B cycles

/// Runtime settings kept in stable memory across upgrades.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RedeemConfig {
    pub admin_principal: Principal,
    /// Externally visible origin used to build claim links.
    pub base_url: String,
    /// Appended to the message shown on a successful claim.
    pub reward_label: Option<String>,
    pub min_cycles_threshold: u128,
}

impl Default for RedeemConfig {
    fn default() -> Self {
        Self {
            admin_principal: Principal::anonymous(),
            base_url: DEFAULT_BASE_URL.to_string(),
            reward_label: None,
            min_cycles_threshold: DEFAULT_MIN_CYCLES_THRESHOLD,
        }
    }
}

impl RedeemConfig {
    /// Shareable link for a code, e.g. `https://host/claim/3F9A01BC`.
    pub fn claim_url(&self, code_id: &str) -> String {
        format!("{}/claim/{}", self.base_url.trim_end_matches('/'), code_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_url_tolerates_trailing_slash() {
        let mut config = RedeemConfig::default();
        config.base_url = "https://example.org/".to_string();
        assert_eq!(config.claim_url("ABC123"), "https://example.org/claim/ABC123");
    }
}
