// src/backend/services/admin_service.rs
// Out-of-band maintenance: bulk reset, dashboard listing, settings.

use crate::{
    error::RedeemError,
    models::{CodeRecord, RedeemConfig},
    storage::{codes as code_storage, config as config_storage},
    utils::logging::log_info,
};
use candid::{CandidType, Principal};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(CandidType, Deserialize, Clone, Debug, Default)]
pub struct ListCodesResponse {
    pub codes: Vec<CodeRecord>,
    pub total: u64,
}

/// Optional overrides; absent fields keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct ConfigUpdate {
    pub admin_principal: Option<Principal>,
    pub base_url: Option<String>,
    /// `Some(None)` clears the label.
    pub reward_label: Option<Option<String>>,
    pub min_cycles_threshold: Option<u128>,
}

/// Returns every code to its unclaimed state. Claim history is not kept.
pub fn reset_all_codes(caller: Principal) -> u64 {
    let cleared = code_storage::reset_all();
    log_info!("All codes reset by {} ({} were claimed)", caller, cleared);
    cleared
}

pub fn list_codes(offset: Option<u32>, limit: Option<u32>) -> ListCodesResponse {
    let offset = offset.unwrap_or(0) as u64;
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE) as usize;
    let (codes, total) = code_storage::list_codes(offset, limit);
    ListCodesResponse { codes, total }
}

pub fn update_config(update: ConfigUpdate, caller: Principal) -> Result<RedeemConfig, RedeemError> {
    let mut config = config_storage::load_config();
    if let Some(admin) = update.admin_principal {
        config.admin_principal = admin;
    }
    if let Some(base_url) = update.base_url {
        config.base_url = base_url;
    }
    if let Some(label) = update.reward_label {
        config.reward_label = label;
    }
    if let Some(threshold) = update.min_cycles_threshold {
        config.min_cycles_threshold = threshold;
    }
    config_storage::save_config(&config)?;
    log_info!("Configuration updated by {}", caller);
    Ok(config)
}
