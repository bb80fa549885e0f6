// src/backend/storage/config.rs
use crate::error::RedeemError;
use crate::models::config::{RedeemConfig, DEFAULT_BASE_URL, DEFAULT_MIN_CYCLES_THRESHOLD};
use crate::storage::memory::{
    get_admin_principal_memory, get_base_url_memory, get_min_cycles_threshold_memory,
    get_reward_label_memory, Memory,
};
use crate::storage::storable::Cbor;
use crate::utils::logging::log_info;
use candid::Principal;
use ic_stable_structures::StableCell;
use std::cell::RefCell;

thread_local! {
    /// Stable cell for the Admin Principal
    static ADMIN_PRINCIPAL: RefCell<StableCell<Cbor<Principal>, Memory>> = RefCell::new(
        StableCell::init(get_admin_principal_memory(), Cbor(Principal::anonymous()))
            .expect("Failed to initialize admin principal stable cell")
    );

    static BASE_URL: RefCell<StableCell<Cbor<String>, Memory>> = RefCell::new(
        StableCell::init(get_base_url_memory(), Cbor(DEFAULT_BASE_URL.to_string()))
            .expect("Failed to initialize base url stable cell")
    );

    static REWARD_LABEL: RefCell<StableCell<Cbor<Option<String>>, Memory>> = RefCell::new(
        StableCell::init(get_reward_label_memory(), Cbor(None))
            .expect("Failed to initialize reward label stable cell")
    );

    /// Stable cell for the Minimum Cycles Threshold
    static MIN_CYCLES_THRESHOLD: RefCell<StableCell<u128, Memory>> = RefCell::new(
        StableCell::init(get_min_cycles_threshold_memory(), DEFAULT_MIN_CYCLES_THRESHOLD)
            .expect("Failed to initialize min cycles threshold stable cell")
    );
}

fn storage_err<E: std::fmt::Debug>(what: &str, e: E) -> RedeemError {
    RedeemError::StorageUnavailable(format!("Failed to set {}: {:?}", what, e))
}

/// Writes every setting. Called from init and from the admin update method.
pub fn save_config(config: &RedeemConfig) -> Result<(), RedeemError> {
    ADMIN_PRINCIPAL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(config.admin_principal))
            .map_err(|e| storage_err("admin principal", e))
    })?;
    BASE_URL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(config.base_url.clone()))
            .map_err(|e| storage_err("base url", e))
    })?;
    REWARD_LABEL.with(|cell| {
        cell.borrow_mut()
            .set(Cbor(config.reward_label.clone()))
            .map_err(|e| storage_err("reward label", e))
    })?;
    MIN_CYCLES_THRESHOLD.with(|cell| {
        cell.borrow_mut()
            .set(config.min_cycles_threshold)
            .map_err(|e| storage_err("min cycles threshold", e))
    })?;
    log_info!(
        "Configuration saved: Admin={}, BaseUrl={}, Reward={:?}, Threshold={}",
        config.admin_principal,
        config.base_url,
        config.reward_label,
        config.min_cycles_threshold
    );
    Ok(())
}

pub fn load_config() -> RedeemConfig {
    RedeemConfig {
        admin_principal: get_admin_principal(),
        base_url: BASE_URL.with(|cell| cell.borrow().get().0.clone()),
        reward_label: get_reward_label(),
        min_cycles_threshold: get_min_cycles_threshold(),
    }
}

pub fn get_admin_principal() -> Principal {
    ADMIN_PRINCIPAL.with(|cell| cell.borrow().get().0)
}

pub fn get_reward_label() -> Option<String> {
    REWARD_LABEL.with(|cell| cell.borrow().get().0.clone())
}

pub fn get_min_cycles_threshold() -> u128 {
    MIN_CYCLES_THRESHOLD.with(|cell| *cell.borrow().get())
}
