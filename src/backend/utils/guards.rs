use crate::error::RedeemError;
use crate::storage::config::{get_admin_principal, get_min_cycles_threshold};
use crate::utils::logging::log_warn;
use candid::Principal;
use ic_cdk::api::canister_balance128;

/// Checks if the canister has sufficient cycles.
///
/// # Errors
///
/// Returns `RedeemError::CycleLow` if the balance is below the configured threshold.
pub fn check_cycles() -> Result<(), RedeemError> {
    let balance = canister_balance128();
    let threshold = get_min_cycles_threshold();
    if balance < threshold {
        log_warn!("Cycle balance low: {} cycles, threshold: {}", balance, threshold);
        Err(RedeemError::CycleLow)
    } else {
        Ok(())
    }
}

/// Checks `caller` against the configured admin principal.
pub fn check_admin(caller: Principal) -> Result<(), RedeemError> {
    if caller != Principal::anonymous() && caller == get_admin_principal() {
        Ok(())
    } else {
        Err(RedeemError::NotAuthorized(format!(
            "{} is not the admin principal",
            caller
        )))
    }
}

/// Method guard for admin-only endpoints.
pub fn admin_guard() -> Result<(), String> {
    check_admin(ic_cdk::caller()).map_err(|e| e.to_string())
}
