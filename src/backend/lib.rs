// src/backend/lib.rs

pub mod api;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;

// Types referenced by endpoint signatures must be in scope for the Candid export.
use api::{IssueCodesRequest, ListRequest, UpdateConfigRequest};
use error::RedeemError;
use http::{HttpRequest, HttpResponse};
use models::init::InitArgs;
use models::{ClaimResponse, CodeRecord, RedeemConfig};
use services::admin_service::ListCodesResponse;
use services::issue_service::IssuedCode;
use utils::logging::log_info;

#[ic_cdk::init]
fn init(args: InitArgs) {
    let defaults = RedeemConfig::default();
    let config = RedeemConfig {
        admin_principal: args.admin_principal,
        base_url: args.base_url.unwrap_or(defaults.base_url),
        reward_label: args.reward_label,
        min_cycles_threshold: args.min_cycles_threshold.unwrap_or(defaults.min_cycles_threshold),
    };
    if let Err(e) = storage::config::save_config(&config) {
        ic_cdk::trap(&format!("Failed to initialize configuration: {}", e));
    }
    log_info!("Redemption backend canister initialized.");
}

#[ic_cdk::post_upgrade]
fn post_upgrade() {
    // Codes and settings live in stable memory and survive the upgrade untouched.
    let claimed = storage::codes::rebuild_claim_index();
    log_info!(
        "Redemption backend canister upgraded with {} codes ({} claimed).",
        storage::codes::code_count(),
        claimed
    );
}

// Export Candid interface
ic_cdk::export_candid!();
