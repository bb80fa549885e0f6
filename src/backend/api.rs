// src/backend/api.rs
// Candid endpoint definitions (query/update functions)

use crate::{
    error::RedeemError,
    http::{self, HttpRequest, HttpResponse},
    models::{ClaimResponse, CodeRecord, RedeemConfig},
    services::{
        admin_service::{self, ConfigUpdate, ListCodesResponse},
        claim_service::{self, StableCodeRegistry},
        issue_service::{self, IssuedCode},
    },
    storage::{codes as code_storage, config as config_storage},
    utils::{
        guards::{admin_guard, check_cycles},
        runtime::{IcRuntime, Runtime},
    },
};
use candid::{CandidType, Principal};
use ic_cdk::caller;
use ic_cdk_macros::{query, update};
use serde::Deserialize;
use validator::{Validate, ValidationError};

// --- Validation Helpers ---
fn validate_request<T: Validate>(req: &T) -> Result<(), RedeemError> {
    req.validate()
        .map_err(|e| RedeemError::InvalidInput(e.to_string()))
}

fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    let has_scheme = url.starts_with("https://") || url.starts_with("http://");
    if has_scheme && !url.contains(char::is_whitespace) && !url.contains(['?', '#']) {
        Ok(())
    } else {
        Err(ValidationError::new("base_url"))
    }
}

// --- Request Structs ---

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct IssueCodesRequest {
    #[validate(range(min = 1, max = 100))]
    pub count: u32,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct ListRequest {
    pub offset: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

#[derive(CandidType, Deserialize, Clone, Debug, Validate)]
pub struct UpdateConfigRequest {
    pub admin_principal: Option<Principal>,
    #[validate(length(min = 8, max = 256), custom(function = "validate_base_url"))]
    pub base_url: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub reward_label: Option<String>,
    /// Removes the reward label; ignored when `reward_label` is set.
    pub clear_reward_label: Option<bool>,
    pub min_cycles_threshold: Option<u128>,
}

impl From<UpdateConfigRequest> for ConfigUpdate {
    fn from(req: UpdateConfigRequest) -> Self {
        let reward_label = match (req.reward_label, req.clear_reward_label) {
            (Some(label), _) => Some(Some(label)),
            (None, Some(true)) => Some(None),
            (None, _) => None,
        };
        ConfigUpdate {
            admin_principal: req.admin_principal,
            base_url: req.base_url,
            reward_label,
            min_cycles_threshold: req.min_cycles_threshold,
        }
    }
}

// --- Claim Endpoints ---

#[update]
async fn claim(code: String) -> Result<ClaimResponse, RedeemError> {
    check_cycles()?;
    let runtime = IcRuntime;
    let outcome = claim_service::claim_code(&StableCodeRegistry, &runtime, &code).await?;
    let message = outcome.message(config_storage::get_reward_label().as_deref());
    Ok(ClaimResponse {
        outcome,
        message,
        responded_at: runtime.now_ns(),
    })
}

#[query]
fn get_code(code: String) -> Option<CodeRecord> {
    code_storage::get_code(&code)
}

// --- Issuance Endpoints ---

#[update(guard = "admin_guard")]
async fn issue_code() -> Result<IssuedCode, RedeemError> {
    check_cycles()?;
    issue_service::issue_code(&IcRuntime, &config_storage::load_config()).await
}

#[update(guard = "admin_guard")]
async fn issue_codes(req: IssueCodesRequest) -> Result<Vec<IssuedCode>, RedeemError> {
    validate_request(&req)?;
    check_cycles()?;
    issue_service::issue_codes(&IcRuntime, &config_storage::load_config(), req.count).await
}

// --- Admin Endpoints ---

#[update(guard = "admin_guard")]
fn reset_all() -> Result<u64, RedeemError> {
    check_cycles()?;
    Ok(admin_service::reset_all_codes(caller()))
}

#[query(guard = "admin_guard")]
fn list_codes(req: ListRequest) -> Result<ListCodesResponse, RedeemError> {
    validate_request(&req)?;
    Ok(admin_service::list_codes(req.offset, req.limit))
}

#[query(guard = "admin_guard")]
fn get_config() -> RedeemConfig {
    config_storage::load_config()
}

#[update(guard = "admin_guard")]
fn update_config(req: UpdateConfigRequest) -> Result<RedeemConfig, RedeemError> {
    validate_request(&req)?;
    admin_service::update_config(req.into(), caller())
}

// --- HTTP Gateway ---

#[query]
fn http_request(req: HttpRequest) -> HttpResponse {
    http::handle_query(&req, &StableCodeRegistry)
}

#[update]
async fn http_request_update(req: HttpRequest) -> HttpResponse {
    let reward = config_storage::get_reward_label();
    if let Err(e) = check_cycles() {
        let page = http::render_claim_page("", &Err(e), None, IcRuntime.now_ns());
        return HttpResponse {
            status_code: 503,
            headers: vec![("Content-Type".to_string(), "text/html; charset=utf-8".to_string())],
            body: page.into_bytes(),
            upgrade: None,
        };
    }
    http::handle_update(&req, &StableCodeRegistry, &IcRuntime, reward.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::issue_service::MAX_BATCH_SIZE;

    #[test]
    fn issue_request_bounds() {
        assert_eq!(MAX_BATCH_SIZE, 100);
        assert!(IssueCodesRequest { count: 10 }.validate().is_ok());
        assert!(IssueCodesRequest { count: 0 }.validate().is_err());
        assert!(IssueCodesRequest { count: MAX_BATCH_SIZE + 1 }.validate().is_err());
    }

    #[test]
    fn base_url_must_be_a_plain_origin() {
        let mut req = UpdateConfigRequest {
            admin_principal: None,
            base_url: Some("https://codes.example".to_string()),
            reward_label: None,
            clear_reward_label: None,
            min_cycles_threshold: None,
        };
        assert!(req.validate().is_ok());
        req.base_url = Some("ftp://codes.example".to_string());
        assert!(req.validate().is_err());
        req.base_url = Some("https://codes.example/?x=1".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn clear_flag_maps_to_label_removal() {
        let update: ConfigUpdate = UpdateConfigRequest {
            admin_principal: None,
            base_url: None,
            reward_label: None,
            clear_reward_label: Some(true),
            min_cycles_threshold: None,
        }
        .into();
        assert_eq!(update.reward_label, Some(None));
    }
}
