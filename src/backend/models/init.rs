// src/backend/models/init.rs
use candid::{CandidType, Principal};
use serde::Deserialize;

#[derive(CandidType, Deserialize, Debug)]
pub struct InitArgs {
    pub admin_principal: Principal,
    pub base_url: Option<String>,
    pub reward_label: Option<String>,
    pub min_cycles_threshold: Option<u128>,
}
