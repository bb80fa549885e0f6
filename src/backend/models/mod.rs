pub mod claim;
pub mod code_record;
pub mod common;
pub mod config;
pub mod init;

// Re-export common types/enums for easier access
pub use claim::{ClaimOutcome, ClaimResponse, ClaimResult};
pub use code_record::{ClaimStamp, CodeRecord};
pub use common::*;
pub use config::RedeemConfig;
