pub mod admin_service;
pub mod claim_service;
pub mod issue_service;
