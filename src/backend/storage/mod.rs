// src/backend/storage/mod.rs
// Stable memory management using ic-stable-structures

pub mod codes;
pub mod config;
pub mod memory;
pub mod storable;

// Re-export key storage structures and functions for easier access
pub use memory::Memory;
pub use storable::{Cbor, CodeKey};
