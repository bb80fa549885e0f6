// src/backend/storage/memory.rs
use ic_stable_structures::memory_manager::{MemoryId, MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// Memory IDs for stable structures; never reuse or renumber an ID.
const CODES_MEM_ID: MemoryId = MemoryId::new(0);
const CLAIMS_BY_TIME_MEM_ID: MemoryId = MemoryId::new(1);
// Reserve IDs 2-19 for future code indexes
const ADMIN_PRINCIPAL_MEM_ID: MemoryId = MemoryId::new(20);
const BASE_URL_MEM_ID: MemoryId = MemoryId::new(21);
const REWARD_LABEL_MEM_ID: MemoryId = MemoryId::new(22);
const MIN_CYCLES_THRESHOLD_MEM_ID: MemoryId = MemoryId::new(23);

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> = RefCell::new(
        MemoryManager::init(DefaultMemoryImpl::default())
    );
}

/// Get memory instance for a specific MemoryId.
pub fn get_memory(id: MemoryId) -> Memory {
    MEMORY_MANAGER.with(|m| m.borrow().get(id))
}

pub fn get_codes_memory() -> Memory {
    get_memory(CODES_MEM_ID)
}

pub fn get_claims_by_time_memory() -> Memory {
    get_memory(CLAIMS_BY_TIME_MEM_ID)
}

pub fn get_admin_principal_memory() -> Memory {
    get_memory(ADMIN_PRINCIPAL_MEM_ID)
}

pub fn get_base_url_memory() -> Memory {
    get_memory(BASE_URL_MEM_ID)
}

pub fn get_reward_label_memory() -> Memory {
    get_memory(REWARD_LABEL_MEM_ID)
}

pub fn get_min_cycles_threshold_memory() -> Memory {
    get_memory(MIN_CYCLES_THRESHOLD_MEM_ID)
}
