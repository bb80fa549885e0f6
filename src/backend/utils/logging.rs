// src/backend/utils/logging.rs
// Canister debug log with a level prefix. Falls back to stdout off-wasm so
// service code can be exercised by native unit tests.

pub fn emit(level: &str, message: &str) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::println!("{}: {}", level, message);
    #[cfg(not(target_arch = "wasm32"))]
    println!("{}: {}", level, message);
}

macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("INFO", &format!($($arg)*))
    };
}

macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("WARN", &format!($($arg)*))
    };
}

macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::utils::logging::emit("ERROR", &format!($($arg)*))
    };
}

pub(crate) use log_error;
pub(crate) use log_info;
pub(crate) use log_warn;
