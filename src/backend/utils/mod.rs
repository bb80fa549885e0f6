pub mod crypto;
pub mod guards;
pub mod logging;
pub mod runtime;
pub mod time;
