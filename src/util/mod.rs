pub mod error;
pub mod logger;
pub mod format;
pub mod profit;
pub mod quote_health;
pub mod attention;
pub mod autosave;
pub mod exit_intent;
pub mod index_now;
pub mod structured_data;
