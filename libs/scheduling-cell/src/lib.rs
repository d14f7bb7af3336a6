pub mod models;
pub mod services;
pub mod store;
pub mod time;

// Re-export models and services for external use
pub use models::*;
pub use services::*;
pub use store::{ScheduleStore, SupabaseScheduleStore};
