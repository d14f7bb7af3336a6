pub mod availability;
pub mod conflict;

pub use availability::AvailabilityService;
pub use conflict::ConflictDetectionService;
