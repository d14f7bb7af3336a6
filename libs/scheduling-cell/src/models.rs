// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc, NaiveDate, NaiveTime};
use std::fmt;

// ==============================================================================
// SCHEDULE MODELS
// ==============================================================================

/// A doctor's recurring availability for one weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyScheduleEntry {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub is_working_day: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start_time: Option<NaiveTime>,
    pub break_end_time: Option<NaiveTime>,
}

impl WeeklyScheduleEntry {
    /// The lunch/break window, when both bounds are set.
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.break_start_time, self.break_end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// A per-date override of the weekly schedule (vacation, day off, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleException {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub exception_date: NaiveDate,
    pub exception_type: String,
    pub is_all_day: bool,
}

impl ScheduleException {
    /// Whether this exception zeroes out the doctor's entire date.
    /// Vacations and days off always do, regardless of the all-day flag.
    pub fn blocks_entire_day(&self) -> bool {
        self.is_all_day
            || self.exception_type == "vacation"
            || self.exception_type == "day_off"
    }
}

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
    NoShow,
}

impl AppointmentStatus {
    /// Statuses that hold a doctor's time for availability and conflict
    /// purposes. Everything else never blocks a slot or a new booking.
    pub const OCCUPYING: [AppointmentStatus; 2] =
        [AppointmentStatus::Scheduled, AppointmentStatus::Confirmed];

    pub fn is_occupying(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Rescheduled => write!(f, "rescheduled"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// How a conflict query selects appointment statuses. The create path counts
/// only occupying appointments; the doctor-created/reschedule path counts
/// everything except cancelled ones. The two shapes are intentionally kept
/// separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Occupying,
    ExceptCancelled,
}

impl StatusFilter {
    pub fn matches(&self, status: &AppointmentStatus) -> bool {
        match self {
            StatusFilter::Occupying => status.is_occupying(),
            StatusFilter::ExceptCancelled => *status != AppointmentStatus::Cancelled,
        }
    }
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

/// A bookable window within a doctor's working hours. Computed fresh on
/// every query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: String, // "HH:MM"
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckReport {
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<Appointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SchedulingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data access error: {0}")]
    DataAccess(String),
}
