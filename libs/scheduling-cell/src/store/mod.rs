pub mod supabase;

pub use supabase::SupabaseScheduleStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, ScheduleException, SchedulingError, StatusFilter,
    WeeklyScheduleEntry,
};

/// Read contract the scheduling services depend on. Implementations own the
/// query shape; services own the semantics. Failures must surface as
/// `SchedulingError::DataAccess`, never as an empty result.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Recurring schedule entries for one weekday (0 = Sunday .. 6 = Saturday).
    async fn weekly_schedule(
        &self,
        doctor_id: Uuid,
        day_of_week: i32,
    ) -> Result<Vec<WeeklyScheduleEntry>, SchedulingError>;

    /// All exceptions recorded for the doctor on the given date.
    async fn schedule_exceptions(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleException>, SchedulingError>;

    /// Appointments whose scheduled start falls on the given date, limited
    /// to the given statuses.
    async fn appointments_on_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, SchedulingError>;

    /// Appointments overlapping [start, end), filtered by status shape and
    /// optionally excluding one appointment (the one being rescheduled).
    async fn appointments_overlapping(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: StatusFilter,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError>;
}
