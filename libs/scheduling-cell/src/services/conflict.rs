// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Appointment, ConflictCheckReport, SchedulingError, StatusFilter};
use crate::store::ScheduleStore;
use crate::time::intervals_overlap;

/// Advisory pre-check for the appointment write path. Answers whether a
/// candidate [start, end) window collides with an existing appointment for
/// the doctor. Read-only: the authoritative double-booking guard is the
/// storage-level constraint, this check exists to reject early with a
/// friendly error. A negative answer is not a reservation.
pub struct ConflictDetectionService {
    store: Arc<dyn ScheduleStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    /// Check for appointment conflicts for a doctor at a specific time,
    /// returning the colliding appointments.
    pub async fn check_conflicts(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: StatusFilter,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<ConflictCheckReport, SchedulingError> {
        if start >= end {
            return Err(SchedulingError::InvalidArgument(
                "Start time must be before end time".to_string(),
            ));
        }

        debug!(
            "Checking conflicts for doctor {} from {} to {}",
            doctor_id, start, end
        );

        let candidates = self
            .store
            .appointments_overlapping(doctor_id, start, end, filter, exclude_appointment_id)
            .await?;

        // Re-apply the filters on the fetched rows; the store query is an
        // optimization, not the arbiter.
        let conflicting_appointments: Vec<Appointment> = candidates
            .into_iter()
            .filter(|apt| filter.matches(&apt.status))
            .filter(|apt| exclude_appointment_id != Some(apt.id))
            .filter(|apt| {
                intervals_overlap(start, end, apt.scheduled_start, apt.scheduled_end)
            })
            .collect();

        let has_conflict = !conflicting_appointments.is_empty();
        if has_conflict {
            warn!(
                "Conflict detected for doctor {} - {} overlapping appointment(s)",
                doctor_id,
                conflicting_appointments.len()
            );
        }

        Ok(ConflictCheckReport {
            has_conflict,
            conflicting_appointments,
        })
    }

    /// Create path: only scheduled and confirmed appointments occupy the
    /// window.
    pub async fn has_conflict(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, SchedulingError> {
        let report = self
            .check_conflicts(doctor_id, start, end, StatusFilter::Occupying, None)
            .await?;

        Ok(report.has_conflict)
    }

    /// Doctor-created and reschedule path: every non-cancelled appointment
    /// blocks, minus the appointment being moved when an id is given.
    pub async fn has_reschedule_conflict(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<bool, SchedulingError> {
        let report = self
            .check_conflicts(
                doctor_id,
                start,
                end,
                StatusFilter::ExceptCancelled,
                exclude_appointment_id,
            )
            .await?;

        Ok(report.has_conflict)
    }
}
