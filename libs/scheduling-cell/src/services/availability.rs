// libs/scheduling-cell/src/services/availability.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{AppointmentStatus, ScheduleException, SchedulingError, TimeSlot};
use crate::store::ScheduleStore;
use crate::time::{intervals_overlap, minutes_to_time, time_to_minutes};

pub const DEFAULT_SLOT_MINUTES: i64 = 30;

/// Computes the bookable windows for a doctor on a calendar date from the
/// weekly schedule, per-date exceptions, and existing appointments. Pure
/// read path: every call re-fetches current data and nothing is cached.
pub struct AvailabilityService {
    store: Arc<dyn ScheduleStore>,
    slot_minutes: i64,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            store,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }

    pub fn with_slot_minutes(store: Arc<dyn ScheduleStore>, slot_minutes: i64) -> Self {
        Self {
            store,
            slot_minutes,
        }
    }

    /// Calculate available slots for a specific date.
    ///
    /// An unknown doctor or a weekday without a working schedule is not an
    /// error: both yield an empty list, which callers display as "doctor
    /// does not work this day".
    pub async fn get_available_slots(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> Result<Vec<TimeSlot>, SchedulingError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            SchedulingError::InvalidArgument(format!("Unparseable date: {}", date))
        })?;

        debug!("Calculating available slots for doctor {} on {}", doctor_id, date);

        // Day of week (0 = Sunday, 1 = Monday, etc.)
        let day_of_week = match date.weekday() {
            Weekday::Sun => 0,
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
        };

        let exceptions = self.store.schedule_exceptions(doctor_id, date).await?;
        if exceptions.iter().any(ScheduleException::blocks_entire_day) {
            debug!("Doctor {} has an all-day exception on {}", doctor_id, date);
            return Ok(vec![]);
        }
        if !exceptions.is_empty() {
            // Partial-day exceptions are not carved out of the schedule
            debug!(
                "Ignoring {} partial exception(s) for doctor {} on {}",
                exceptions.len(),
                doctor_id,
                date
            );
        }

        let entries = self.store.weekly_schedule(doctor_id, day_of_week).await?;
        let entry = match entries.into_iter().find(|e| e.is_working_day) {
            Some(entry) => entry,
            None => {
                debug!(
                    "No working schedule for doctor {} on weekday {}",
                    doctor_id, day_of_week
                );
                return Ok(vec![]);
            }
        };

        let booked = self
            .store
            .appointments_on_date(doctor_id, date, &AppointmentStatus::OCCUPYING)
            .await?;

        let opening = time_to_minutes(entry.start_time);
        let closing = time_to_minutes(entry.end_time);
        let break_window = entry
            .break_window()
            .map(|(start, end)| (time_to_minutes(start), time_to_minutes(end)));

        if opening >= closing {
            warn!(
                "Schedule entry {} has a non-positive working window, no slots generated",
                entry.id
            );
        }

        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();

        let mut slots = Vec::new();
        let mut current = opening;

        while current + self.slot_minutes <= closing {
            let slot_end = current + self.slot_minutes;

            // The break test is on the slot's start bound only: a slot that
            // starts before the break and runs into it is still offered.
            let on_break = break_window
                .map_or(false, |(break_start, break_end)| {
                    current >= break_start && current < break_end
                });

            if !on_break {
                let start_at = midnight + Duration::minutes(current);
                let end_at = midnight + Duration::minutes(slot_end);

                let taken = booked.iter().any(|apt| {
                    apt.status.is_occupying()
                        && intervals_overlap(start_at, end_at, apt.scheduled_start, apt.scheduled_end)
                });

                if !taken {
                    slots.push(TimeSlot {
                        start: minutes_to_time(current),
                        end: minutes_to_time(slot_end),
                    });
                }
            }

            current += self.slot_minutes;
        }

        debug!(
            "Found {} available slots for doctor {} on {}",
            slots.len(),
            doctor_id,
            date
        );
        Ok(slots)
    }
}
