use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentStatus, ScheduleException, SchedulingError, StatusFilter,
    WeeklyScheduleEntry,
};
use crate::store::ScheduleStore;

/// PostgREST-backed implementation of the schedule read contract.
pub struct SupabaseScheduleStore {
    supabase: Arc<SupabaseClient>,
    auth_token: Option<String>,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig) -> Self {
        let auth_token = if config.supabase_service_role_key.is_empty() {
            None
        } else {
            Some(config.supabase_service_role_key.clone())
        };

        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            auth_token,
        }
    }

    /// Query with a caller-supplied bearer token instead of the service key.
    pub fn with_auth_token(config: &AppConfig, auth_token: &str) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            auth_token: Some(auth_token.to_string()),
        }
    }

    async fn fetch_rows<T>(&self, path: &str) -> Result<Vec<T>, SchedulingError>
    where
        T: DeserializeOwned,
    {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, self.auth_token.as_deref(), None)
            .await
            .map_err(|e| SchedulingError::DataAccess(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()
            .map_err(|e| SchedulingError::DataAccess(format!("Failed to parse rows: {}", e)))
    }

    fn status_list(statuses: &[AppointmentStatus]) -> String {
        statuses
            .iter()
            .map(|status| status.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn weekly_schedule(
        &self,
        doctor_id: Uuid,
        day_of_week: i32,
    ) -> Result<Vec<WeeklyScheduleEntry>, SchedulingError> {
        let path = format!(
            "/rest/v1/doctor_weekly_schedules?doctor_id=eq.{}&day_of_week=eq.{}&order=start_time.asc",
            doctor_id, day_of_week
        );

        self.fetch_rows(&path).await
    }

    async fn schedule_exceptions(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleException>, SchedulingError> {
        let path = format!(
            "/rest/v1/schedule_exceptions?doctor_id=eq.{}&exception_date=eq.{}",
            doctor_id, date
        );

        self.fetch_rows(&path).await
    }

    async fn appointments_on_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let start_of_day = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_day = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&scheduled_start=gte.{}&scheduled_start=lte.{}&status=in.({})&order=scheduled_start.asc",
            doctor_id,
            start_of_day.to_rfc3339(),
            end_of_day.to_rfc3339(),
            Self::status_list(statuses)
        );

        self.fetch_rows(&path).await
    }

    async fn appointments_overlapping(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: StatusFilter,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let mut query_parts = vec![
            format!("doctor_id=eq.{}", doctor_id),
            format!("scheduled_start=lt.{}", end.to_rfc3339()),
            format!("scheduled_end=gt.{}", start.to_rfc3339()),
        ];

        query_parts.push(match filter {
            StatusFilter::Occupying => {
                format!("status=in.({})", Self::status_list(&AppointmentStatus::OCCUPYING))
            }
            StatusFilter::ExceptCancelled => {
                format!("status=neq.{}", AppointmentStatus::Cancelled)
            }
        });

        if let Some(exclude_id) = exclude_appointment_id {
            query_parts.push(format!("id=neq.{}", exclude_id));
        }

        let path = format!(
            "/rest/v1/appointments?{}&order=scheduled_start.asc",
            query_parts.join("&")
        );

        self.fetch_rows(&path).await
    }
}
