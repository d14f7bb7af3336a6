// libs/scheduling-cell/tests/conflict_test.rs
use assert_matches::assert_matches;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::{method, path}};

use scheduling_cell::models::{SchedulingError, StatusFilter};
use scheduling_cell::services::ConflictDetectionService;
use scheduling_cell::store::SupabaseScheduleStore;
use shared_config::AppConfig;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

struct TestSetup {
    conflicts: ConflictDetectionService,
    mock_server: MockServer,
    doctor_id: Uuid,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;

        let config = AppConfig {
            supabase_url: mock_server.uri(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: String::new(),
        };

        let store = Arc::new(SupabaseScheduleStore::new(&config));

        Self {
            conflicts: ConflictDetectionService::new(store),
            mock_server,
            doctor_id: Uuid::new_v4(),
        }
    }

    async fn mock_appointments(&self, rows: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/appointments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.mock_server)
            .await;
    }

    fn appointment_row(&self, id: Uuid, start: &str, end: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": self.doctor_id,
            "scheduled_start": start,
            "scheduled_end": end,
            "status": status
        })
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 16, hour, minute, 0).unwrap()
}

// ==============================================================================
// CREATE PATH
// ==============================================================================

#[tokio::test]
async fn test_partial_overlap_is_a_conflict() {
    let setup = TestSetup::new().await;
    setup
        .mock_appointments(json!([setup.appointment_row(
            Uuid::new_v4(),
            "2025-06-16T10:00:00Z",
            "2025-06-16T10:30:00Z",
            "confirmed"
        )]))
        .await;

    let conflict = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(10, 15), at(10, 45))
        .await
        .unwrap();

    assert!(conflict);
}

#[tokio::test]
async fn test_adjacent_appointment_is_not_a_conflict() {
    let setup = TestSetup::new().await;
    setup
        .mock_appointments(json!([setup.appointment_row(
            Uuid::new_v4(),
            "2025-06-16T10:30:00Z",
            "2025-06-16T11:00:00Z",
            "confirmed"
        )]))
        .await;

    // Candidate ends exactly where the booking starts
    let conflict = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(10, 0), at(10, 30))
        .await
        .unwrap();

    assert!(!conflict);
}

#[tokio::test]
async fn test_cancelled_appointment_never_conflicts() {
    let setup = TestSetup::new().await;
    setup
        .mock_appointments(json!([setup.appointment_row(
            Uuid::new_v4(),
            "2025-06-16T10:00:00Z",
            "2025-06-16T10:30:00Z",
            "cancelled"
        )]))
        .await;

    let create = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(10, 0), at(10, 30))
        .await
        .unwrap();
    let reschedule = setup
        .conflicts
        .has_reschedule_conflict(setup.doctor_id, at(10, 0), at(10, 30), None)
        .await
        .unwrap();

    assert!(!create);
    assert!(!reschedule);
}

// ==============================================================================
// STATUS SHAPE ASYMMETRY
// ==============================================================================

#[tokio::test]
async fn test_completed_blocks_reschedule_path_but_not_create_path() {
    let setup = TestSetup::new().await;
    setup
        .mock_appointments(json!([setup.appointment_row(
            Uuid::new_v4(),
            "2025-06-16T10:00:00Z",
            "2025-06-16T10:30:00Z",
            "completed"
        )]))
        .await;

    // Create path counts only scheduled/confirmed
    let create = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(10, 0), at(10, 30))
        .await
        .unwrap();
    assert!(!create);

    // Reschedule path counts everything except cancelled
    let reschedule = setup
        .conflicts
        .has_reschedule_conflict(setup.doctor_id, at(10, 0), at(10, 30), None)
        .await
        .unwrap();
    assert!(reschedule);
}

// ==============================================================================
// RESCHEDULE SELF-EXCLUSION
// ==============================================================================

#[tokio::test]
async fn test_rescheduled_appointment_does_not_conflict_with_itself() {
    let setup = TestSetup::new().await;
    let appointment_id = Uuid::new_v4();
    setup
        .mock_appointments(json!([setup.appointment_row(
            appointment_id,
            "2025-06-16T10:00:00Z",
            "2025-06-16T10:30:00Z",
            "scheduled"
        )]))
        .await;

    let conflict = setup
        .conflicts
        .has_reschedule_conflict(setup.doctor_id, at(10, 0), at(10, 30), Some(appointment_id))
        .await
        .unwrap();

    assert!(!conflict);
}

// ==============================================================================
// DETAILED REPORT
// ==============================================================================

#[tokio::test]
async fn test_check_conflicts_reports_colliding_appointments() {
    let setup = TestSetup::new().await;
    let appointment_id = Uuid::new_v4();
    setup
        .mock_appointments(json!([setup.appointment_row(
            appointment_id,
            "2025-06-16T10:00:00Z",
            "2025-06-16T10:30:00Z",
            "scheduled"
        )]))
        .await;

    let report = setup
        .conflicts
        .check_conflicts(setup.doctor_id, at(10, 15), at(10, 45), StatusFilter::Occupying, None)
        .await
        .unwrap();

    assert!(report.has_conflict);
    assert_eq!(report.conflicting_appointments.len(), 1);
    assert_eq!(report.conflicting_appointments[0].id, appointment_id);
}

// ==============================================================================
// FAILURE MODES
// ==============================================================================

#[tokio::test]
async fn test_inverted_range_is_invalid_argument() {
    let setup = TestSetup::new().await;

    let result = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(11, 0), at(10, 0))
        .await;

    assert_matches!(result, Err(SchedulingError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_store_failure_is_never_treated_as_no_conflict() {
    let setup = TestSetup::new().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connection reset"))
        .mount(&setup.mock_server)
        .await;

    let result = setup
        .conflicts
        .has_conflict(setup.doctor_id, at(10, 0), at(10, 30))
        .await;

    assert_matches!(result, Err(SchedulingError::DataAccess(_)));
}
