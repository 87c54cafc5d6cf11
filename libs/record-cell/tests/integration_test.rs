use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use record_cell::router::{admin_record_routes, doctor_report_routes};
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

fn admin_app(config: &TestConfig) -> Router {
    admin_record_routes(config.to_arc())
}

fn report_app(config: &TestConfig) -> Router {
    doctor_report_routes(config.to_arc())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn mount_account_lookup(server: &MockServer, user: &TestUser) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", user.role.collection())))
        .and(query_param("id", format!("eq.{}", user.id)))
        .and(query_param("select", "id,permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": user.id, "permissions": user.permissions }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn admin_lists_records() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);
    let patient_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &admin).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .and(query_param("is_deleted", "eq.false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::medical_record_row("rec-1", &patient_id, "appt-1", "rx-1")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/getall")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = admin_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["records"][0]["id"], json!("rec-1"));
}

#[tokio::test]
async fn doctor_without_record_capability_cannot_list() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["view_appointments"]);
    let token = doctor.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &doctor).await;

    let request = Request::builder()
        .method("GET")
        .uri("/getall")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = admin_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn report_assembles_record_prescription_and_consultations() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["download_reports"]);
    let token = doctor.token(&config.jwt_secret);
    let patient_id = Uuid::new_v4().to_string();
    let record_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .and(query_param("id", format!("eq.{}", record_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::medical_record_row(&record_id, &patient_id, "appt-1", "rx-1")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("id", "eq.rx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_row("rx-1", "appt-1", &doctor.id, &patient_id)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_row(&patient_id, "patient@example.com", "Test Patient")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_row(&doctor.id, "doctor@example.com", "Dr. Test", "Neurology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/consultations"))
        .and(query_param("patient_id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "cons-1",
                "patient_id": patient_id,
                "doctor_id": doctor.id,
                "appointment_id": "appt-1",
                "notes": "Follow-up in two weeks",
                "consulted_at": "2026-02-05T16:00:00Z",
                "is_deleted": false,
            }
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(format!("/download-report/{}", record_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = report_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let report = &body["data"];
    assert_eq!(report["record"]["id"], json!(record_id));
    assert_eq!(report["prescription"]["id"], json!("rx-1"));
    assert_eq!(report["patient"]["name"], json!("Test Patient"));
    assert_eq!(report["doctor"]["department"], json!("Neurology"));
    assert_eq!(report["consultations"].as_array().unwrap().len(), 1);
    assert!(report["generated_at"].is_string());
}

#[tokio::test]
async fn report_for_unknown_record_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["download_reports"]);
    let token = doctor.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/download-report/missing")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = report_app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
