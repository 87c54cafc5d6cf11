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

use prescription_cell::router::doctor_prescription_routes;
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

fn app(config: &TestConfig) -> Router {
    doctor_prescription_routes(config.to_arc())
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
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": user.id, "permissions": user.permissions }
        ])))
        .mount(server)
        .await;
}

fn create_request(token: &str, appointment_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/create")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "appointment_id": appointment_id,
                "medicines": [{
                    "name": "Ibuprofen",
                    "dosage": "200mg",
                    "frequency": "2x/day",
                    "duration": "5d",
                }],
                "diagnosis": "Tension headache",
                "advice": "Hydrate, rest",
            })
            .to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn prescription_on_completed_appointment_cascades_one_record() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["create_prescription"]);
    let token = doctor.token(&config.jwt_secret);
    let appointment_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor.id,
            "status": "completed",
        }])))
        .mount(&mock_server)
        .await;

    // No prescription exists for the appointment yet.
    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::prescription_row("rx-1", &appointment_id, &doctor.id, &patient_id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Exactly one cascaded medical-record write.
    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::medical_record_row("rec-1", &patient_id, &appointment_id, "rx-1")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(create_request(&token, &appointment_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["id"], json!("rx-1"));

    mock_server.verify().await;
}

#[tokio::test]
async fn cascade_failure_does_not_fail_the_prescription() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["create_prescription"]);
    let token = doctor.token(&config.jwt_secret);
    let appointment_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor.id,
            "status": "completed",
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::prescription_row("rx-1", &appointment_id, &doctor.id, &patient_id)
        ])))
        .mount(&mock_server)
        .await;

    // The record store is down; the prescription still succeeds.
    Mock::given(method("POST"))
        .and(path("/rest/v1/medical_records"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(create_request(&token, &appointment_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn scheduled_appointment_cannot_be_prescribed_against() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["create_prescription"]);
    let token = doctor.token(&config.jwt_secret);
    let appointment_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": appointment_id,
            "patient_id": Uuid::new_v4().to_string(),
            "doctor_id": doctor.id,
            "status": "scheduled",
        }])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(create_request(&token, &appointment_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["errors"]["appointment_id"].is_string());
}

#[tokio::test]
async fn second_prescription_for_same_appointment_conflicts() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["create_prescription"]);
    let token = doctor.token(&config.jwt_secret);
    let appointment_id = Uuid::new_v4().to_string();
    let patient_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor.id,
            "status": "completed",
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("appointment_id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "rx-existing" }])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(create_request(&token, &appointment_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn foreign_appointment_reads_as_absent() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["create_prescription"]);
    let token = doctor.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &doctor).await;

    // The ownership-filtered lookup finds nothing.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let response = app(&config)
        .oneshot(create_request(&token, "someone-elses-appointment"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn doctor_listing_is_scoped_to_own_prescriptions() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["view_prescriptions"]);
    let token = doctor.token(&config.jwt_secret);
    let patient_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &doctor).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("doctor_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::prescription_row("rx-1", "appt-1", &doctor.id, &patient_id)
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/getall")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["prescriptions"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["data"]["prescriptions"][0]["doctor_id"],
        json!(doctor.id)
    );
}
