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

use doctor_cell::router::admin_doctor_routes;
use shared_utils::test_utils::{MockStoreResponses, TestConfig, TestUser};

fn app(config: &TestConfig) -> Router {
    admin_doctor_routes(config.to_arc())
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

#[tokio::test]
async fn admin_creates_a_doctor() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);
    let doctor_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &admin).await;

    // Duplicate pre-check finds nothing.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::doctor_row(&doctor_id, "new.doc@example.com", "Dr. New", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Dr. New",
                "email": "new.doc@example.com",
                "phone": "4155550123",
                "password": "s3cure-pass",
                "department": "Cardiology",
                "specialization": "Interventional",
                "license_number": "LIC-2001",
                "permissions": ["view_appointments"],
            })
            .to_string(),
        ))
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], json!(doctor_id));
}

#[tokio::test]
async fn duplicate_license_number_conflicts() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &admin).await;

    // Another doctor already carries this license number.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "existing" }])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Dr. Dup",
                "email": "dup.doc@example.com",
                "phone": "4155550123",
                "password": "s3cure-pass",
                "department": "Cardiology",
                "specialization": "Interventional",
                "license_number": "LIC-1001",
                "permissions": [],
            })
            .to_string(),
        ))
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn changing_license_to_a_taken_one_conflicts() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);
    let doctor_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &admin).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_row(&doctor_id, "doc@example.com", "Dr. Old", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    // Another doctor already carries the incoming license number; the
    // pre-check must fire before any PATCH reaches the store.
    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("select", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "other" }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/update/{}", doctor_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "license_number": "LIC-9999" }).to_string()))
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    mock_server.verify().await;
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &admin).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/get/missing-doctor")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_soft_deletes_and_deactivates() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let admin = TestUser::admin();
    let token = admin.token(&config.jwt_secret);
    let doctor_id = Uuid::new_v4().to_string();

    mount_account_lookup(&mock_server, &admin).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_row(&doctor_id, "doc@example.com", "Dr. Gone", "Cardiology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": doctor_id,
            "name": "Dr. Gone",
            "email": "doc@example.com",
            "phone": "4155550173",
            "department": "Cardiology",
            "specialization": "General Practice",
            "license_number": "LIC-1001",
            "status": "inactive",
            "permissions": [],
            "avatar_url": null,
            "is_deleted": true,
            "created_by": admin.id,
            "created_by_model": "Admin",
            "created_at": "2026-01-10T09:00:00Z",
            "updated_by": admin.id,
            "updated_by_model": "Admin",
            "updated_at": "2026-02-10T09:00:00Z",
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/delete/{}", doctor_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    mock_server.verify().await;
}

#[tokio::test]
async fn doctor_without_view_capability_cannot_list_doctors() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());

    let doctor = TestUser::doctor(&["view_appointments"]);
    let token = doctor.token(&config.jwt_secret);

    mount_account_lookup(&mock_server, &doctor).await;

    let request = Request::builder()
        .method("GET")
        .uri("/get-all")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app(&config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
