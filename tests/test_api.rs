// HTTP API tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};

use clinic_backoffice::{
    api::configure,
    data::Record,
    services::Services,
    storage::{Collections, MemoryStore},
};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn services() -> Services {
    let users = MemoryStore::new().with_text_index(vec!["email".to_string()]);
    users
        .insert_many(vec![
            Record::new("p1", at(2024, 3, 1, 9))
                .with_field("user_type", "PATIENT")
                .with_field("email", "ada@clinic.org")
                .with_path("profile.gender", "Female")
                .with_path("profile.password", "hunter2")
                .with_path("profile.twoFA_secret", "JBSWY3DP"),
            Record::new("p2", at(2024, 3, 2, 9))
                .with_field("user_type", "PATIENT")
                .with_field("email", "bayo@clinic.org")
                .with_path("profile.gender", "Male"),
            Record::new("p3", at(2024, 3, 3, 9))
                .with_field("user_type", "PATIENT")
                .with_field("email", "chi@clinic.org")
                .with_path("profile.gender", "Female"),
        ])
        .unwrap();

    let appointments = MemoryStore::new();
    appointments
        .insert_many(vec![
            Record::new("a1", at(2024, 2, 10, 9))
                .with_field("status", "COMPLETED")
                .with_field("patient", "p1"),
            Record::new("a2", at(2024, 3, 10, 9))
                .with_field("status", "CANCELLED")
                .with_field("patient", "p1"),
            Record::new("a3", at(2024, 3, 11, 9))
                .with_field("status", "COMPLETED")
                .with_field("patient", "p2"),
        ])
        .unwrap();

    let lifeguards = MemoryStore::new();
    lifeguards
        .insert(
            Record::new("l1", at(2024, 3, 4, 9))
                .with_field("first_name", "Tunde")
                .with_field("password", "s3cret")
                .with_path("card_details.number", "4111111111111111"),
        )
        .unwrap();

    let collections = Collections::new(Arc::new(users), Arc::new(appointments), Arc::new(lifeguards));

    Services::with_clock(collections, 10, Arc::new(|| Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()))
}

macro_rules! app {
    () => {
        test::init_service(App::new().app_data(web::Data::new(services())).configure(configure)).await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_patient_listing_is_wrapped() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/patients?currentPage=1&pageLimit=2&gender=Female")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Retrieved successfully");
    assert_eq!(body["data"]["totalItems"], 2);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["items"][0]["id"], "p1");
    assert_eq!(body["data"]["items"][1]["id"], "p3");
}

#[actix_web::test]
async fn test_page_below_one_is_rejected() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/patients?currentPage=0")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_missing_patient_is_404() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/patients/nobody").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 404);
}

#[actix_web::test]
async fn test_patient_detail_includes_appointments() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/patients/p1").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["id"], "p1");
    // Newest first
    assert_eq!(body["data"]["appointments"][0]["id"], "a2");
    assert_eq!(body["data"]["appointments"][1]["id"], "a1");
    assert_eq!(body["data"]["appointments"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_patient_credentials_are_never_returned() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/patients?currentPage=1").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    let listed = &body["data"]["items"][0];
    assert_eq!(listed["id"], "p1");
    assert_eq!(listed["profile"], json!({"gender": "Female"}));

    let req = test::TestRequest::get().uri("/api/v1/patients/p1").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["profile"], json!({"gender": "Female"}));
}

#[actix_web::test]
async fn test_lifeguard_detail() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/lifeguards/l1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["data"]["first_name"], "Tunde");
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("card_details").is_none());

    let req = test::TestRequest::get().uri("/api/v1/lifeguards?currentPage=1").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["totalItems"], 1);
    assert!(body["data"]["items"][0].get("password").is_none());

    let req = test::TestRequest::get().uri("/api/v1/lifeguards/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_graph_accepts_snake_case_dates() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/appointments-graph?interval=month&filter=COMPLETED_APPOINTMENTS&start_date=2024-03-01&end_date=2024-04-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(
        body["data"]["data"]["buckets"],
        json!([{"key": "2024-03", "count": 1}])
    );
}

#[actix_web::test]
async fn test_graph_with_scalar_filter() {
    let app = app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/appointments-graph?interval=month&filter=COMPLETED_APPOINTMENTS&startDate=2024-01-01&endDate=2024-04-01")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({
            "interval": "month",
            "data": {
                "filter": "COMPLETED_APPOINTMENTS",
                "buckets": [
                    {"key": "2024-02", "count": 1},
                    {"key": "2024-03", "count": 1},
                ],
            },
        })
    );
}

#[actix_web::test]
async fn test_graph_with_array_filter() {
    let app = app!();

    // filter=["CANCELLED_APPOINTMENTS","ALL"]
    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/appointments-graph?interval=month&filter=%5B%22CANCELLED_APPOINTMENTS%22%2C%22ALL%22%5D&startDate=2024-01-01T00:00:00Z")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: JsonValue = test::read_body_json(resp).await;
    let series = body["data"]["data"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["filter"], "CANCELLED_APPOINTMENTS");
    assert_eq!(series[0]["buckets"], json!([{"key": "2024-03", "count": 1}]));
    assert_eq!(series[1]["filter"], "ALL");
    assert_eq!(series[1]["buckets"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_graph_rejects_malformed_input() {
    let app = app!();

    let bad_filter = test::TestRequest::get()
        .uri("/api/v1/analytics/patients-graph?filter=%5Bbroken")
        .to_request();
    assert_eq!(test::call_service(&app, bad_filter).await.status(), StatusCode::BAD_REQUEST);

    let bad_date = test::TestRequest::get()
        .uri("/api/v1/analytics/patients-graph?startDate=yesterday")
        .to_request();
    assert_eq!(test::call_service(&app, bad_date).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_dashboards() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/dashboard/patients?duration=month").to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["duration"], "month");
    assert_eq!(body["data"]["totalPatients"], 3);
    assert_eq!(body["data"]["newPatients"], 3);

    let req = test::TestRequest::get().uri("/api/v1/dashboard/specialists").to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["totalSpecialists"], 0);
    assert_eq!(body["data"]["percentageVerified"], 0.0);
}

#[actix_web::test]
async fn test_analytics_summaries() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/analytics/appointments").to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["totalAppointments"], 3);
    assert_eq!(body["data"]["cancelledAppointments"], 1);

    let req = test::TestRequest::get().uri("/api/v1/analytics/patients").to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["totalPatients"], 3);
    assert_eq!(body["data"]["newPatientsThisMonth"], 3);
}

#[actix_web::test]
async fn test_settings_endpoints() {
    let app = app!();

    let req = test::TestRequest::get().uri("/api/v1/settings").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post().uri("/api/v1/settings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: JsonValue = test::read_body_json(resp).await;
    assert_eq!(body["data"]["defaults"]["appointment_fee"], 1000);
    assert_eq!(body["data"]["defaults"]["payment_provider"], "Paystack");

    let req = test::TestRequest::patch()
        .uri("/api/v1/settings")
        .set_json(json!({"defaults": {"appointment_fee": 2500}}))
        .to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["message"], "Updated successfully");
    assert_eq!(body["data"]["defaults"]["appointment_fee"], 2500);
    assert_eq!(body["data"]["defaults"]["payment_provider"], "Paystack");

    let req = test::TestRequest::get().uri("/api/v1/settings").to_request();
    let body: JsonValue = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["defaults"]["appointment_fee"], 2500);
}
