use std::sync::Arc;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, query_param};

use prakriti_cell::router::prakriti_routes;
use prakriti_cell::models::QuestionBank;
use shared_config::AppConfig;
use shared_utils::test_utils::{TestConfig, TestUser, JwtTestUtils, MockSupabaseResponses};

fn create_test_app(config: &AppConfig) -> Router {
    let bank = Arc::new(QuestionBank::standard().unwrap());
    prakriti_routes(Arc::new(config.clone()), bank)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_list_questions_in_order() {
    let app = create_test_app(&TestConfig::default().to_app_config());

    let response = app.oneshot(get_request("/assessment/questions", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 12);
    assert_eq!(body["questions"][0]["id"], "q1");
    assert_eq!(body["questions"][0]["category"], "physical");
    assert_eq!(body["questions"][0]["options"]["vata"]["weight"], 3);
    assert_eq!(body["questions"][11]["id"], "q12");
}

#[tokio::test]
async fn test_classify_is_public_and_pure() {
    let app = create_test_app(&TestConfig::default().to_app_config());

    let request = json_request(
        "POST",
        "/assessment/classify",
        None,
        json!({ "responses": { "q3": "pitta", "q12": "kapha", "q404": "vata" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["vata_percentage"], 0);
    assert_eq!(body["pitta_percentage"], 40);
    assert_eq!(body["kapha_percentage"], 60);
    assert_eq!(body["dominant_dosha"], "kapha");
    assert_eq!(body["constitution"], "Kapha Constitution");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_classify_rejects_unknown_dosha_value() {
    let app = create_test_app(&TestConfig::default().to_app_config());

    let request = json_request(
        "POST",
        "/assessment/classify",
        None,
        json!({ "responses": { "q1": "agni" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_dosha_description() {
    let app = create_test_app(&TestConfig::default().to_app_config());

    let response = app.clone().oneshot(get_request("/doshas/pitta", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Pitta");
    assert_eq!(body["element"], "Fire + Water");

    let response = app.oneshot(get_request("/doshas/agni", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_profile_requires_token() {
    let app = create_test_app(&TestConfig::default().to_app_config());

    let request = json_request(
        "POST",
        "/prakriti-profiles",
        None,
        json!({ "responses": { "q1": "vata" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_profile_rejects_expired_token() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(&config);
    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_expired_token(&user, &config.supabase_jwt_secret);

    let request = json_request(
        "POST",
        "/prakriti-profiles",
        Some(&token),
        json!({ "responses": { "q1": "vata" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_profile_success() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/prakriti_profiles"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::prakriti_profile_response(&user.id)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = json_request(
        "POST",
        "/prakriti-profiles",
        Some(&token),
        json!({ "responses": { "q1": "vata" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["patient_id"], user.id);
    assert_eq!(body["dominant_dosha"], "vata");
    assert_eq!(body["constitution"], "Vata Constitution");

    let received = mock_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(sent["patient_id"], user.id);
    assert_eq!(sent["vata_percentage"], 100);
    assert_eq!(sent["responses"]["q1"], "vata");
}

#[tokio::test]
async fn test_create_profile_requires_known_answers() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/prakriti_profiles"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = json_request(
        "POST",
        "/prakriti-profiles",
        Some(&token),
        json!({ "responses": { "q404": "vata" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "validation_failed");
}

#[tokio::test]
async fn test_create_profile_store_failure() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/prakriti_profiles"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockSupabaseResponses::error_response("relation does not exist", "42P01"),
        ))
        .mount(&mock_server)
        .await;

    let request = json_request(
        "POST",
        "/prakriti-profiles",
        Some(&token),
        json!({ "responses": { "q1": "kapha" } }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_get_own_profile() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/prakriti_profiles"))
        .and(query_param("patient_id", format!("eq.{}", user.id).as_str()))
        .and(query_param("order", "assessment_date.desc"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::prakriti_profile_response(&user.id)
        ])))
        .mount(&mock_server)
        .await;

    let uri = format!("/prakriti-profiles/{}", user.id);
    let response = app.oneshot(get_request(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["patient_id"], user.id);
    assert_eq!(body["vata_percentage"], 100);
}

#[tokio::test]
async fn test_get_profile_not_found() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/prakriti_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let uri = format!("/prakriti-profiles/{}", user.id);
    let response = app.oneshot(get_request(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patient_cannot_read_other_profile() {
    let config = TestConfig::default().to_app_config();
    let app = create_test_app(&config);

    let user = TestUser::patient("patient@example.com");
    let other = TestUser::patient("other@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let uri = format!("/prakriti-profiles/{}", other.id);
    let response = app.oneshot(get_request(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_practitioner_can_read_patient_profile() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(mock_server.uri()).to_app_config();
    let app = create_test_app(&config);

    let practitioner = TestUser::practitioner("vaidya@example.com");
    let patient = TestUser::patient("patient@example.com");
    let token = JwtTestUtils::create_test_token(&practitioner, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/prakriti_profiles"))
        .and(query_param("patient_id", format!("eq.{}", patient.id).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::prakriti_profile_response(&patient.id)
        ])))
        .mount(&mock_server)
        .await;

    let uri = format!("/prakriti-profiles/{}", patient.id);
    let response = app.oneshot(get_request(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["patient_id"], patient.id);
}
