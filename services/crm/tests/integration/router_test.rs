use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use crm_core::middleware::X_REQUEST_ID;
use crm_testing::auth::MockAuth;
use crm_testing::body::{json_body, json_request_body};

use crate::helpers::test_app;

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&MockAuth>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth.header_value());
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            json_request_body(&value)
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn create_lead(app: &Router, auth: &MockAuth, email: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/api/leads",
        Some(auth),
        Some(json!({ "name": "Ada", "email": email, "phone": "555-0100" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn should_answer_health_probes_with_request_id() {
    let (app, _dir) = test_app().await;

    for path in ["/healthz", "/readyz"] {
        let response = send(&app, Method::GET, path, None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }
}

#[tokio::test]
async fn should_reject_missing_or_bad_bearer_token() {
    let (app, _dir) = test_app().await;

    let response = send(&app, Method::GET, "/api/leads", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/leads")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_create_lead_with_camel_case_body() {
    let (app, _dir) = test_app().await;
    let rep = MockAuth::rep("r1");

    let lead = create_lead(&app, &rep, "ada@example.com").await;
    assert_eq!(lead["ownerId"], "r1");
    assert_eq!(lead["status"], "New");
    assert_eq!(lead["phone"], "555-0100");
    assert!(lead["createdAt"].as_str().unwrap().ends_with('Z'));
    assert!(lead["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn should_report_duplicate_lead_as_bad_request() {
    let (app, _dir) = test_app().await;
    let rep = MockAuth::rep("r1");
    create_lead(&app, &rep, "dup@example.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/leads",
        Some(&rep),
        Some(json!({ "name": "Ada", "email": "dup@example.com" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "LEAD_ALREADY_EXISTS");
}

#[tokio::test]
async fn should_reject_malformed_and_non_numeric_bodies() {
    let (app, _dir) = test_app().await;
    let rep = MockAuth::rep("r1");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/leads")
        .header(header::AUTHORIZATION, rep.header_value())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "INVALID_BODY");

    let response = send(
        &app,
        Method::POST,
        "/api/opportunities",
        Some(&rep),
        Some(json!({ "title": "Deal", "value": "lots" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_enforce_ownership_over_http() {
    let (app, _dir) = test_app().await;
    let owner = MockAuth::rep("r1");
    let other = MockAuth::rep("r2");
    let lead = create_lead(&app, &owner, "ada@example.com").await;
    let uri = format!("/api/leads/{}", lead["id"].as_str().unwrap());

    let listed = json_body(send(&app, Method::GET, "/api/leads", Some(&other), None).await).await;
    assert_eq!(listed, json!([]));

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(&other),
        Some(json!({ "name": "Hijacked", "email": "x@example.com", "status": "New" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, Some(&MockAuth::admin()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Lead deleted successfully" })
    );

    let response = send(&app, Method::DELETE, &uri, Some(&MockAuth::admin()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_convert_lead_and_reflect_in_stats() {
    let (app, _dir) = test_app().await;
    let rep = MockAuth::rep("r1");
    let lead = create_lead(&app, &rep, "ada@example.com").await;
    let lead_id = lead["id"].as_str().unwrap();

    let response = send(
        &app,
        Method::POST,
        &format!("/api/leads/{lead_id}/convert"),
        Some(&rep),
        Some(json!({ "title": "Deal", "value": 100 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let opportunity = json_body(response).await;
    assert_eq!(opportunity["stage"], "Discovery");
    assert_eq!(opportunity["value"], 100.0);
    assert_eq!(opportunity["leadId"], lead_id);
    assert_eq!(opportunity["ownerId"], "r1");

    let stats = json_body(
        send(&app, Method::GET, "/api/dashboard/stats", Some(&rep), None).await,
    )
    .await;
    assert_eq!(
        stats,
        json!({
            "totalLeads": 1,
            "totalOpportunities": 1,
            "totalValue": 100.0,
            "leadsByStatus": { "Qualified": 1 },
            "opportunitiesByStage": { "Discovery": 1 },
        })
    );
}

#[tokio::test]
async fn should_register_login_and_use_token() {
    let (app, _dir) = test_app().await;

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Alice Rep", "email": "alice@crm.com", "password": "rep123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registered = json_body(response).await;
    assert_eq!(registered["user"]["role"], "rep");
    assert!(registered["user"].get("passwordHash").is_none());

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@crm.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@crm.com", "password": "rep123" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_owned();

    let request = Request::builder()
        .uri("/api/leads")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_reserve_user_endpoints_for_admin() {
    let (app, _dir) = test_app().await;

    let response = send(&app, Method::GET, "/api/users", Some(&MockAuth::manager()), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::GET, "/api/users", Some(&MockAuth::admin()), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));

    let response = send(
        &app,
        Method::DELETE,
        "/api/users/nobody",
        Some(&MockAuth::admin()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
