use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use serde_json::Value;

use crate::common::assert_trace_id_matches;
use crate::support::auth::{bearer, expired_bearer};
use crate::support::factory::seed_user;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn missing_bearer_is_problem_details() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/profile")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "UNAUTHORIZED_MISSING_BEARER", StatusCode::UNAUTHORIZED).await;
    Ok(())
}

#[actix_web::test]
async fn garbage_token_is_invalid_jwt() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/profile")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "UNAUTHORIZED_INVALID_JWT", StatusCode::UNAUTHORIZED).await;
    Ok(())
}

#[actix_web::test]
async fn expired_token_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let user = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/profile")
        .insert_header(("Authorization", expired_bearer(user.id, UserRole::Customer, &state.security)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "UNAUTHORIZED_EXPIRED_JWT", StatusCode::UNAUTHORIZED).await;
    Ok(())
}

#[actix_web::test]
async fn wrong_role_is_forbidden() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;

    for uri in [
        "/api/v1/admin/orders",
        "/api/v1/rider/profile",
        "/api/v1/restaurant/profile",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bearer(customer.id, UserRole::Customer, &state.security)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, "INSUFFICIENT_ROLE", StatusCode::FORBIDDEN).await;
    }
    Ok(())
}

#[actix_web::test]
async fn token_for_deleted_user_is_forbidden() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/profile")
        .insert_header(("Authorization", bearer(987_654, UserRole::Customer, &state.security)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "FORBIDDEN_USER_NOT_FOUND", StatusCode::FORBIDDEN).await;
    Ok(())
}

#[actix_web::test]
async fn not_found_carries_trace_id() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/restaurants/424242")
        .insert_header(("Authorization", bearer(customer.id, UserRole::Customer, &state.security)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let trace_header = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-trace-id header");
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["code"], "RESTAURANT_NOT_FOUND");
    assert_eq!(body["status"], 404);
    assert!(body["type"].as_str().is_some_and(|t| !t.is_empty()));
    assert_trace_id_matches(&body, &trace_header);
    Ok(())
}

#[actix_web::test]
async fn malformed_path_and_query_are_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let customer = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(customer.id, UserRole::Customer, &state.security);

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/orders/not-a-number")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/customer/restaurants?limit=lots")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST).await;

    Ok(())
}

#[actix_web::test]
async fn malformed_json_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST).await;
    Ok(())
}

#[actix_web::test]
async fn form_encoded_login_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("email=a%40b.de&password=secret")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST).await;
    Ok(())
}
