use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::{unique_email, unique_phone};
use serde_json::{json, Value};

use crate::support::{build_test_state, create_test_app};

async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn signup_defaults_to_customer() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;
    let email = unique_email("signup");

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({
            "email": email.to_uppercase(),
            "password": "correct horse",
            "first_name": "Ada",
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["refresh_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password_hash").is_none());
    Ok(())
}

#[actix_web::test]
async fn signup_accepts_driver_and_owner_roles() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    for role in ["driver", "restaurant_owner"] {
        let resp = post_json(
            &app,
            "/api/v1/auth/signup",
            json!({ "phone": unique_phone(), "password": "long enough", "role": role }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["role"], role);
    }
    Ok(())
}

#[actix_web::test]
async fn signup_rejects_admin_and_unknown_roles() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    for role in ["admin", "superuser"] {
        let resp = post_json(
            &app,
            "/api/v1/auth/signup",
            json!({ "email": unique_email("role"), "password": "long enough", "role": role }),
        )
        .await;
        assert_problem_details(resp, "INVALID_ROLE", StatusCode::UNPROCESSABLE_ENTITY).await;
    }
    Ok(())
}

#[actix_web::test]
async fn signup_validates_input() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": unique_email("short"), "password": "short" }),
    )
    .await;
    assert_problem_details(resp, "INVALID_PASSWORD", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": "nobody-at-example", "password": "long enough" }),
    )
    .await;
    assert_problem_details(resp, "INVALID_EMAIL", StatusCode::UNPROCESSABLE_ENTITY).await;

    let resp = post_json(&app, "/api/v1/auth/signup", json!({ "password": "long enough" })).await;
    assert_problem_details(resp, "VALIDATION_ERROR", StatusCode::UNPROCESSABLE_ENTITY).await;

    Ok(())
}

#[actix_web::test]
async fn duplicate_email_and_phone_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;
    let email = unique_email("dup");
    let phone = unique_phone();

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": email, "phone": phone, "password": "long enough" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": format!("  {email} "), "password": "long enough" }),
    )
    .await;
    assert_problem_details(resp, "UNIQUE_EMAIL", StatusCode::CONFLICT).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "phone": phone, "password": "long enough" }),
    )
    .await;
    assert_problem_details(resp, "UNIQUE_PHONE", StatusCode::CONFLICT).await;

    Ok(())
}

#[actix_web::test]
async fn login_refresh_and_me() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;
    let email = unique_email("login");

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": email, "password": "correct horse" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": "correct horse" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let login: Value = test::read_body_json(resp).await;
    let access = login["access_token"].as_str().unwrap().to_string();
    let refresh = login["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {access}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["email"], email);
    assert_eq!(me["id"], login["user"]["id"]);

    let resp = post_json(&app, "/api/v1/auth/refresh", json!({ "refresh_token": refresh })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: Value = test::read_body_json(resp).await;
    assert_eq!(refreshed["user"]["id"], login["user"]["id"]);

    // an access token is not a refresh token
    let resp = post_json(&app, "/api/v1/auth/refresh", json!({ "refresh_token": access })).await;
    assert_problem_details(resp, "UNAUTHORIZED_INVALID_JWT", StatusCode::UNAUTHORIZED).await;

    Ok(())
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;
    let email = unique_email("wrongpw");

    let resp = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": email, "password": "correct horse" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": "battery staple" }),
    )
    .await;
    let wrong_password =
        assert_problem_details(resp, "INVALID_CREDENTIALS", StatusCode::UNAUTHORIZED).await;

    let resp = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "email": unique_email("ghost"), "password": "correct horse" }),
    )
    .await;
    let unknown_user =
        assert_problem_details(resp, "INVALID_CREDENTIALS", StatusCode::UNAUTHORIZED).await;

    assert_eq!(wrong_password.detail, unknown_user.detail);
    Ok(())
}
