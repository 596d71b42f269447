use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details;
use food_backend::domain::UserRole;
use food_backend::repos::users;
use serde_json::Value;

use crate::support::auth::bearer;
use crate::support::factory::seed_user;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn me_requires_bearer_scheme() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    for header in ["Token abc", "Bearer", "Bearer a b"] {
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", header))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, "UNAUTHORIZED_MISSING_BEARER", StatusCode::UNAUTHORIZED)
            .await;
    }
    Ok(())
}

#[actix_web::test]
async fn deactivated_account_is_locked_out() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let user = seed_user(&db, UserRole::Customer).await;
    let app = create_test_app(state.clone()).await;
    let auth = bearer(user.id, UserRole::Customer, &state.security);

    let req = test::TestRequest::delete()
        .uri("/api/v1/customer/profile")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "ACCOUNT_DISABLED", StatusCode::FORBIDDEN).await;
    Ok(())
}

#[actix_web::test]
async fn role_is_read_from_database() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = state.db().expect("test db").clone();
    let user = seed_user(&db, UserRole::Customer).await;
    let email = user.email.clone().expect("seeded email");
    let app = create_test_app(state.clone()).await;

    // token still says customer
    let auth = bearer(user.id, UserRole::Customer, &state.security);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/restaurants/pending-approval/count")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "INSUFFICIENT_ROLE", StatusCode::FORBIDDEN).await;

    let (promoted, created) =
        users::upsert_admin(&db, &email, "not-a-real-hash".to_string(), None, None).await?;
    assert!(!created);
    assert_eq!(promoted.role, UserRole::Admin);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/restaurants/pending-approval/count")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
    Ok(())
}
