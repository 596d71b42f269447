use actix_web::test;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn api_responses_carry_security_headers() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let headers = resp.headers();

    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("referrer-policy"));
    Ok(())
}

#[actix_web::test]
async fn error_responses_carry_security_headers() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/orders")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
    Ok(())
}
