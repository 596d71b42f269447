use actix_web::test;
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn openapi_document_is_public() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/openapi.json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let doc: Value = test::read_body_json(resp).await;
    assert!(doc["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
    assert!(doc["paths"]["/api/v1/customer/orders"].is_object());
    assert!(doc["paths"]["/api/v1/rider/deliveries/accept/{order_id}"]["post"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    Ok(())
}
