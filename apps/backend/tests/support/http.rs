//! Authenticated request shorthands.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::Value;

pub async fn get<S>(app: &S, uri: &str, auth: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", auth))
        .to_request();
    test::call_service(app, req).await
}

pub async fn post<S>(app: &S, uri: &str, auth: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", auth))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

pub async fn patch<S>(app: &S, uri: &str, auth: &str, body: Value) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::patch()
        .uri(uri)
        .insert_header(("Authorization", auth))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

pub async fn delete<S>(app: &S, uri: &str, auth: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::delete()
        .uri(uri)
        .insert_header(("Authorization", auth))
        .to_request();
    test::call_service(app, req).await
}

/// Assert the status and decode the JSON body.
pub async fn json_ok(resp: ServiceResponse<BoxBody>, status: u16) -> Value {
    let actual = resp.status().as_u16();
    let body = test::read_body(resp).await;
    assert_eq!(
        actual,
        status,
        "unexpected status, body: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("JSON body")
}
