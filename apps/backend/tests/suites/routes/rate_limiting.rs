// Rate limiting on the auth scope
//
// Uses the production auth limiter settings against a stub handler.

use std::net::SocketAddr;
use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{test, web, App, HttpResponse, Result};
use food_backend::middleware::rate_limit::auth_rate_limit_config;
use food_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};

async fn ok_handler() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({"status": "ok"})))
}

fn client_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40_000))
}

#[actix_web::test]
async fn auth_limit_allows_five_per_minute() -> Result<(), Box<dyn std::error::Error>> {
    let backend = InMemoryBackend::builder().build();
    let rate_limiter = RateLimiter::builder(backend, auth_rate_limit_config().build())
        .add_headers()
        .build();

    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .service(
                web::scope("/api/v1/auth")
                    .wrap(rate_limiter)
                    .route("/login", web::post().to(ok_handler)),
            ),
    )
    .await;

    for i in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr(client_addr())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200, "request {} should pass", i + 1);
        assert!(resp.headers().contains_key("x-ratelimit-remaining"));
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(client_addr())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 429);

    Ok(())
}

#[actix_web::test]
async fn limit_resets_after_window() -> Result<(), Box<dyn std::error::Error>> {
    let backend = InMemoryBackend::builder().build();
    let input = SimpleInputFunctionBuilder::new(Duration::from_millis(10), 1)
        .path_key()
        .build();
    let rate_limiter = RateLimiter::builder(backend, input).add_headers().build();

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .wrap(rate_limiter)
            .route("/ping", web::get().to(ok_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/ping").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    let req = test::TestRequest::get().uri("/ping").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 429);

    tokio::time::sleep(Duration::from_millis(20)).await;

    let req = test::TestRequest::get().uri("/ping").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);

    Ok(())
}
