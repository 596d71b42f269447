use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use db_infra::db::{DbKind, RuntimeEnv};
use food_backend::config::AppConfig;
use food_backend::infra::state::build_state;
use food_backend::middleware::cors::cors_middleware;
use food_backend::middleware::rate_limit::{api_rate_limit_config, auth_rate_limit_config};
use food_backend::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use food_backend::routes;
use food_backend::state::security_config::SecurityConfig;
use food_backend::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables come from the runtime (docker env_file, or a
    // sourced .env for local dev).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let security_config = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let origins = config.cors_allowed_origins.clone();

    let app_state = match build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(DbKind::Postgres)
        .with_security(security_config)
        .with_config(config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(%host, port, "starting food backend");

    let data = web::Data::new(app_state);

    // Shared across workers so limits hold per process, not per worker.
    let auth_backend = InMemoryBackend::builder().build();
    let api_backend = InMemoryBackend::builder().build();

    HttpServer::new(move || {
        let auth_limiter =
            RateLimiter::builder(auth_backend.clone(), auth_rate_limit_config().build())
                .add_headers()
                .build();
        let api_limiter =
            RateLimiter::builder(api_backend.clone(), api_rate_limit_config().build())
                .add_headers()
                .build();

        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(SecurityHeaders)
            .wrap(cors_middleware(&origins))
            .app_data(data.clone())
            .configure(routes::configure_extractors)
            .configure(routes::health::configure_routes)
            .service(
                web::scope("/api/v1/auth")
                    .wrap(auth_limiter)
                    .configure(routes::auth::configure_routes),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(api_limiter)
                    .configure(routes::configure_api),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
