use actix_cors::Cors;
use actix_web::http::header;

/// Build CORS middleware from the configured origins.
///
/// Only `http(s)://` entries are accepted; an empty list falls back to
/// localhost.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let mut allowed: Vec<&str> = origins
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect();

    if allowed.is_empty() {
        allowed = vec!["http://localhost:3000", "http://127.0.0.1:3000"];
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600);

    for origin in allowed {
        cors = cors.allowed_origin(origin);
    }

    cors
}
