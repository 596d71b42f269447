use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Order, cart and profile payloads are small; anything larger is refused.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body extractor that reports failures as `BAD_REQUEST` problem
/// details. An empty body reads as `{}`, so action endpoints such as
/// `POST /orders/{id}/confirm` accept a bare request.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Field name from serde's "missing field `x`" message. The name comes from
/// the request type, never from client input.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Client-facing description of a parse failure. Values from the body are
/// never echoed back.
fn describe(error: &serde_json::Error) -> String {
    match error.classify() {
        Category::Syntax => format!(
            "Malformed JSON at line {}, column {}",
            error.line(),
            error.column()
        ),
        Category::Eof => "Request body ended before the JSON was complete".to_string(),
        Category::Data => match missing_field(&error.to_string()) {
            Some(field) => format!("Field `{field}` is required"),
            None => format!(
                "A field has the wrong type or value near line {}, column {}",
                error.line(),
                error.column()
            ),
        },
        Category::Io => "Request body could not be read".to_string(),
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"{}");
    }
    serde_json::from_slice(body)
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let path = req.path().to_string();
        let mut payload = payload.take();

        Box::pin(async move {
            let trace_id = trace_ctx::trace_id();

            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(trace_id = %trace_id, path = %path, error = %e, "request body read failed");
                    AppError::bad_request(ErrorCode::BadRequest, "Request body could not be read")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    warn!(trace_id = %trace_id, path = %path, limit = MAX_BODY_BYTES, "request body too large");
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        format!("Request body exceeds {} KiB", MAX_BODY_BYTES / 1024),
                    ));
                }
                body.extend_from_slice(&chunk);
            }

            if !body.is_empty() {
                if let Some(ct) = content_type.as_deref().filter(|ct| !is_json(ct)) {
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        format!("Expected a JSON body, got content type '{ct}'"),
                    ));
                }
            }

            parse::<T>(&body).map(ValidatedJson).map_err(|e| {
                debug!(
                    trace_id = %trace_id,
                    path = %path,
                    error = %Redacted(&e.to_string()),
                    body_bytes = body.len(),
                    "request body rejected"
                );
                AppError::bad_request(ErrorCode::BadRequest, describe(&e))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct AddItem {
        menu_item_id: i64,
        #[serde(default = "one")]
        quantity: i32,
    }

    #[derive(Debug, Default, Deserialize)]
    struct Confirm {
        #[serde(default)]
        note: Option<String>,
    }

    fn one() -> i32 {
        1
    }

    async fn extract<T: DeserializeOwned + 'static>(
        req: TestRequest,
    ) -> Result<ValidatedJson<T>, AppError> {
        let (req, mut payload) = req.to_http_parts();
        ValidatedJson::<T>::from_request(&req, &mut payload).await
    }

    #[actix_web::test]
    async fn parses_a_cart_line() {
        let req = TestRequest::post()
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .set_payload(r#"{"menu_item_id": 7}"#);
        let item = extract::<AddItem>(req).await.expect("valid body");
        assert_eq!(item.menu_item_id, 7);
        assert_eq!(item.quantity, 1);
    }

    #[actix_web::test]
    async fn empty_body_reads_as_empty_object() {
        let confirm = extract::<Confirm>(TestRequest::post()).await.expect("empty body");
        assert!(confirm.note.is_none());
    }

    #[actix_web::test]
    async fn non_json_content_type_is_rejected() {
        let req = TestRequest::post()
            .insert_header((CONTENT_TYPE, "text/plain"))
            .set_payload("menu_item_id=7");
        let err = extract::<AddItem>(req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    #[actix_web::test]
    async fn oversized_body_is_rejected() {
        let note = "x".repeat(MAX_BODY_BYTES);
        let req = TestRequest::post()
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload(format!(r#"{{"note": "{note}"}}"#));
        assert!(extract::<Confirm>(req).await.is_err());
    }

    #[test]
    fn names_the_missing_field() {
        let err = parse::<AddItem>(br#"{"quantity": 2}"#).unwrap_err();
        assert_eq!(describe(&err), "Field `menu_item_id` is required");
    }

    #[test]
    fn does_not_echo_bad_values() {
        let err = parse::<AddItem>(br#"{"menu_item_id": "secret-value"}"#).unwrap_err();
        let detail = describe(&err);
        assert!(detail.contains("wrong type"), "{detail}");
        assert!(!detail.contains("secret-value"));
    }

    #[test]
    fn syntax_errors_carry_a_position() {
        let err = parse::<AddItem>(b"{\"menu_item_id\": }").unwrap_err();
        assert!(describe(&err).starts_with("Malformed JSON at line 1"));
    }

    #[test]
    fn recognises_json_media_types() {
        assert!(is_json("application/json"));
        assert!(is_json("Application/JSON; charset=utf-8"));
        assert!(is_json("application/problem+json"));
        assert!(!is_json("text/json-ish"));
        assert!(!is_json("multipart/form-data"));
    }
}
