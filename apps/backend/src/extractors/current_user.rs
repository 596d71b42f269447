use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::claims::Claims;
use crate::auth::jwt::verify_access_token;
use crate::db::require_db;
use crate::domain::UserRole;
use crate::error::AppError;
use crate::middleware::jwt_extract::extract_bearer_from_header;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The authenticated, active user behind the request.
///
/// Claims come from request extensions when `JwtExtract` ran, otherwise the
/// bearer token is verified here. The role is read back from the database so
/// a role change takes effect before the token expires.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
    pub email: Option<String>,
}

pub(crate) fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))
}

fn claims_for(req: &HttpRequest, state: &AppState) -> Result<Claims, AppError> {
    if let Some(claims) = req.extensions().get::<Claims>() {
        return Ok(claims.clone());
    }
    let token = extract_bearer_from_header(req.headers().get(header::AUTHORIZATION))?;
    verify_access_token(&token, &state.security)
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = app_state(&req)?.clone();
            let claims = claims_for(&req, &state)?;
            let user_id = claims.user_id()?;

            let db = require_db(&state)?;
            let user = users::find_by_id(db, user_id)
                .await?
                .ok_or_else(AppError::forbidden_user_not_found)?;

            if !user.is_active {
                return Err(AppError::account_disabled());
            }

            Ok(CurrentUser {
                id: user.id,
                role: user.role,
                email: user.email,
            })
        })
    }
}
