use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::txn::with_txn;
use crate::error::{AppError, ProblemDetails};
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::users::User;
use crate::services::auth::{self, AuthOutcome, LoginIdentifier, SignupInput};
use crate::services::users as user_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `customer` (default), `restaurant_owner` or `driver`
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `bearer`
    pub token_type: String,
    pub user: User,
}

impl From<AuthOutcome> for TokenResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            access_token: outcome.tokens.access_token,
            refresh_token: outcome.tokens.refresh_token,
            token_type: "bearer".to_string(),
            user: outcome.user,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, body = TokenResponse),
        (status = 409, description = "Email or phone taken", body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn signup(
    app_state: web::Data<AppState>,
    body: ValidatedJson<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = SignupInput {
        email: body.email,
        phone: body.phone,
        password: body.password,
        first_name: body.first_name,
        last_name: body.last_name,
        role: body.role,
    };
    let security = app_state.security.clone();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move { auth::signup(txn, input, &security).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(TokenResponse::from(outcome)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Unknown identifier or wrong password", body = ProblemDetails),
        (status = 403, description = "Account disabled", body = ProblemDetails),
    )
)]
pub async fn login(
    app_state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let identifier = match (body.email, body.phone) {
        (Some(email), _) => LoginIdentifier::Email(email),
        (None, Some(phone)) => LoginIdentifier::Phone(phone),
        (None, None) => {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "Either email or phone is required",
            ))
        }
    };
    let password = body.password;
    let security = app_state.security.clone();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move { auth::login(txn, identifier, &password, &security).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(outcome)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, body = ProblemDetails),
    )
)]
pub async fn refresh(
    app_state: web::Data<AppState>,
    body: ValidatedJson<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    let token = body.into_inner().refresh_token;
    let security = app_state.security.clone();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move { auth::refresh(txn, &token, &security).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, body = ProblemDetails),
    )
)]
pub async fn me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user.id;
    let user = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            user_service::get_profile(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/refresh", web::post().to(refresh))
        .route("/me", web::get().to(me));
}
