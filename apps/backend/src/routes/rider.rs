//! Rider app: driver profile, shifts, deliveries and earnings.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_with::rust::double_option;
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

use crate::db::txn::with_txn;
use crate::domain::payout::Payout;
use crate::domain::VehicleType;
use crate::error::{AppError, ProblemDetails};
use crate::extractors::{Driver as DriverRole, RequireRole, ValidatedJson};
use crate::repos::deliveries::Delivery;
use crate::repos::drivers::Driver;
use crate::repos::orders::Order;
use crate::repos::shifts::Shift;
use crate::services::deliveries::{self as delivery_service, EarningsSummary};
use crate::services::{drivers as driver_service, payout as payout_service, shifts as shift_service};
use crate::state::app_state::AppState;

type AsDriver = RequireRole<DriverRole>;

// ----- profile -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDriverRequest {
    pub vehicle_type: VehicleType,
    pub license_plate: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDriverRequest {
    pub vehicle_type: Option<VehicleType>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub license_plate: Option<Option<String>>,
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/profile",
    tag = "rider",
    security(("bearer" = [])),
    request_body = CreateDriverRequest,
    responses(
        (status = 201, body = Driver),
        (status = 409, description = "Profile already exists", body = ProblemDetails),
    )
)]
pub async fn create_profile(
    user: AsDriver,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let body = body.into_inner();

    let driver = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::create_profile(txn, user_id, body.vehicle_type, body.license_plate)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(driver))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/profile",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = Driver), (status = 404, body = ProblemDetails))
)]
pub async fn get_profile(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let driver = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::my_profile(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(driver))
}

#[utoipa::path(
    patch,
    path = "/api/v1/rider/profile",
    tag = "rider",
    security(("bearer" = [])),
    request_body = UpdateDriverRequest,
    responses((status = 200, body = Driver), (status = 404, body = ProblemDetails))
)]
pub async fn update_profile(
    user: AsDriver,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let body = body.into_inner();

    let driver = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::update_profile(txn, user_id, body.vehicle_type, body.license_plate)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(driver))
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/profile/availability",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = Driver), (status = 404, body = ProblemDetails))
)]
pub async fn toggle_availability(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let driver = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::toggle_availability(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(driver))
}

// ----- shifts -----

/// Optional position reported when a shift starts or ends.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ShiftPositionRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShiftHistoryQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/shifts/start",
    tag = "rider",
    security(("bearer" = [])),
    request_body = ShiftPositionRequest,
    responses(
        (status = 201, body = Shift),
        (status = 409, description = "A shift is already running", body = ProblemDetails),
    )
)]
pub async fn start_shift(
    user: AsDriver,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ShiftPositionRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let body = body.into_inner();

    let shift = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            shift_service::start(txn, user_id, body.lat, body.lon)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(shift))
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/shifts/end",
    tag = "rider",
    security(("bearer" = [])),
    request_body = ShiftPositionRequest,
    responses((status = 200, body = Shift), (status = 404, body = ProblemDetails))
)]
pub async fn end_shift(
    user: AsDriver,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ShiftPositionRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let body = body.into_inner();

    let shift = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            shift_service::end(txn, user_id, body.lat, body.lon)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(shift))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/shifts/active",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = Shift), (status = 404, body = ProblemDetails))
)]
pub async fn active_shift(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let shift = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            shift_service::active(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(shift))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/shifts/history",
    tag = "rider",
    security(("bearer" = [])),
    params(ShiftHistoryQuery),
    responses((status = 200, body = Vec<Shift>))
)]
pub async fn shift_history(
    user: AsDriver,
    app_state: web::Data<AppState>,
    query: web::Query<ShiftHistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let limit = query.into_inner().limit;

    let shifts = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            shift_service::history(txn, user_id, limit)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(shifts))
}

// ----- deliveries -----

#[utoipa::path(
    get,
    path = "/api/v1/rider/deliveries/available",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, description = "Ready orders within vehicle range", body = Vec<Order>))
)]
pub async fn available_deliveries(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let dispatch = app_state.config.dispatch.clone();

    let orders = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::available(txn, user_id, &dispatch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/deliveries/accept/{order_id}",
    tag = "rider",
    security(("bearer" = [])),
    params(("order_id" = i64, Path)),
    responses(
        (status = 201, body = Delivery),
        (status = 409, description = "Order already taken or not ready", body = ProblemDetails),
        (status = 422, description = "Out of vehicle range or not on shift", body = ProblemDetails),
    )
)]
pub async fn accept_delivery(
    user: AsDriver,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let order_id = path.into_inner();
    let dispatch = app_state.config.dispatch.clone();

    let delivery = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::accept(txn, user_id, order_id, &dispatch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(delivery))
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/deliveries/{id}/pickup",
    tag = "rider",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Delivery id")),
    responses((status = 200, body = Delivery), (status = 409, body = ProblemDetails))
)]
pub async fn pickup_delivery(
    user: AsDriver,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let delivery_id = path.into_inner();

    let delivery = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::pickup(txn, user_id, delivery_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(delivery))
}

#[utoipa::path(
    post,
    path = "/api/v1/rider/deliveries/{id}/deliver",
    tag = "rider",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Delivery id")),
    responses((status = 200, body = Delivery), (status = 409, body = ProblemDetails))
)]
pub async fn deliver_delivery(
    user: AsDriver,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let delivery_id = path.into_inner();
    let dispatch = app_state.config.dispatch.clone();

    let delivery = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::deliver(txn, user_id, delivery_id, &dispatch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(delivery))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/deliveries/active",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Delivery>))
)]
pub async fn active_deliveries(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let deliveries = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::active(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(deliveries))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/deliveries/history",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Delivery>))
)]
pub async fn delivery_history(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let deliveries = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::history(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(deliveries))
}

// ----- earnings -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayoutQuery {
    /// RFC 3339, defaults to 7 days before `until`
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[param(value_type = Option<String>, format = DateTime)]
    pub since: Option<OffsetDateTime>,
    /// RFC 3339, defaults to now
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[param(value_type = Option<String>, format = DateTime)]
    pub until: Option<OffsetDateTime>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/earnings/summary",
    tag = "rider",
    security(("bearer" = [])),
    responses((status = 200, body = EarningsSummary))
)]
pub async fn earnings_summary(
    user: AsDriver,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let summary = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            delivery_service::earnings_summary(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/rider/earnings/payout",
    tag = "rider",
    security(("bearer" = [])),
    params(PayoutQuery),
    responses((status = 200, body = Payout), (status = 422, body = ProblemDetails))
)]
pub async fn payout(
    user: AsDriver,
    app_state: web::Data<AppState>,
    query: web::Query<PayoutQuery>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let PayoutQuery { since, until } = query.into_inner();
    let payout_config = app_state.config.payout.clone();

    let payout = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            payout_service::payout_for(txn, user_id, since, until, &payout_config)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(payout))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(get_profile))
            .route(web::post().to(create_profile))
            .route(web::patch().to(update_profile)),
    )
    .route("/profile/availability", web::post().to(toggle_availability))
    .route("/shifts/start", web::post().to(start_shift))
    .route("/shifts/end", web::post().to(end_shift))
    .route("/shifts/active", web::get().to(active_shift))
    .route("/shifts/history", web::get().to(shift_history))
    .route("/deliveries/available", web::get().to(available_deliveries))
    .route("/deliveries/active", web::get().to(active_deliveries))
    .route("/deliveries/history", web::get().to(delivery_history))
    .route("/deliveries/accept/{order_id}", web::post().to(accept_delivery))
    .route("/deliveries/{id}/pickup", web::post().to(pickup_delivery))
    .route("/deliveries/{id}/deliver", web::post().to(deliver_delivery))
    .route("/earnings/summary", web::get().to(earnings_summary))
    .route("/earnings/payout", web::get().to(payout));
}
