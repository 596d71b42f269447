//! Admin console: restaurant approval, order oversight, payments, geofences
//! and driver management.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::txn::with_txn;
use crate::domain::{GeoPoint, OrderStatus, PaymentStatus};
use crate::error::{AppError, ProblemDetails};
use crate::extractors::{Admin, RequireRole, ValidatedJson};
use crate::repos::drivers::Driver;
use crate::repos::geofences::Geofence;
use crate::repos::orders::Order;
use crate::repos::payments::Payment;
use crate::repos::restaurants::Restaurant;
use crate::services::orders::{self as order_service, OrderSummary};
use crate::services::payments::{self as payment_service, PaymentWithRefunds, RefundOutcome};
use crate::services::{
    drivers as driver_service, geofences as geofence_service, restaurants as restaurant_service,
};
use crate::state::app_state::AppState;

type AsAdmin = RequireRole<Admin>;

// ----- restaurants -----

#[derive(Debug, Serialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantListQuery {
    /// Filter on approval state; omit for all restaurants
    pub approved: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/restaurants/pending-approval/count",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, body = CountResponse))
)]
pub async fn pending_approval_count(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let count = with_txn(&app_state, |txn| {
        Box::pin(async move {
            restaurant_service::pending_approval_count(txn)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/restaurants",
    tag = "admin",
    security(("bearer" = [])),
    params(RestaurantListQuery),
    responses((status = 200, body = Vec<Restaurant>))
)]
pub async fn list_restaurants(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    query: web::Query<RestaurantListQuery>,
) -> Result<HttpResponse, AppError> {
    let RestaurantListQuery {
        approved,
        limit,
        offset,
    } = query.into_inner();

    let restaurants = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::admin_list(txn, approved, limit, offset)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurants))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/restaurants/{id}/approve",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Restaurant), (status = 404, body = ProblemDetails))
)]
pub async fn approve_restaurant(
    user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let admin_id = user.id;
    let id = path.into_inner();

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::approve(txn, admin_id, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/restaurants/{id}/toggle-active",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Restaurant), (status = 404, body = ProblemDetails))
)]
pub async fn toggle_restaurant(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::toggle_active(txn, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

// ----- orders -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub restaurant_id: Option<i64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RefundRequest {
    /// Defaults to the remaining refundable amount
    pub amount_cents: Option<i64>,
    pub reason: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders/stats/summary",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, body = OrderSummary))
)]
pub async fn order_summary(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let summary = with_txn(&app_state, |txn| {
        Box::pin(async move { order_service::summary(txn).await.map_err(AppError::from) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "admin",
    security(("bearer" = [])),
    params(OrderListQuery),
    responses((status = 200, body = Vec<Order>))
)]
pub async fn list_orders(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse, AppError> {
    let OrderListQuery {
        status,
        restaurant_id,
        limit,
        offset,
    } = query.into_inner();

    let orders = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::admin_list(txn, status, restaurant_id, limit, offset)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/orders/{id}/refund",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = RefundRequest,
    responses(
        (status = 200, body = RefundOutcome),
        (status = 404, body = ProblemDetails),
        (status = 409, description = "Payment not captured", body = ProblemDetails),
        (status = 422, description = "Amount exceeds what is refundable", body = ProblemDetails),
    )
)]
pub async fn refund_order(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<RefundRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            payment_service::refund_order(txn, order_id, body.amount_cents, body.reason)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

// ----- payments -----

#[utoipa::path(
    get,
    path = "/api/v1/admin/payments/{id}",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Payment id")),
    responses((status = 200, body = PaymentWithRefunds), (status = 404, body = ProblemDetails))
)]
pub async fn get_payment(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payment_id = path.into_inner();

    let payment = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            payment_service::get_with_refunds(txn, payment_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(payment))
}

async fn set_payment_status(
    app_state: web::Data<AppState>,
    payment_id: i64,
    next: PaymentStatus,
) -> Result<HttpResponse, AppError> {
    let payment = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            payment_service::set_status(txn, payment_id, next)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(payment))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/payments/{id}/authorize",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Payment id")),
    responses((status = 200, body = Payment), (status = 409, body = ProblemDetails))
)]
pub async fn authorize_payment(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    set_payment_status(app_state, path.into_inner(), PaymentStatus::Authorized).await
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/payments/{id}/capture",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Payment id")),
    responses((status = 200, body = Payment), (status = 409, body = ProblemDetails))
)]
pub async fn capture_payment(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    set_payment_status(app_state, path.into_inner(), PaymentStatus::Captured).await
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/payments/{id}/fail",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Payment id")),
    responses((status = 200, body = Payment), (status = 409, body = ProblemDetails))
)]
pub async fn fail_payment(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    set_payment_status(app_state, path.into_inner(), PaymentStatus::Failed).await
}

// ----- geofences -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGeofenceRequest {
    pub name: String,
    /// Ring of `[lat, lon]` pairs, at least three points
    #[schema(value_type = Vec<Vec<f64>>)]
    pub polygon: Vec<[f64; 2]>,
}

impl CreateGeofenceRequest {
    fn points(&self) -> Vec<GeoPoint> {
        self.polygon
            .iter()
            .map(|[lat, lon]| GeoPoint::new(*lat, *lon))
            .collect()
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/geofences",
    tag = "admin",
    security(("bearer" = [])),
    request_body = CreateGeofenceRequest,
    responses((status = 201, body = Geofence), (status = 422, body = ProblemDetails))
)]
pub async fn create_geofence(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateGeofenceRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let points = body.points();
    let name = body.name;

    let fence = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            geofence_service::create(txn, &name, &points)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(fence))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/geofences",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Geofence>))
)]
pub async fn list_geofences(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let fences = with_txn(&app_state, |txn| {
        Box::pin(async move { geofence_service::list(txn).await.map_err(AppError::from) })
    })
    .await?;

    Ok(HttpResponse::Ok().json(fences))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/geofences/{id}/toggle-active",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Geofence id")),
    responses((status = 200, body = Geofence), (status = 404, body = ProblemDetails))
)]
pub async fn toggle_geofence(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let fence = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            geofence_service::toggle_active(txn, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(fence))
}

// ----- drivers -----

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EligibleQuery {
    pub distance_km: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminDriverUpdate {
    pub hourly_rate_cents: Option<i64>,
    pub is_active: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/drivers/eligible",
    tag = "admin",
    security(("bearer" = [])),
    params(EligibleQuery),
    responses(
        (status = 200, description = "Available drivers whose vehicle covers the distance", body = Vec<Driver>),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn eligible_drivers(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    query: web::Query<EligibleQuery>,
) -> Result<HttpResponse, AppError> {
    let distance_km = query.into_inner().distance_km;
    let dispatch = app_state.config.dispatch.clone();

    let drivers = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::eligible_for(txn, distance_km, &dispatch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(drivers))
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/drivers/{id}",
    tag = "admin",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Driver id")),
    request_body = AdminDriverUpdate,
    responses(
        (status = 200, body = Driver),
        (status = 404, body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn update_driver(
    _user: AsAdmin,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<AdminDriverUpdate>,
) -> Result<HttpResponse, AppError> {
    let driver_id = path.into_inner();
    let body = body.into_inner();

    let driver = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            driver_service::admin_update(txn, driver_id, body.hourly_rate_cents, body.is_active)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(driver))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/restaurants/pending-approval/count",
        web::get().to(pending_approval_count),
    )
    .route("/restaurants", web::get().to(list_restaurants))
    .route("/restaurants/{id}/approve", web::post().to(approve_restaurant))
    .route("/restaurants/{id}/toggle-active", web::patch().to(toggle_restaurant))
    .route("/orders/stats/summary", web::get().to(order_summary))
    .route("/orders", web::get().to(list_orders))
    .route("/orders/{id}/refund", web::post().to(refund_order))
    .route("/payments/{id}", web::get().to(get_payment))
    .route("/payments/{id}/authorize", web::post().to(authorize_payment))
    .route("/payments/{id}/capture", web::post().to(capture_payment))
    .route("/payments/{id}/fail", web::post().to(fail_payment))
    .service(
        web::resource("/geofences")
            .route(web::get().to(list_geofences))
            .route(web::post().to(create_geofence)),
    )
    .route("/geofences/{id}/toggle-active", web::patch().to(toggle_geofence))
    .route("/drivers/eligible", web::get().to(eligible_drivers))
    .route("/drivers/{id}", web::patch().to(update_driver));
}
