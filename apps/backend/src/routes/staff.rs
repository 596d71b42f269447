//! Staff console for city admins, dispatchers, support agents and
//! restaurant admins. Every listing is narrowed to the caller's grants.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::admin::RefundRequest;
use crate::db::txn::with_txn;
use crate::domain::{OrderStatus, UserRole};
use crate::error::{AppError, ProblemDetails};
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::deliveries::Delivery;
use crate::repos::orders::Order;
use crate::repos::restaurants::Restaurant;
use crate::services::access as access_service;
use crate::services::payments::RefundOutcome;
use crate::services::staff::{
    self as staff_service, PendingApprovalCounts, StaffOrderQuery, StaffOrderStats,
    StaffRestaurantQuery,
};
use crate::state::app_state::AppState;

fn caller(user: &CurrentUser) -> (i64, bool) {
    (user.id, user.role == UserRole::Admin)
}

// ----- orders -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffOrderListQuery {
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    pub city_id: Option<i64>,
    pub restaurant_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignDriverRequest {
    pub driver_id: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/orders",
    tag = "staff",
    security(("bearer" = [])),
    params(StaffOrderListQuery),
    responses((status = 200, body = Vec<Order>), (status = 403, body = ProblemDetails))
)]
pub async fn list_orders(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<StaffOrderListQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let q = query.into_inner();
    let query = StaffOrderQuery {
        city_id: q.city_id,
        restaurant_id: q.restaurant_id,
        status: q.status,
        limit: q.limit,
        offset: q.offset,
    };

    let orders = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::list_orders(txn, &scopes, query)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/orders/stats/summary",
    tag = "staff",
    security(("bearer" = [])),
    params(StatsQuery),
    responses((status = 200, body = StaffOrderStats), (status = 403, body = ProblemDetails))
)]
pub async fn order_stats(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let StatsQuery {
        city_id,
        restaurant_id,
    } = query.into_inner();

    let stats = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::order_stats(txn, &scopes, city_id, restaurant_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

#[utoipa::path(
    post,
    path = "/api/v1/staff/orders/{id}/assign-driver",
    tag = "staff",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = AssignDriverRequest,
    responses(
        (status = 201, body = Delivery),
        (status = 403, body = ProblemDetails),
        (status = 409, description = "Order taken or not ready", body = ProblemDetails),
        (status = 422, description = "Driver off shift or out of range", body = ProblemDetails),
    )
)]
pub async fn assign_driver(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<AssignDriverRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let order_id = path.into_inner();
    let driver_id = body.into_inner().driver_id;
    let dispatch = app_state.config.dispatch.clone();

    let delivery = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::assign_driver(txn, &scopes, order_id, driver_id, &dispatch)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(delivery))
}

#[utoipa::path(
    post,
    path = "/api/v1/staff/orders/{id}/refund",
    tag = "staff",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = RefundRequest,
    responses(
        (status = 200, body = RefundOutcome),
        (status = 403, body = ProblemDetails),
        (status = 409, body = ProblemDetails),
    )
)]
pub async fn refund_order(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<RefundRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let order_id = path.into_inner();
    let body = body.into_inner();

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::refund(txn, &scopes, order_id, body.amount_cents, body.reason)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

// ----- restaurants -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffRestaurantListQuery {
    pub city_id: Option<i64>,
    /// Only restaurants awaiting approval
    #[serde(default)]
    pub pending_approval: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub approve: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/restaurants",
    tag = "staff",
    security(("bearer" = [])),
    params(StaffRestaurantListQuery),
    responses((status = 200, body = Vec<Restaurant>), (status = 403, body = ProblemDetails))
)]
pub async fn list_restaurants(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    query: web::Query<StaffRestaurantListQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let q = query.into_inner();
    let query = StaffRestaurantQuery {
        city_id: q.city_id,
        pending_approval: q.pending_approval,
        limit: q.limit,
        offset: q.offset,
    };

    let restaurants = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::list_restaurants(txn, &scopes, query)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurants))
}

#[utoipa::path(
    post,
    path = "/api/v1/staff/restaurants/{id}/approve",
    tag = "staff",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = ReviewRequest,
    responses((status = 200, body = Restaurant), (status = 403, body = ProblemDetails))
)]
pub async fn review_restaurant(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<ReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let restaurant_id = path.into_inner();
    let ReviewRequest { approve, notes } = body.into_inner();

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::review_restaurant(txn, &scopes, restaurant_id, approve, notes)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

#[utoipa::path(
    post,
    path = "/api/v1/staff/restaurants/{id}/active",
    tag = "staff",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = ActiveRequest,
    responses((status = 200, body = Restaurant), (status = 403, body = ProblemDetails))
)]
pub async fn set_restaurant_active(
    user: CurrentUser,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<ActiveRequest>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);
    let restaurant_id = path.into_inner();
    let is_active = body.into_inner().is_active;

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::set_restaurant_active(txn, &scopes, restaurant_id, is_active)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

#[utoipa::path(
    get,
    path = "/api/v1/staff/restaurants/pending-approval/count",
    tag = "staff",
    security(("bearer" = [])),
    responses((status = 200, body = PendingApprovalCounts), (status = 403, body = ProblemDetails))
)]
pub async fn pending_approval_counts(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (user_id, admin) = caller(&user);

    let counts = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            let scopes = access_service::load_scopes(txn, user_id, admin).await?;
            staff_service::pending_approval_counts(txn, &scopes)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(counts))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::get().to(list_orders))
        .route("/orders/stats/summary", web::get().to(order_stats))
        .route("/orders/{id}/assign-driver", web::post().to(assign_driver))
        .route("/orders/{id}/refund", web::post().to(refund_order))
        .route(
            "/restaurants/pending-approval/count",
            web::get().to(pending_approval_counts),
        )
        .route("/restaurants", web::get().to(list_restaurants))
        .route("/restaurants/{id}/approve", web::post().to(review_restaurant))
        .route("/restaurants/{id}/active", web::post().to(set_restaurant_active));
}
