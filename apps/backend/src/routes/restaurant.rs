//! Restaurant owner app: profile, business hours, menu, order workflow and
//! analytics. Every handler is limited to restaurants the caller owns.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

use crate::db::txn::with_txn;
use crate::domain::OrderStatus;
use crate::error::{AppError, ProblemDetails};
use crate::extractors::{RequireRole, RestaurantOwner, ValidatedJson};
use crate::repos::menu::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::repos::orders::Order;
use crate::repos::restaurants::{BusinessHour, Restaurant, RestaurantUpdate};
use crate::services::analytics::{self, RestaurantAnalytics};
use crate::services::restaurants::{self as restaurant_service, NewRestaurant};
use crate::services::{menu as menu_service, orders as order_service};
use crate::state::app_state::AppState;

type AsOwner = RequireRole<RestaurantOwner>;

// ----- profile -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub city_id: Option<i64>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cuisine_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub city_id: Option<Option<i64>>,
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    pub address: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub lat: Option<Option<f64>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub lon: Option<Option<f64>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cuisine_type: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl From<UpdateRestaurantRequest> for RestaurantUpdate {
    fn from(req: UpdateRestaurantRequest) -> Self {
        Self {
            city_id: req.city_id,
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            lat: req.lat,
            lon: req.lon,
            cuisine_type: req.cuisine_type,
            description: req.description,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/profile",
    tag = "restaurant",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Restaurant>))
)]
pub async fn list_restaurants(
    user: AsOwner,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurants = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::list_owned(txn, owner_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurants))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/profile",
    tag = "restaurant",
    security(("bearer" = [])),
    request_body = CreateRestaurantRequest,
    responses((status = 201, body = Restaurant), (status = 422, body = ProblemDetails))
)]
pub async fn create_restaurant(
    user: AsOwner,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateRestaurantRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let body = body.into_inner();
    let input = NewRestaurant {
        city_id: body.city_id,
        name: body.name,
        phone: body.phone,
        email: body.email,
        address: body.address,
        lat: body.lat,
        lon: body.lon,
        cuisine_type: body.cuisine_type,
        description: body.description,
    };
    let commission_rate = app_state.config.commission_default_rate;

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::create(txn, owner_id, input, commission_rate)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(restaurant))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/profile/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Restaurant), (status = 404, body = ProblemDetails))
)]
pub async fn get_restaurant(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let id = path.into_inner();

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::get_owned(txn, owner_id, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

#[utoipa::path(
    patch,
    path = "/api/v1/restaurant/profile/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, body = Restaurant),
        (status = 404, body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn update_restaurant(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateRestaurantRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let id = path.into_inner();
    let update = RestaurantUpdate::from(body.into_inner());

    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::update(txn, owner_id, id, update)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

// ----- business hours -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHoursRequest {
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i16,
    /// `HH:MM`, 24h
    pub open_time: String,
    pub close_time: String,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateHoursRequest {
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/business-hours/restaurant/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Vec<BusinessHour>), (status = 404, body = ProblemDetails))
)]
pub async fn list_hours(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurant_id = path.into_inner();

    let hours = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::list_hours(txn, owner_id, restaurant_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(hours))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/business-hours/restaurant/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    request_body = CreateHoursRequest,
    responses(
        (status = 201, body = BusinessHour),
        (status = 409, description = "Day already configured", body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn create_hours(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<CreateHoursRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurant_id = path.into_inner();
    let body = body.into_inner();

    let hours = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::create_hours(
                txn,
                owner_id,
                restaurant_id,
                body.day_of_week,
                body.open_time,
                body.close_time,
                body.is_closed,
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(hours))
}

#[utoipa::path(
    patch,
    path = "/api/v1/restaurant/business-hours/{hour_id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("hour_id" = i64, Path)),
    request_body = UpdateHoursRequest,
    responses(
        (status = 200, body = BusinessHour),
        (status = 404, body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn update_hours(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateHoursRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let hour_id = path.into_inner();
    let body = body.into_inner();

    let hours = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::update_hours(
                txn,
                owner_id,
                hour_id,
                body.open_time,
                body.close_time,
                body.is_closed,
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(hours))
}

#[utoipa::path(
    delete,
    path = "/api/v1/restaurant/business-hours/{hour_id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("hour_id" = i64, Path)),
    responses((status = 204), (status = 404, body = ProblemDetails))
)]
pub async fn delete_hours(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let hour_id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::delete_hours(txn, owner_id, hour_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ----- menu -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Must be positive
    pub price_cents: i64,
    pub category: Option<String>,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
    pub image_url: Option<String>,
}

fn available_by_default() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub price_cents: Option<i64>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    pub is_available: Option<bool>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/menu/restaurant/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Vec<MenuItem>), (status = 403, body = ProblemDetails))
)]
pub async fn list_menu(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurant_id = path.into_inner();

    let items = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::owner_menu(txn, owner_id, restaurant_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/menu",
    tag = "restaurant",
    security(("bearer" = [])),
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, body = MenuItem),
        (status = 403, description = "Restaurant owned by someone else", body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn create_menu_item(
    user: AsOwner,
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateMenuItemRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let body = body.into_inner();
    let input = MenuItemCreate {
        restaurant_id: body.restaurant_id,
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        category: body.category,
        is_available: body.is_available,
        image_url: body.image_url,
    };

    let item = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::create(txn, owner_id, input)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(item))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/menu/{item_id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("item_id" = i64, Path)),
    responses(
        (status = 200, body = MenuItem),
        (status = 403, body = ProblemDetails),
        (status = 404, body = ProblemDetails),
    )
)]
pub async fn get_menu_item(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let item_id = path.into_inner();

    let item = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::owner_item(txn, owner_id, item_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    patch,
    path = "/api/v1/restaurant/menu/{item_id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("item_id" = i64, Path)),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, body = MenuItem),
        (status = 403, body = ProblemDetails),
        (status = 404, body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn update_menu_item(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateMenuItemRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let item_id = path.into_inner();
    let body = body.into_inner();
    let update = MenuItemUpdate {
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        category: body.category,
        is_available: body.is_available,
        image_url: body.image_url,
    };

    let item = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::update(txn, owner_id, item_id, update)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/restaurant/menu/{item_id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("item_id" = i64, Path)),
    responses(
        (status = 204),
        (status = 403, body = ProblemDetails),
        (status = 404, body = ProblemDetails),
    )
)]
pub async fn delete_menu_item(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let item_id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::delete(txn, owner_id, item_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ----- orders -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderStatusQuery {
    pub status: Option<OrderStatus>,
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/orders/restaurant/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id"), OrderStatusQuery),
    responses((status = 200, body = Vec<Order>), (status = 404, body = ProblemDetails))
)]
pub async fn list_orders(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<OrderStatusQuery>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurant_id = path.into_inner();
    let status = query.into_inner().status;

    let orders = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::list_for_restaurant(txn, owner_id, restaurant_id, status)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/orders/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 404, body = ProblemDetails))
)]
pub async fn get_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let order_id = path.into_inner();

    let order = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::get_for_owner(txn, owner_id, order_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(order))
}

async fn advance_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    order_id: i64,
    next: OrderStatus,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let order = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::advance(txn, owner_id, order_id, next)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/confirm",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 409, body = ProblemDetails))
)]
pub async fn confirm_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    advance_order(user, app_state, path.into_inner(), OrderStatus::Confirmed).await
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/preparing",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 409, body = ProblemDetails))
)]
pub async fn preparing_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    advance_order(user, app_state, path.into_inner(), OrderStatus::Preparing).await
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/ready",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 409, body = ProblemDetails))
)]
pub async fn ready_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    advance_order(user, app_state, path.into_inner(), OrderStatus::Ready).await
}

/// Pickup orders only; delivery orders are completed by the driver.
#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/complete",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 409, body = ProblemDetails))
)]
pub async fn complete_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    advance_order(user, app_state, path.into_inner(), OrderStatus::Delivered).await
}

#[utoipa::path(
    post,
    path = "/api/v1/restaurant/orders/{id}/cancel",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 409, body = ProblemDetails))
)]
pub async fn cancel_order(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    advance_order(user, app_state, path.into_inner(), OrderStatus::Cancelled).await
}

// ----- analytics -----

#[utoipa::path(
    get,
    path = "/api/v1/restaurant/analytics/restaurant/{id}",
    tag = "restaurant",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = RestaurantAnalytics), (status = 404, body = ProblemDetails))
)]
pub async fn restaurant_analytics(
    user: AsOwner,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let owner_id = user.id;
    let restaurant_id = path.into_inner();

    let report = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            analytics::for_restaurant(txn, owner_id, restaurant_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(report))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(list_restaurants))
            .route(web::post().to(create_restaurant)),
    )
    .service(
        web::resource("/profile/{id}")
            .route(web::get().to(get_restaurant))
            .route(web::patch().to(update_restaurant)),
    )
    .service(
        web::resource("/business-hours/restaurant/{id}")
            .route(web::get().to(list_hours))
            .route(web::post().to(create_hours)),
    )
    .service(
        web::resource("/business-hours/{hour_id}")
            .route(web::patch().to(update_hours))
            .route(web::delete().to(delete_hours)),
    )
    .route("/menu", web::post().to(create_menu_item))
    .route("/menu/restaurant/{id}", web::get().to(list_menu))
    .service(
        web::resource("/menu/{item_id}")
            .route(web::get().to(get_menu_item))
            .route(web::patch().to(update_menu_item))
            .route(web::delete().to(delete_menu_item)),
    )
    .route("/orders/restaurant/{id}", web::get().to(list_orders))
    .route("/orders/{id}", web::get().to(get_order))
    .route("/orders/{id}/confirm", web::post().to(confirm_order))
    .route("/orders/{id}/preparing", web::post().to(preparing_order))
    .route("/orders/{id}/ready", web::post().to(ready_order))
    .route("/orders/{id}/complete", web::post().to(complete_order))
    .route("/orders/{id}/cancel", web::post().to(cancel_order))
    .route("/analytics/restaurant/{id}", web::get().to(restaurant_analytics));
}
