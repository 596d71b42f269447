//! Customer app: profile, browsing, cart and orders.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_with::rust::double_option;
use time::macros::format_description;
use time::Date;
use utoipa::{IntoParams, ToSchema};

use crate::db::txn::with_txn;
use crate::domain::{OrderType, PaymentProvider};
use crate::error::{AppError, ProblemDetails};
use crate::errors::ErrorCode;
use crate::extractors::{Customer, RequireRole, ValidatedJson};
use crate::repos::menu::MenuItem;
use crate::repos::orders::Order;
use crate::repos::payments::Payment;
use crate::repos::restaurants::{BusinessHour, Restaurant};
use crate::repos::users::{User, UserProfileUpdate};
use crate::services::cart::{self as cart_service, CartView, QuoteView, RequestedItem};
use crate::services::orders::{self as order_service, PlaceOrder};
use crate::services::{
    menu as menu_service, payments as payment_service, restaurants as restaurant_service,
    users as user_service,
};
use crate::state::app_state::AppState;

type AsCustomer = RequireRole<Customer>;

// ----- profile -----

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    /// `YYYY-MM-DD`
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<String>>,
}

fn parse_birth_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| {
        AppError::invalid(
            ErrorCode::ValidationError,
            "date_of_birth must be YYYY-MM-DD",
        )
    })
}

impl UpdateProfileRequest {
    fn into_update(self) -> Result<UserProfileUpdate, AppError> {
        let date_of_birth = match self.date_of_birth {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(parse_birth_date(&raw)?)),
        };
        Ok(UserProfileUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            date_of_birth,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/profile",
    tag = "customer",
    security(("bearer" = [])),
    responses((status = 200, body = User), (status = 403, body = ProblemDetails))
)]
pub async fn get_profile(
    user: AsCustomer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let profile = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            user_service::get_profile(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    patch,
    path = "/api/v1/customer/profile",
    tag = "customer",
    security(("bearer" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, body = User),
        (status = 409, description = "Phone taken", body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn update_profile(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    body: ValidatedJson<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let update = body.into_inner().into_update()?;

    let profile = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            user_service::update_profile(txn, user_id, update)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customer/profile",
    tag = "customer",
    security(("bearer" = [])),
    responses((status = 204, description = "Account deactivated"))
)]
pub async fn delete_profile(
    user: AsCustomer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            user_service::deactivate(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ----- restaurants and menus -----

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantSearchQuery {
    /// Matches name or cuisine type, case-insensitively
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/restaurants",
    tag = "customer",
    security(("bearer" = [])),
    params(RestaurantSearchQuery),
    responses((status = 200, body = Vec<Restaurant>))
)]
pub async fn list_restaurants(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    query: web::Query<RestaurantSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let RestaurantSearchQuery {
        search,
        limit,
        offset,
    } = query.into_inner();
    let search = search.filter(|s| !s.trim().is_empty());

    let restaurants = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::list_public(txn, search, limit, offset)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurants))
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/restaurants/{id}",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Restaurant), (status = 404, body = ProblemDetails))
)]
pub async fn get_restaurant(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let restaurant = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::get_public(txn, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(restaurant))
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/restaurants/{id}/hours",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id")),
    responses((status = 200, body = Vec<BusinessHour>), (status = 404, body = ProblemDetails))
)]
pub async fn restaurant_hours(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let hours = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            restaurant_service::public_hours(txn, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(hours))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub available_only: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/menu/restaurant/{id}",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Restaurant id"), MenuQuery),
    responses((status = 200, body = Vec<MenuItem>), (status = 404, body = ProblemDetails))
)]
pub async fn restaurant_menu(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse, AppError> {
    let restaurant_id = path.into_inner();
    let MenuQuery {
        category,
        available_only,
    } = query.into_inner();

    let items = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::public_menu(txn, restaurant_id, category.as_deref(), available_only)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/menu/item/{id}",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Menu item id")),
    responses((status = 200, body = MenuItem), (status = 404, body = ProblemDetails))
)]
pub async fn menu_item(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            menu_service::public_item(txn, id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(item))
}

// ----- cart -----

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub menu_item_id: i64,
    /// 1..=99
    pub quantity: i32,
}

impl From<ItemRequest> for RequestedItem {
    fn from(item: ItemRequest) -> Self {
        Self {
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub restaurant_id: i64,
    pub order_type: OrderType,
    pub items: Vec<ItemRequest>,
    pub customer_lat: Option<f64>,
    pub customer_lon: Option<f64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/cart",
    tag = "customer",
    security(("bearer" = [])),
    responses((status = 200, body = CartView))
)]
pub async fn get_cart(
    user: AsCustomer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let cart = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            cart_service::view(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(cart))
}

#[utoipa::path(
    post,
    path = "/api/v1/customer/cart/items",
    tag = "customer",
    security(("bearer" = [])),
    request_body = ItemRequest,
    responses(
        (status = 200, body = CartView),
        (status = 404, body = ProblemDetails),
        (status = 409, description = "Cart holds another restaurant", body = ProblemDetails),
        (status = 422, body = ProblemDetails),
    )
)]
pub async fn add_cart_item(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ItemRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let item = body.into_inner();

    let cart = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            cart_service::add_item(txn, user_id, item.menu_item_id, item.quantity)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(cart))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customer/cart/items/{menu_item_id}",
    tag = "customer",
    security(("bearer" = [])),
    params(("menu_item_id" = i64, Path)),
    responses((status = 204), (status = 404, body = ProblemDetails))
)]
pub async fn remove_cart_item(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let menu_item_id = path.into_inner();

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            cart_service::remove_item(txn, user_id, menu_item_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    delete,
    path = "/api/v1/customer/cart",
    tag = "customer",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn clear_cart(
    user: AsCustomer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            cart_service::clear(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/v1/customer/cart/quote",
    tag = "customer",
    security(("bearer" = [])),
    request_body = QuoteRequest,
    responses((status = 200, body = QuoteView), (status = 422, body = ProblemDetails))
)]
pub async fn quote(
    _user: AsCustomer,
    app_state: web::Data<AppState>,
    body: ValidatedJson<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let items: Vec<RequestedItem> = body.items.into_iter().map(RequestedItem::from).collect();
    let pricing = app_state.config.pricing.clone();

    let quote = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            cart_service::quote_for(
                txn,
                body.restaurant_id,
                body.order_type,
                &items,
                body.customer_lat,
                body.customer_lon,
                &pricing,
            )
            .await
            .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(quote))
}

// ----- orders -----

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub restaurant_id: i64,
    pub order_type: OrderType,
    pub items: Vec<ItemRequest>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub customer_lat: Option<f64>,
    pub customer_lon: Option<f64>,
    pub delivery_note: Option<String>,
    #[serde(default)]
    pub tip_cents: i64,
    /// Create a pending payment with this provider
    pub pay_with: Option<PaymentProvider>,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        Self {
            restaurant_id: req.restaurant_id,
            order_type: req.order_type,
            items: req.items.into_iter().map(RequestedItem::from).collect(),
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            customer_address: req.customer_address,
            customer_lat: req.customer_lat,
            customer_lon: req.customer_lon,
            delivery_note: req.delivery_note,
            tip_cents: req.tip_cents,
            pay_with: req.pay_with,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub provider: PaymentProvider,
}

#[utoipa::path(
    post,
    path = "/api/v1/customer/orders",
    tag = "customer",
    security(("bearer" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, body = Order),
        (status = 404, description = "Restaurant not open for orders", body = ProblemDetails),
        (status = 422, description = "Invalid items, distance or service area", body = ProblemDetails),
    )
)]
pub async fn place_order(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    body: ValidatedJson<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let input = PlaceOrder::from(body.into_inner());
    let config = app_state.config.clone();

    let order = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::place(txn, user_id, input, &config)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(order))
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/orders",
    tag = "customer",
    security(("bearer" = [])),
    responses((status = 200, body = Vec<Order>))
)]
pub async fn list_orders(
    user: AsCustomer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let orders = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::list_mine(txn, user_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    get,
    path = "/api/v1/customer/orders/{id}",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses((status = 200, body = Order), (status = 404, body = ProblemDetails))
)]
pub async fn get_order(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let order_id = path.into_inner();

    let order = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::get_mine(txn, user_id, order_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    post,
    path = "/api/v1/customer/orders/{id}/cancel",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, body = Order),
        (status = 404, body = ProblemDetails),
        (status = 409, description = "Kitchen already started", body = ProblemDetails),
    )
)]
pub async fn cancel_order(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let order_id = path.into_inner();

    let order = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            order_service::cancel_mine(txn, user_id, order_id)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    post,
    path = "/api/v1/customer/orders/{id}/payment",
    tag = "customer",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Order id")),
    request_body = PaymentRequest,
    responses(
        (status = 201, body = Payment),
        (status = 409, description = "Order already has a payment", body = ProblemDetails),
        (status = 422, description = "Payments disabled", body = ProblemDetails),
    )
)]
pub async fn create_payment(
    user: AsCustomer,
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: ValidatedJson<PaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let order_id = path.into_inner();
    let provider = body.into_inner().provider;
    let enabled = app_state.config.payment_enabled;

    let payment = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            payment_service::create_for_customer(txn, user_id, order_id, provider, enabled)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(payment))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(get_profile))
            .route(web::patch().to(update_profile))
            .route(web::delete().to(delete_profile)),
    )
    .route("/restaurants", web::get().to(list_restaurants))
    .route("/restaurants/{id}", web::get().to(get_restaurant))
    .route("/restaurants/{id}/hours", web::get().to(restaurant_hours))
    .route("/menu/restaurant/{id}", web::get().to(restaurant_menu))
    .route("/menu/item/{id}", web::get().to(menu_item))
    .service(
        web::resource("/cart")
            .route(web::get().to(get_cart))
            .route(web::delete().to(clear_cart)),
    )
    .route("/cart/items", web::post().to(add_cart_item))
    .route("/cart/items/{menu_item_id}", web::delete().to(remove_cart_item))
    .route("/cart/quote", web::post().to(quote))
    .service(
        web::resource("/orders")
            .route(web::get().to(list_orders))
            .route(web::post().to(place_order)),
    )
    .route("/orders/{id}", web::get().to(get_order))
    .route("/orders/{id}/cancel", web::post().to(cancel_order))
    .route("/orders/{id}/payment", web::post().to(create_payment));
}
