//! Cart management and quotes.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use super::restaurants;
use crate::config::PricingConfig;
use crate::domain::geo::{haversine_km, point_from, round_km};
use crate::domain::pricing::{quote, Quote, QuoteLine};
use crate::domain::OrderType;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::cart::{self, CartLine};
use crate::repos::menu::{self, MenuItem};
use crate::repos::restaurants::Restaurant;

pub const MAX_QUANTITY: i32 = 99;
pub const SUGGESTION_LIMIT: u64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartView {
    pub restaurant_id: Option<i64>,
    pub items: Vec<CartLine>,
    pub subtotal_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedItem {
    pub menu_item_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    pub suggestions: Vec<MenuItem>,
}

pub fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(DomainError::validation(
            ValidationKind::InvalidQuantity,
            format!("quantity must be between 1 and {MAX_QUANTITY}"),
        ));
    }
    Ok(())
}

pub async fn view<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<CartView, DomainError> {
    let items = cart::lines(conn, user_id).await?;
    Ok(CartView {
        restaurant_id: items.first().map(|l| l.restaurant_id),
        subtotal_cents: items.iter().map(|l| l.line_total_cents).sum(),
        items,
    })
}

pub async fn add_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
    quantity: i32,
) -> Result<CartView, DomainError> {
    validate_quantity(quantity)?;

    let item = menu::find_by_id(conn, menu_item_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::MenuItem, "Menu item not found"))?;
    if !item.is_available {
        return Err(DomainError::validation(
            ValidationKind::MenuItemUnavailable,
            format!("Menu item {menu_item_id} is not available"),
        ));
    }

    let existing = cart::lines(conn, user_id).await?;
    if existing.iter().any(|l| l.restaurant_id != item.restaurant_id) {
        return Err(DomainError::conflict(
            ConflictKind::CartRestaurantMismatch,
            "Cart already holds items from another restaurant",
        ));
    }

    cart::add(conn, user_id, menu_item_id, quantity, MAX_QUANTITY).await?;
    view(conn, user_id).await
}

pub async fn remove_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    menu_item_id: i64,
) -> Result<(), DomainError> {
    if !cart::remove(conn, user_id, menu_item_id).await? {
        return Err(DomainError::not_found(
            NotFoundKind::MenuItem,
            "Item is not in the cart",
        ));
    }
    Ok(())
}

pub async fn clear<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    cart::clear(conn, user_id).await?;
    Ok(())
}

/// Priced lines for `requested`, each checked against `restaurant`.
///
/// Returns the menu items keyed by id alongside the quote lines.
pub(crate) async fn price_lines<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant: &Restaurant,
    requested: &[RequestedItem],
) -> Result<(Vec<QuoteLine>, HashMap<i64, MenuItem>), DomainError> {
    if requested.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyOrder,
            "At least one item is required",
        ));
    }
    for line in requested {
        validate_quantity(line.quantity)?;
    }

    let ids: Vec<i64> = requested.iter().map(|l| l.menu_item_id).collect();
    let items: HashMap<i64, MenuItem> = menu::find_many(conn, &ids)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut lines = Vec::with_capacity(requested.len());
    for line in requested {
        let item = items
            .get(&line.menu_item_id)
            .filter(|i| i.restaurant_id == restaurant.id && i.is_available)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::MenuItemUnavailable,
                    format!("Menu item {} is not available", line.menu_item_id),
                )
            })?;
        lines.push(QuoteLine {
            unit_price_cents: item.price_cents,
            quantity: line.quantity,
        });
    }
    Ok((lines, items))
}

pub async fn quote_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    restaurant_id: i64,
    order_type: OrderType,
    requested: &[RequestedItem],
    customer_lat: Option<f64>,
    customer_lon: Option<f64>,
    config: &PricingConfig,
) -> Result<QuoteView, DomainError> {
    let restaurant = restaurants::get_public(conn, restaurant_id).await?;
    let (lines, _) = price_lines(conn, &restaurant, requested).await?;

    let distance_km = match order_type {
        OrderType::Delivery => restaurant
            .location()
            .zip(point_from(customer_lat, customer_lon))
            .map(|(from, to)| round_km(haversine_km(from, to))),
        OrderType::Pickup => None,
    };

    let exclude: Vec<i64> = requested.iter().map(|l| l.menu_item_id).collect();
    let suggestions = menu::top_sellers(conn, restaurant.id, &exclude, SUGGESTION_LIMIT).await?;

    Ok(QuoteView {
        quote: quote(&lines, order_type, distance_km, config),
        suggestions,
    })
}
